use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

const TIME_OF_DAY: &[BorrowedFormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");
const FULL: &[BorrowedFormatItem<'static>] = format_description!(
    "[month repr:short] [day padding:none], [year] [hour repr:12 padding:none]:[minute] [period]"
);

/// Render a timestamp relative to `now`, both taken in UTC.
///
/// Same calendar day gives `3:07 PM`, the previous day `Yesterday`, and
/// anything else `Mar 4, 2025 3:07 PM`.
pub fn format_smart_date(at: OffsetDateTime, now: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    let today = now.to_offset(UtcOffset::UTC).date();

    let format = if at.date() == today {
        TIME_OF_DAY
    } else if today.previous_day() == Some(at.date()) {
        return "Yesterday".to_string();
    } else {
        FULL
    };
    at.format(format).unwrap_or_else(|_| at.to_string())
}

/// Coarse "time ago" label: `just now`, `5m`, `3h`, `2d`, then the full date.
pub fn format_distance(at: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = now - at;
    if elapsed < Duration::minutes(1) {
        "just now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m", elapsed.whole_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h", elapsed.whole_hours())
    } else if elapsed < Duration::weeks(1) {
        format!("{}d", elapsed.whole_days())
    } else {
        let at = at.to_offset(UtcOffset::UTC);
        at.format(FULL).unwrap_or_else(|_| at.to_string())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    const NOW: OffsetDateTime = datetime!(2025-03-10 18:30 UTC);

    #[test]
    fn same_day_shows_time_only() {
        assert_eq!(format_smart_date(datetime!(2025-03-10 09:05 UTC), NOW), "9:05 AM");
        assert_eq!(format_smart_date(datetime!(2025-03-10 00:00 UTC), NOW), "12:00 AM");
    }

    #[test]
    fn previous_day_is_yesterday() {
        assert_eq!(
            format_smart_date(datetime!(2025-03-09 23:59 UTC), NOW),
            "Yesterday"
        );
    }

    #[test]
    fn older_dates_are_spelled_out() {
        assert_eq!(
            format_smart_date(datetime!(2025-03-04 15:07 UTC), NOW),
            "Mar 4, 2025 3:07 PM"
        );
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        // 01:00 on the 11th at +03:00 is still the 10th in UTC.
        assert_eq!(
            format_smart_date(datetime!(2025-03-11 01:00 +03:00), NOW),
            "10:00 PM"
        );
    }

    #[test]
    fn distance_buckets() {
        assert_eq!(format_distance(datetime!(2025-03-10 18:29:30 UTC), NOW), "just now");
        assert_eq!(format_distance(datetime!(2025-03-10 18:00 UTC), NOW), "30m");
        assert_eq!(format_distance(datetime!(2025-03-10 13:30 UTC), NOW), "5h");
        assert_eq!(format_distance(datetime!(2025-03-08 18:30 UTC), NOW), "2d");
        assert_eq!(
            format_distance(datetime!(2025-02-01 08:15 UTC), NOW),
            "Feb 1, 2025 8:15 AM"
        );
    }
}
