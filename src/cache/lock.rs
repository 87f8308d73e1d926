use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Lock `lock` even when poisoned. Guarded state here is plain data, so a
/// panicked holder leaves at worst an entry that refetches.
pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    source: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(source, op, "Lock poisoned by a panicked holder; reusing its state");
            poisoned.into_inner()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("capture buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn poisoned(value: u32) -> Mutex<u32> {
        let lock = Mutex::new(value);
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = lock.lock().expect("lock should be acquired");
            panic!("poison the lock");
        }));
        lock
    }

    #[test]
    fn recovers_value_after_panic() {
        let lock = Mutex::new(7_u32);

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let mut guard = lock.lock().expect("lock should be acquired");
            *guard = 8;
            panic!("poison the lock");
        }));

        assert!(lock.is_poisoned());
        assert_eq!(*mutex_lock(&lock, "tests", "read"), 8);
    }

    #[test]
    fn poisoned_lock_is_reported_with_its_source() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let lock = poisoned(3);

        let value = tracing::subscriber::with_default(subscriber, || {
            *mutex_lock(&lock, "cache::store", "read")
        });

        assert_eq!(value, 3);
        let logged = String::from_utf8(captured.0.lock().expect("capture buffer").clone())
            .expect("utf8 log");
        assert!(logged.contains("Lock poisoned by a panicked holder"));
        assert!(logged.contains("cache::store"));
        assert!(logged.contains("read"));
    }
}
