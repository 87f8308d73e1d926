use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Id;
use crate::auth::UserPublic;

/// Post category chosen by the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Text,
    Recipe,
    Grocery,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Post {
    pub id: Id,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: Option<PostKind>,
    pub user: UserPublic,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(with = "crate::timestamp")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Comment {
    pub id: Id,
    pub content: String,
    pub user: UserPublic,
    #[serde(with = "crate::timestamp")]
    pub created_at: OffsetDateTime,
}

/// A post together with its comments, in the order the server returns them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewPost {
    pub content: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PostKind>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewComment {
    pub content: String,
}

/// Response of `PATCH /posts/{id}/like`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_likes_received: u64,
    #[serde(default)]
    pub total_comments: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserProfile {
    pub user: UserPublic,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub stats: UserStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_detail_flattens_post_fields() {
        let raw = r#"{
            "id": 7, "content": "Overnight oats", "type": "recipe",
            "user": {"id": 1, "email": "a@example.com", "name": null},
            "likes_count": 3, "comments_count": 1,
            "created_at": "2025-01-05T08:00:00",
            "comments": [
                {"id": 11, "content": "yum", "user": {"id": 2, "email": "b@example.com"},
                 "created_at": "2025-01-05T09:00:00Z"}
            ]
        }"#;

        let detail: PostDetail = serde_json::from_str(raw).expect("post detail");
        assert_eq!(detail.post.id, 7);
        assert_eq!(detail.post.kind, Some(PostKind::Recipe));
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].user.display_name(), "b@example.com");
    }

    #[test]
    fn unknown_post_kind_is_tolerated() {
        let raw = r#"{"id": 1, "content": "x", "type": "poll",
            "user": {"id": 1, "email": "a@example.com"},
            "created_at": "2025-01-05T08:00:00Z"}"#;
        let post: Post = serde_json::from_str(raw).expect("post");
        assert_eq!(post.kind, Some(PostKind::Other));
        assert_eq!(post.likes_count, 0);
    }

    #[test]
    fn new_post_serializes_type_field() {
        let body = serde_json::to_value(NewPost {
            content: "tip".into(),
            kind: Some(PostKind::Grocery),
        })
        .expect("serialize");
        assert_eq!(body["type"], "grocery");
    }
}
