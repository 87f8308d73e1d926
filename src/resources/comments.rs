use foodable_api_types::{Comment, Id, NewComment};

use crate::infra::http::{ApiClient, ApiError, Auth, Method, json_body};

use super::require_id;

#[derive(Clone, Debug)]
pub struct CommentsApi {
    client: ApiClient,
}

impl CommentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn add(&self, post_id: Id, comment: &NewComment) -> Result<Comment, ApiError> {
        let post_id = require_id("post", post_id)?;
        self.client
            .request(
                Method::POST,
                &format!("/posts/{post_id}/comments"),
                Some(json_body(comment)?),
                Auth::Bearer,
            )
            .await
    }

    pub async fn delete(&self, comment_id: Id) -> Result<(), ApiError> {
        let comment_id = require_id("comment", comment_id)?;
        self.client
            .request_unit(
                Method::DELETE,
                &format!("/comments/{comment_id}"),
                None,
                Auth::Bearer,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;

    use super::*;
    use crate::resources::test_support::signed_in;

    #[tokio::test]
    async fn add_posts_to_post_comments() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/posts/8/comments")
                .json_body_includes(r#"{"content":"Looks great"}"#);
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":30,"content":"Looks great","user":{"id":2,"email":"b@example.com"},"created_at":"2025-03-01T10:00:00Z"}"#);
        });

        let comment = CommentsApi::new(signed_in(&server))
            .add(
                8,
                &NewComment {
                    content: "Looks great".into(),
                },
            )
            .await?;

        assert_eq!(comment.id, 30);
        mock.assert();
        Ok(())
    }
}
