use foodable_api_types::{Id, LikeToggle, NewPost, Post, PostDetail};

use crate::infra::http::{ApiClient, ApiError, Auth, Method, json_body};

use super::require_id;

#[derive(Clone, Debug)]
pub struct PostsApi {
    client: ApiClient,
}

impl PostsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Post>, ApiError> {
        self.client
            .request(Method::GET, "/posts", None, Auth::Bearer)
            .await
    }

    /// Post with its comments.
    pub async fn get(&self, id: Id) -> Result<PostDetail, ApiError> {
        let id = require_id("post", id)?;
        self.client
            .request(Method::GET, &format!("/posts/{id}"), None, Auth::Bearer)
            .await
    }

    pub async fn create(&self, post: &NewPost) -> Result<Post, ApiError> {
        self.client
            .request(Method::POST, "/posts", Some(json_body(post)?), Auth::Bearer)
            .await
    }

    /// Only the author may delete; the server enforces it.
    pub async fn delete(&self, id: Id) -> Result<(), ApiError> {
        let id = require_id("post", id)?;
        self.client
            .request_unit(Method::DELETE, &format!("/posts/{id}"), None, Auth::Bearer)
            .await
    }

    pub async fn toggle_like(&self, id: Id) -> Result<LikeToggle, ApiError> {
        let id = require_id("post", id)?;
        self.client
            .request(
                Method::PATCH,
                &format!("/posts/{id}/like"),
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
    use crate::resources::test_support::{signed_in, signed_out};

    #[tokio::test]
    async fn toggle_like_patches_post() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("PATCH").path("/posts/42/like");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"liked":true,"likes_count":6}"#);
        });

        let toggle = PostsApi::new(signed_in(&server)).toggle_like(42).await?;

        assert_eq!(
            toggle,
            LikeToggle {
                liked: true,
                likes_count: 6
            }
        );
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn get_returns_comments_in_server_order() -> Result<(), ApiError> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/posts/3");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"id":3,"content":"Soup night","type":"text",
                        "user":{"id":1,"email":"cook@example.com","name":"Cook"},
                        "likes_count":2,"comments_count":2,
                        "created_at":"2025-02-01T18:30:00",
                        "comments":[
                          {"id":20,"content":"second?","user":{"id":2,"email":"b@example.com"},"created_at":"2025-02-01T19:00:00"},
                          {"id":10,"content":"first","user":{"id":3,"email":"c@example.com"},"created_at":"2025-02-01T18:45:00"}
                        ]}"#,
                );
        });

        let detail = PostsApi::new(signed_in(&server)).get(3).await?;

        let ids: Vec<_> = detail.comments.iter().map(|comment| comment.id).collect();
        assert_eq!(ids, vec![20, 10]);
        assert_eq!(detail.post.user.display_name(), "Cook");
        Ok(())
    }

    #[tokio::test]
    async fn delete_without_session_never_reaches_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("DELETE").path("/posts/3");
            then.status(204);
        });

        let err = PostsApi::new(signed_out(&server))
            .delete(3)
            .await
            .expect_err("no token");

        assert!(matches!(err, ApiError::Precondition(_)));
        mock.assert_calls(0);
    }
}
