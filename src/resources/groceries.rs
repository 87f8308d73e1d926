use foodable_api_types::{Grocery, Id, NewGrocery};

use crate::infra::http::{ApiClient, ApiError, Auth, Method, json_body};

use super::require_id;

#[derive(Clone, Debug)]
pub struct GroceriesApi {
    client: ApiClient,
}

impl GroceriesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Grocery>, ApiError> {
        self.client
            .request(Method::GET, "/groceries/", None, Auth::Bearer)
            .await
    }

    pub async fn get(&self, id: Id) -> Result<Grocery, ApiError> {
        let id = require_id("grocery", id)?;
        self.client
            .request(Method::GET, &format!("/groceries/{id}"), None, Auth::Bearer)
            .await
    }

    pub async fn create(&self, grocery: &NewGrocery) -> Result<Grocery, ApiError> {
        self.client
            .request(
                Method::POST,
                "/groceries/",
                Some(json_body(grocery)?),
                Auth::Bearer,
            )
            .await
    }

    pub async fn delete(&self, id: Id) -> Result<(), ApiError> {
        let id = require_id("grocery", id)?;
        self.client
            .request_unit(Method::DELETE, &format!("/groceries/{id}"), None, Auth::Bearer)
            .await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;

    use super::*;
    use crate::resources::test_support::{TOKEN, signed_in};

    #[tokio::test]
    async fn list_sends_bearer_token() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/groceries/")
                .header("authorization", format!("Bearer {TOKEN}"));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":1,"name":"Milk","category":"Dairy","calories":42.0,"protein":3.4}]"#);
        });

        let groceries = GroceriesApi::new(signed_in(&server)).list().await?;

        assert_eq!(groceries.len(), 1);
        assert_eq!(groceries[0].name, "Milk");
        assert_eq!(groceries[0].calories, Some(42.0));
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn create_posts_fields() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/groceries/")
                .json_body_includes(r#"{"name":"Eggs","category":"Protein"}"#);
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":5,"name":"Eggs","category":"Protein"}"#);
        });

        let created = GroceriesApi::new(signed_in(&server))
            .create(&NewGrocery {
                name: "Eggs".into(),
                category: Some("Protein".into()),
                ..Default::default()
            })
            .await?;

        assert_eq!(created.id, 5);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn invalid_id_is_rejected_locally() {
        let server = MockServer::start();
        let err = GroceriesApi::new(signed_in(&server))
            .delete(0)
            .await
            .expect_err("id 0");
        assert!(matches!(err, ApiError::Precondition(_)));
    }
}
