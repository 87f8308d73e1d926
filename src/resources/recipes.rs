use foodable_api_types::{Id, NewRecipe, Recipe};

use crate::infra::http::{ApiClient, ApiError, Auth, Method, json_body};

use super::require_id;

#[derive(Clone, Debug)]
pub struct RecipesApi {
    client: ApiClient,
}

impl RecipesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Recipe>, ApiError> {
        self.client
            .request(Method::GET, "/recipes/", None, Auth::Bearer)
            .await
    }

    pub async fn get(&self, id: Id) -> Result<Recipe, ApiError> {
        let id = require_id("recipe", id)?;
        self.client
            .request(Method::GET, &format!("/recipes/{id}"), None, Auth::Bearer)
            .await
    }

    pub async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, ApiError> {
        self.client
            .request(
                Method::POST,
                "/recipes/",
                Some(json_body(recipe)?),
                Auth::Bearer,
            )
            .await
    }
}
