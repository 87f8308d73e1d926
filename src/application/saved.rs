//! Saved recipes, scoped to the signed-in user and kept on this device.

use foodable_api_types::{Id, Recipe};

use super::Foodable;
use super::error::AppError;

impl Foodable {
    async fn signed_in_user_id(&self) -> Result<Id, AppError> {
        if !self.is_authenticated().await {
            return Err(AppError::SignedOut);
        }
        Ok(self.current_user().await.into_result()?.id)
    }

    /// Ids of the signed-in user's saved recipes, ascending.
    pub async fn saved_recipes(&self) -> Result<Vec<Id>, AppError> {
        let user_id = self.signed_in_user_id().await?;
        Ok(self.saved.list(user_id).await?)
    }

    /// Saved recipes that still exist on the server, in saved-id order.
    pub async fn saved_recipe_details(&self) -> Result<Vec<Recipe>, AppError> {
        let saved = self.saved_recipes().await?;
        if saved.is_empty() {
            return Ok(Vec::new());
        }
        let recipes = self.recipes().await.into_result()?;
        Ok(saved
            .iter()
            .filter_map(|id| recipes.iter().find(|recipe| recipe.id == *id).cloned())
            .collect())
    }

    pub async fn is_saved(&self, recipe_id: Id) -> Result<bool, AppError> {
        let user_id = self.signed_in_user_id().await?;
        Ok(self.saved.contains(user_id, recipe_id).await?)
    }

    /// Flip the saved state of `recipe_id`; returns the new state.
    pub async fn toggle_saved(&self, recipe_id: Id) -> Result<bool, AppError> {
        if recipe_id <= 0 {
            return Err(AppError::validation(format!("invalid recipe id {recipe_id}")));
        }
        let user_id = self.signed_in_user_id().await?;
        Ok(self.saved.toggle(user_id, recipe_id).await?)
    }
}
