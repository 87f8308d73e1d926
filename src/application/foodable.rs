use std::sync::Arc;

use foodable_api_types::{
    Comment, Grocery, Id, LikeToggle, NewComment, NewGrocery, NewPost, NewRecipe, Post,
    PostDetail, Recipe, SuggestRequest, SuggestResponse, UserProfile, UserPublic,
};
use tokio_util::sync::CancellationToken;

use crate::{
    cache::{
        CacheConfig, CacheEntry, Invalidation, MutationRunner, QueryClient, QueryKey,
        QueryOptions, Resource, StalePolicy,
    },
    config::{Settings, SuggestSettings},
    infra::{
        http::ApiClient,
        saved_recipes::SavedRecipeStore,
        token_store::{FileTokenStore, TokenStore},
    },
    resources::{
        AiApi, AuthApi, CommentsApi, GroceriesApi, PostsApi, RecipesApi, UsersApi,
    },
};

use super::error::AppError;
use super::suggest::SuggestSession;

/// Entry point for views: cached queries and cache-aware mutations over the
/// Foodable API.
///
/// Construct one per application and share it; clones share the same cache.
#[derive(Clone, Debug)]
pub struct Foodable {
    pub(super) queries: QueryClient,
    pub(super) mutations: MutationRunner,
    groceries: GroceriesApi,
    recipes: RecipesApi,
    posts: PostsApi,
    comments: CommentsApi,
    users: UsersApi,
    pub(super) auth: AuthApi,
    ai: AiApi,
    pub(super) tokens: Arc<dyn TokenStore>,
    pub(super) saved: Arc<SavedRecipeStore>,
    suggest: SuggestSettings,
}

impl Foodable {
    /// Build from settings, keeping the token under the configured data dir.
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(&settings.storage.data_dir));
        Self::with_token_store(settings, tokens)
    }

    pub fn with_token_store(
        settings: &Settings,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, AppError> {
        let client = ApiClient::new(
            settings.api.base_url.as_str(),
            settings.api.timeout,
            Arc::clone(&tokens),
        )?;
        let queries = QueryClient::new(&CacheConfig::from(&settings.cache));
        let mutations = MutationRunner::new(Arc::clone(queries.store()));

        Ok(Self {
            queries,
            mutations,
            groceries: GroceriesApi::new(client.clone()),
            recipes: RecipesApi::new(client.clone()),
            posts: PostsApi::new(client.clone()),
            comments: CommentsApi::new(client.clone()),
            users: UsersApi::new(client.clone()),
            auth: AuthApi::new(client.clone()),
            ai: AiApi::new(client),
            tokens,
            saved: Arc::new(SavedRecipeStore::new(&settings.storage.data_dir)),
            suggest: settings.suggest.clone(),
        })
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    // Queries

    pub async fn groceries(&self) -> CacheEntry<Vec<Grocery>> {
        let api = self.groceries.clone();
        self.queries
            .query(QueryKey::Groceries, QueryOptions::default(), move || async move {
                api.list().await
            })
            .await
    }

    pub async fn grocery(&self, id: Id) -> CacheEntry<Grocery> {
        let api = self.groceries.clone();
        self.queries
            .query(QueryKey::Grocery(id), QueryOptions::enabled_if(id > 0), move || {
                async move { api.get(id).await }
            })
            .await
    }

    pub async fn recipes(&self) -> CacheEntry<Vec<Recipe>> {
        let api = self.recipes.clone();
        self.queries
            .query(QueryKey::Recipes, QueryOptions::default(), move || async move {
                api.list().await
            })
            .await
    }

    pub async fn recipe(&self, id: Id) -> CacheEntry<Recipe> {
        let api = self.recipes.clone();
        self.queries
            .query(QueryKey::Recipe(id), QueryOptions::enabled_if(id > 0), move || {
                async move { api.get(id).await }
            })
            .await
    }

    pub async fn posts(&self) -> CacheEntry<Vec<Post>> {
        let api = self.posts.clone();
        self.queries
            .query(QueryKey::Posts, QueryOptions::default(), move || async move {
                api.list().await
            })
            .await
    }

    pub async fn post(&self, id: Id) -> CacheEntry<PostDetail> {
        let api = self.posts.clone();
        self.queries
            .query(QueryKey::Post(id), QueryOptions::enabled_if(id > 0), move || {
                async move { api.get(id).await }
            })
            .await
    }

    pub async fn user_profile(&self, user_id: Id) -> CacheEntry<UserProfile> {
        let api = self.users.clone();
        self.queries
            .query(
                QueryKey::UserProfile(user_id),
                QueryOptions::enabled_if(user_id > 0),
                move || async move { api.profile(user_id).await },
            )
            .await
    }

    /// The signed-in user. Cached until the session changes.
    pub async fn current_user(&self) -> CacheEntry<UserPublic> {
        let api = self.auth.clone();
        let options =
            QueryOptions::enabled_if(self.is_authenticated().await).with_stale(StalePolicy::Never);
        self.queries
            .query(QueryKey::CurrentUser, options, move || async move {
                api.me().await
            })
            .await
    }

    // Mutations

    pub async fn add_grocery(&self, grocery: &NewGrocery) -> Result<Grocery, AppError> {
        let created = self
            .mutations
            .mutate(
                "add_grocery",
                &[Resource::Groceries.into()],
                self.groceries.create(grocery),
            )
            .await?;
        Ok(created)
    }

    pub async fn delete_grocery(&self, id: Id) -> Result<(), AppError> {
        self.mutations
            .mutate(
                "delete_grocery",
                &[Resource::Groceries.into()],
                self.groceries.delete(id),
            )
            .await?;
        Ok(())
    }

    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, AppError> {
        let created = self
            .mutations
            .mutate(
                "create_recipe",
                &[Resource::Recipes.into()],
                self.recipes.create(recipe),
            )
            .await?;
        Ok(created)
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, AppError> {
        if post.content.trim().is_empty() {
            return Err(AppError::validation("post content must not be empty"));
        }
        let created = self
            .mutations
            .mutate(
                "create_post",
                &[Resource::Posts.into(), Resource::Users.into()],
                self.posts.create(post),
            )
            .await?;
        Ok(created)
    }

    pub async fn delete_post(&self, id: Id) -> Result<(), AppError> {
        self.mutations
            .mutate(
                "delete_post",
                &[Resource::Posts.into(), Resource::Users.into()],
                self.posts.delete(id),
            )
            .await?;
        Ok(())
    }

    pub async fn toggle_like(&self, id: Id) -> Result<LikeToggle, AppError> {
        let toggle = self
            .mutations
            .mutate("toggle_like", &post_activity(id), self.posts.toggle_like(id))
            .await?;
        Ok(toggle)
    }

    pub async fn add_comment(&self, post_id: Id, comment: &NewComment) -> Result<Comment, AppError> {
        if comment.content.trim().is_empty() {
            return Err(AppError::validation("comment must not be empty"));
        }
        let created = self
            .mutations
            .mutate(
                "add_comment",
                &post_activity(post_id),
                self.comments.add(post_id, comment),
            )
            .await?;
        Ok(created)
    }

    /// The parent post is unknown here, so every post view is refreshed.
    pub async fn delete_comment(&self, comment_id: Id) -> Result<(), AppError> {
        self.mutations
            .mutate(
                "delete_comment",
                &[Resource::Posts.into()],
                self.comments.delete(comment_id),
            )
            .await?;
        Ok(())
    }

    // Suggestions

    /// Debounced, cancellable suggestion search.
    pub fn suggestions(&self) -> SuggestSession {
        SuggestSession::new(Arc::new(self.ai.clone()), self.suggest.clone())
    }

    /// One immediate suggestion request, bypassing the debounce.
    pub async fn suggest(&self, query: &str) -> Result<SuggestResponse, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation("query must not be empty"));
        }
        let request = SuggestRequest {
            query: query.to_string(),
            dietary_restrictions: self.suggest.dietary_restrictions.clone(),
            max_results: self.suggest.max_results.get(),
        };
        Ok(self.ai.suggest(&request, &CancellationToken::new()).await?)
    }
}

/// Likes and comments change the post, its list entry and profile counters.
fn post_activity(post_id: Id) -> [Invalidation; 3] {
    [
        QueryKey::Post(post_id).into(),
        QueryKey::Posts.into(),
        Resource::Users.into(),
    ]
}
