//! Command-line surface for `foodable-cli`.

use clap::{Parser, Subcommand, ValueEnum};
use foodable::config::ClientOverrides;
use foodable_api_types::{Id, PostKind};

#[derive(Parser, Debug)]
#[command(name = "foodable-cli", version, about = "Foodable API command-line client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ClientOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grocery list
    Groceries(GroceriesArgs),
    /// Recipe catalogue
    Recipes(RecipesArgs),
    /// Community feed
    Posts(PostsArgs),
    /// Comments on posts
    Comments(CommentsArgs),
    /// Public user profiles
    Users(UsersArgs),
    /// Account and session
    Auth(AuthArgs),
    /// AI recipe suggestions
    Ai(AiArgs),
    /// Recipes saved on this device
    Saved(SavedArgs),
}

#[derive(Parser, Debug)]
pub struct GroceriesArgs {
    #[command(subcommand)]
    pub action: GroceriesCmd,
}

#[derive(Subcommand, Debug)]
pub enum GroceriesCmd {
    /// List groceries
    List,
    /// Get a grocery by id
    Get { id: Id },
    /// Add a grocery
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        calories: Option<f64>,
        #[arg(long)]
        protein: Option<f64>,
    },
    /// Delete a grocery
    Delete { id: Id },
}

#[derive(Parser, Debug)]
pub struct RecipesArgs {
    #[command(subcommand)]
    pub action: RecipesCmd,
}

#[derive(Subcommand, Debug)]
pub enum RecipesCmd {
    /// List recipes
    List,
    /// Get a recipe by id
    Get { id: Id },
    /// Create a recipe
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Repeat once per ingredient
        #[arg(long = "ingredient", value_name = "INGREDIENT")]
        ingredients: Vec<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        prep_time: Option<String>,
        #[arg(long)]
        cook_time: Option<String>,
    },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List the feed
    List,
    /// Get a post with its comments
    Get { id: Id },
    /// Publish a post
    Create {
        #[arg(long)]
        content: String,
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<PostKindArg>,
    },
    /// Delete one of your posts
    Delete { id: Id },
    /// Like or unlike a post
    Like { id: Id },
    /// Comment on a post
    Comment {
        id: Id,
        #[arg(long)]
        content: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PostKindArg {
    Text,
    Recipe,
    Grocery,
}

impl From<PostKindArg> for PostKind {
    fn from(value: PostKindArg) -> Self {
        match value {
            PostKindArg::Text => PostKind::Text,
            PostKindArg::Recipe => PostKind::Recipe,
            PostKindArg::Grocery => PostKind::Grocery,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub action: CommentsCmd,
}

#[derive(Subcommand, Debug)]
pub enum CommentsCmd {
    /// Delete one of your comments
    Delete { id: Id },
}

#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersCmd,
}

#[derive(Subcommand, Debug)]
pub enum UsersCmd {
    /// Show a user's profile, posts and stats
    Get { id: Id },
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        /// Read from env so it stays out of shell history
        #[arg(long, env = "FOODABLE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Sign in and store the access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOODABLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the signed-in account
    Me,
}

#[derive(Parser, Debug)]
pub struct AiArgs {
    #[command(subcommand)]
    pub action: AiCmd,
}

#[derive(Subcommand, Debug)]
pub enum AiCmd {
    /// Ask for suggestions once
    Suggest { query: String },
    /// Read queries from stdin line by line, debounced like a search box
    Watch,
}

#[derive(Parser, Debug)]
pub struct SavedArgs {
    #[command(subcommand)]
    pub action: SavedCmd,
}

#[derive(Subcommand, Debug)]
pub enum SavedCmd {
    /// List saved recipe ids
    List {
        /// Resolve ids to full recipes
        #[arg(long)]
        details: bool,
    },
    /// Save or unsave a recipe
    Toggle { recipe_id: Id },
}
