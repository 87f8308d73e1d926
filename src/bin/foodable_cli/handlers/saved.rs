use foodable::application::Foodable;
use serde_json::json;

use crate::args::SavedCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(app: &Foodable, cmd: SavedCmd) -> Result<(), CliError> {
    match cmd {
        SavedCmd::List { details: false } => print_json(&app.saved_recipes().await?),
        SavedCmd::List { details: true } => print_json(&app.saved_recipe_details().await?),
        SavedCmd::Toggle { recipe_id } => {
            let saved = app.toggle_saved(recipe_id).await?;
            print_json(&json!({ "recipe_id": recipe_id, "saved": saved }))
        }
    }
}
