use foodable::application::Foodable;
use foodable_api_types::NewRecipe;

use crate::args::RecipesCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(app: &Foodable, cmd: RecipesCmd) -> Result<(), CliError> {
    match cmd {
        RecipesCmd::List => print_json(&*app.recipes().await.into_result()?),
        RecipesCmd::Get { id } => print_json(&*app.recipe(id).await.into_result()?),
        RecipesCmd::Create {
            name,
            description,
            ingredients,
            instructions,
            category,
            prep_time,
            cook_time,
        } => {
            let recipe = NewRecipe {
                name,
                description,
                ingredients,
                instructions,
                category,
                prep_time,
                cook_time,
            };
            print_json(&app.create_recipe(&recipe).await?)
        }
    }
}
