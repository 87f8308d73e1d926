use foodable::application::Foodable;
use foodable_api_types::NewGrocery;
use serde_json::json;

use crate::args::GroceriesCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(app: &Foodable, cmd: GroceriesCmd) -> Result<(), CliError> {
    match cmd {
        GroceriesCmd::List => {
            let groceries = app.groceries().await.into_result()?;
            print_json(&*groceries)
        }
        GroceriesCmd::Get { id } => {
            let grocery = app.grocery(id).await.into_result()?;
            print_json(&*grocery)
        }
        GroceriesCmd::Add {
            name,
            category,
            calories,
            protein,
        } => {
            let created = app
                .add_grocery(&NewGrocery {
                    name,
                    category,
                    calories,
                    protein,
                })
                .await?;
            print_json(&created)
        }
        GroceriesCmd::Delete { id } => {
            app.delete_grocery(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}
