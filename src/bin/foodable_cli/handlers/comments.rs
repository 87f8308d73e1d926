use foodable::application::Foodable;
use serde_json::json;

use crate::args::CommentsCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(app: &Foodable, cmd: CommentsCmd) -> Result<(), CliError> {
    match cmd {
        CommentsCmd::Delete { id } => {
            app.delete_comment(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}
