use foodable::application::Foodable;

use crate::args::UsersCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(app: &Foodable, cmd: UsersCmd) -> Result<(), CliError> {
    match cmd {
        UsersCmd::Get { id } => print_json(&*app.user_profile(id).await.into_result()?),
    }
}
