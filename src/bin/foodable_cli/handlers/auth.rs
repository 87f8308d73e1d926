use foodable::application::Foodable;
use foodable::application::error::AppError;
use foodable_api_types::{LoginRequest, RegisterRequest};
use serde_json::json;

use crate::args::AuthCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(app: &Foodable, cmd: AuthCmd) -> Result<(), CliError> {
    match cmd {
        AuthCmd::Register {
            email,
            password,
            name,
        } => {
            let user = app
                .register(&RegisterRequest {
                    email,
                    password,
                    name,
                })
                .await?;
            print_json(&user)
        }
        AuthCmd::Login { email, password } => {
            let token = app.login(&LoginRequest { email, password }).await?;
            // The token itself stays in the data dir, never on stdout.
            print_json(&json!({ "signed_in": true, "token_type": token.token_type }))
        }
        AuthCmd::Logout => {
            app.logout().await?;
            print_json(&json!({ "signed_in": false }))
        }
        AuthCmd::Me => {
            if !app.is_authenticated().await {
                return Err(AppError::SignedOut.into());
            }
            print_json(&*app.current_user().await.into_result()?)
        }
    }
}
