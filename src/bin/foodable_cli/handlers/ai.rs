use foodable::application::Foodable;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::args::AiCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(app: &Foodable, cmd: AiCmd) -> Result<(), CliError> {
    match cmd {
        AiCmd::Suggest { query } => print_json(&app.suggest(&query).await?),
        AiCmd::Watch => watch(app).await,
    }
}

/// Each stdin line replaces the previous query; only the state after the
/// last line settles is printed.
async fn watch(app: &Foodable) -> Result<(), CliError> {
    let mut session = app.suggestions();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(CliError::Input)? {
        session.input(&line);
    }
    session.settle().await;

    let state = session.state();
    print_json(&serde_json::json!({
        "query": state.query,
        "suggestions": state.suggestions,
        "error": state.error,
    }))
}
