//! foodable-cli: command-line client over the Foodable data layer.
#![deny(clippy::all)]

mod args;
mod client;
mod handlers;
mod print;

use std::process::ExitCode;

use clap::Parser;
use foodable::application::Foodable;
use foodable::config;
use foodable::infra::telemetry;

use args::{Cli, Commands};
use client::CliError;
use handlers::{ai, auth, comments, groceries, posts, recipes, saved, users};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = config::load(&cli.overrides)?;
    telemetry::init(&settings.logging)?;
    let app = Foodable::new(&settings)?;
    dispatch(&app, cli.command).await
}

async fn dispatch(app: &Foodable, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Groceries(cmd) => groceries::handle(app, cmd.action).await,
        Commands::Recipes(cmd) => recipes::handle(app, cmd.action).await,
        Commands::Posts(cmd) => posts::handle(app, cmd.action).await,
        Commands::Comments(cmd) => comments::handle(app, cmd.action).await,
        Commands::Users(cmd) => users::handle(app, cmd.action).await,
        Commands::Auth(cmd) => auth::handle(app, cmd.action).await,
        Commands::Ai(cmd) => ai::handle(app, cmd.action).await,
        Commands::Saved(cmd) => saved::handle(app, cmd.action).await,
    }
}
