//! Roster CLI - register trainers and manage the submissions list
//!
//! Submissions are kept in a GitHub-hosted JSON document when
//! `ROSTER_GITHUB_REPO` and `ROSTER_GITHUB_TOKEN` are set, and in a local
//! fallback file otherwise.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use roster_core::StoreConfig;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::resolve_data_dir;
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::commands::status::run_status;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roster_core=info".parse().expect("valid directive"))
                .add_directive("roster=info".parse().expect("valid directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StoreConfig::from_env()?;
    let data_dir = resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Some(Commands::Add {
            first_name,
            last_name,
            choice,
            other_choice,
        }) => {
            let form = roster_core::RegistrationForm {
                first_name,
                last_name,
                choice,
                other_choice,
            };
            run_add(form, &config, &data_dir).await?;
        }
        Some(Commands::List { json, html }) => {
            run_list(json, html, &config, &data_dir).await?;
        }
        Some(Commands::Delete { row }) => run_delete(row, &config, &data_dir).await?,
        Some(Commands::Status { json }) => run_status(json, &config, &data_dir)?,
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
