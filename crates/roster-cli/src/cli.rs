use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Register trainers and manage the submissions list")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the local fallback slot
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a trainer
    #[command(alias = "register")]
    Add {
        /// Trainer first name
        #[arg(long)]
        first_name: String,
        /// Trainer last name
        #[arg(long)]
        last_name: String,
        /// Favorite Pokemon, or "other" together with --other-choice
        #[arg(long)]
        choice: String,
        /// Favorite Pokemon when --choice is "other"
        #[arg(long, value_name = "NAME")]
        other_choice: Option<String>,
    },
    /// Show all submissions, newest first
    List {
        /// Output as JSON
        #[arg(long, conflicts_with = "html")]
        json: bool,
        /// Output table-body HTML
        #[arg(long)]
        html: bool,
    },
    /// Delete a submission by its row number in `roster list`
    Delete {
        /// Row number, starting at 1
        row: usize,
    },
    /// Show where submissions are persisted
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
