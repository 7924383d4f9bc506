use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::dialog::AddArgs;
use super::commands::dialog::EditArgs;
use super::commands::list::ListArgs;

#[derive(Parser)]
#[command(name = "credential-dialog")]
#[command(about = "Create and edit discovery credentials from the terminal")]
pub struct Cli {
    /// Base URL of the credentials API (overrides config and environment)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// API token (overrides config and environment)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to an alternative config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the dialog to add a new credential
    Add(AddArgs),
    /// Open the dialog to edit an existing credential
    Edit(EditArgs),
    /// Print the credentials listing
    List(ListArgs),
}
