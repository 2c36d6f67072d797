//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod download;
mod ls;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "cmisbrowse")]
#[command(about = "Web front-end for browsing CMIS content repositories")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },

    /// Show the repositories the configured endpoint advertises
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the children of a folder
    Ls {
        /// Folder object id (defaults to the root folder)
        folder_id: Option<String>,
    },

    /// Download a document's content to a local file
    Download {
        /// Document object id
        document_id: String,

        /// Output file (defaults to the document's filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { bind } => serve::cmd_serve(settings, &bind).await,
        Commands::Status { json } => status::cmd_status(&settings, json).await,
        Commands::Ls { folder_id } => ls::cmd_ls(&settings, folder_id.as_deref()).await,
        Commands::Download {
            document_id,
            output,
        } => download::cmd_download(&settings, &document_id, output.as_deref()).await,
    }
}
