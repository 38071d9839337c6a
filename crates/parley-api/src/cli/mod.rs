//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Every flag with an
//! environment variable can also be set from a `.env` file.

pub mod chat;
pub mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::client::DEFAULT_API_BASE_URL;
use crate::state::StoreOptions;

/// A single-conversation chat backed by an LLM.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// SQLite database URL. Selects the SQLite backend when set.
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// JSON history file (default: {data_dir}/messages.json).
    #[arg(long, env = "PARLEY_HISTORY_FILE", global = true)]
    pub history_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            database_url: self.database_url.clone(),
            history_file: self.history_file.clone(),
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,parley_api=debug,parley_core=debug,parley_infra=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, short, env = "PORT", default_value_t = 5000)]
        port: u16,

        /// Host address to bind to.
        #[arg(long, env = "PARLEY_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Directory with a built web frontend to serve.
        #[arg(long, env = "PARLEY_WEB_DIR")]
        web_dir: Option<PathBuf>,
    },

    /// Print the stored conversation.
    History,

    /// Chat with a running server from the terminal.
    Chat {
        /// Base URL of the server.
        #[arg(long, env = "PARLEY_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
        api_url: String,
    },
}
