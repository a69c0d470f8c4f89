//! CLI command definitions and dispatch for the `confab` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI covers serving the
//! REST API and provisioning the API keys that resolve calling users.

pub mod key;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// User-scoped AI chat conversation service.
#[derive(Parser)]
#[command(name = "confab", version, about, long_about = None)]
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

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "7700", env = "CONFAB_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "CONFAB_HOST")]
        host: String,
    },

    /// Manage API keys.
    Key {
        #[command(subcommand)]
        command: KeyCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Mint an API key for a user (the plaintext key is shown once).
    Create {
        /// Owning user id (UUID).
        #[arg(long)]
        user: String,

        /// Label for the key.
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// List API keys (hashes are never shown).
    List,
}
