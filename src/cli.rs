//! Command-line interface definition for Chatroll
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// Chatroll - manage your chat list against a chat backend
///
/// Changes are applied locally first and rolled back if the backend
/// refuses them.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatroll")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/chatroll.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Override the chat backend base URL
    #[arg(long, env = "CHATROLL_API_BASE")]
    pub api_base: Option<String>,

    /// Bearer token to send instead of the stored one
    #[arg(long, env = "CHATROLL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List chats
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,
    },

    /// Toggle the favorite flag of a chat
    Favorite {
        /// Chat id
        id: String,

        /// Chat currently open in the client
        #[arg(long)]
        active: Option<String>,
    },

    /// Rename a chat
    Rename {
        /// Chat id
        id: String,

        /// New title
        title: String,

        /// Chat currently open in the client
        #[arg(long)]
        active: Option<String>,
    },

    /// Delete a chat
    Delete {
        /// Chat id
        id: String,

        /// Chat currently open in the client
        #[arg(long)]
        active: Option<String>,
    },

    /// Manage the stored API token
    Auth {
        /// Auth subcommand
        #[command(subcommand)]
        command: AuthCommand,
    },
}

/// Token management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Store a bearer token in the OS keyring
    Login {
        /// Token issued by the chat backend
        #[arg(long)]
        token: String,

        /// Seconds until the token expires
        #[arg(long)]
        expires_in: Option<i64>,
    },

    /// Remove the stored token
    Logout,

    /// Show whether a usable token is stored
    Status,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/chatroll.yaml".to_string()),
            verbose: false,
            json_logs: false,
            api_base: None,
            token: None,
            command: Commands::List {
                json: false,
                favorites: false,
            },
        }
    }
}
