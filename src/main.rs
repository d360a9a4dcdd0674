//! Chatroll - chat list client
//!
#![doc = "Chatroll - chat list client"]
#![doc = "Main entry point for the chatroll command-line application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatroll::cli::{Cli, Commands};
use chatroll::commands;
use chatroll::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/chatroll.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::List { json, favorites } => {
            tracing::info!("Listing chats");
            commands::chats::list_chats(&config, json, favorites).await
        }
        Commands::Favorite { id, active } => {
            tracing::info!("Toggling favorite for chat {}", id);
            commands::chats::favorite_chat(&config, &id, active).await
        }
        Commands::Rename { id, title, active } => {
            tracing::info!("Renaming chat {}", id);
            commands::chats::rename_chat(&config, &id, &title, active).await
        }
        Commands::Delete { id, active } => {
            tracing::info!("Deleting chat {}", id);
            if let Some(a) = &active {
                tracing::debug!("Active conversation: {}", a);
            }
            commands::chats::delete_chat(&config, &id, active).await
        }
        Commands::Auth { command } => {
            tracing::info!("Starting auth command");
            commands::auth::handle_auth(&config, command)
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "chatroll=debug" } else { "chatroll=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
