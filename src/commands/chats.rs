use crate::config::Config;
use crate::controller::{ChatController, MutationOutcome};
use crate::error::{ChatrollError, Result};
use crate::model::{ChatSummary, ChatTitle};
use crate::navigation::Navigator;
use crate::notify::{ConsoleNotifier, Notification, Notifier};
use colored::Colorize;
use prettytable::{format, Table};

use super::build_controller;

const TITLE_WIDTH: usize = 40;

/// Print the chat list
pub async fn list_chats(config: &Config, json: bool, favorites: bool) -> Result<()> {
    let (controller, _) = build_controller(config, None)?;
    controller.refresh().await?;

    let chats: Vec<ChatSummary> = controller
        .store()
        .get_all()
        .into_iter()
        .filter(|chat| !favorites || chat.favorite)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&chats)?);
        return Ok(());
    }

    if chats.is_empty() {
        println!("{}", "No chats found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["ID".bold(), "Title".bold(), "Favorite".bold()]);

    for chat in chats {
        let favorite = if chat.favorite { "★" } else { "" };
        table.add_row(prettytable::row![
            chat.id.cyan(),
            truncate(&chat.title, TITLE_WIDTH),
            favorite.yellow()
        ]);
    }

    println!("\nChats:");
    table.printstd();
    println!();
    Ok(())
}

/// Toggle the favorite flag of chat `id`
pub async fn favorite_chat(config: &Config, id: &str, active: Option<String>) -> Result<()> {
    let (controller, _) = build_controller(config, active)?;
    controller.refresh().await?;

    let outcome = controller.toggle_favorite(id).await;
    report(&controller, id, outcome)?;

    if let Some(chat) = controller.store().get(id) {
        let state = if chat.favorite {
            "added to favorites"
        } else {
            "removed from favorites"
        };
        println!("{}", format!("Chat {} {}", id, state).green());
    }
    Ok(())
}

/// Rename chat `id`
///
/// The title is validated before anything is sent to the backend.
pub async fn rename_chat(
    config: &Config,
    id: &str,
    title: &str,
    active: Option<String>,
) -> Result<()> {
    let title = ChatTitle::parse(title, &config.titles)?;

    let (controller, _) = build_controller(config, active)?;
    controller.refresh().await?;

    let outcome = controller.rename(id, title.clone()).await;
    report(&controller, id, outcome)?;

    println!("{}", format!("Chat {} renamed to \"{}\"", id, title).green());
    Ok(())
}

/// Delete chat `id`
pub async fn delete_chat(config: &Config, id: &str, active: Option<String>) -> Result<()> {
    let (controller, navigator) = build_controller(config, active)?;
    controller.refresh().await?;

    let outcome = controller.delete(id).await;
    let result = report(&controller, id, outcome);
    ConsoleNotifier.notify(Notification::info(format!(
        "Now viewing: {}",
        navigator.current()
    )));
    result?;

    println!("{}", format!("Deleted chat {}", id).green());
    Ok(())
}

/// Turn a mutation outcome into the command result
fn report(controller: &ChatController, id: &str, outcome: MutationOutcome) -> Result<()> {
    match outcome {
        MutationOutcome::Confirmed => Ok(()),
        MutationOutcome::RolledBack(error) => Err(ChatrollError::Service(error).into()),
        MutationOutcome::Skipped => {
            Err(ChatrollError::Validation(format!("Chat {} not found", id)).into())
        }
        MutationOutcome::Detached => {
            tracing::warn!(
                "Result for chat {} arrived after detach ({} pending)",
                id,
                controller.pending()
            );
            Ok(())
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::test_utils::harness;

    #[test]
    fn test_truncate_short_title_unchanged() {
        assert_eq!(truncate("Hello", 10), "Hello");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_report_maps_outcomes() {
        let h = harness(vec![]);
        assert!(report(&h.controller, "1", MutationOutcome::Confirmed).is_ok());
        assert!(report(&h.controller, "1", MutationOutcome::Skipped)
            .unwrap_err()
            .to_string()
            .contains("not found"));
        let rolled_back =
            MutationOutcome::RolledBack(ServiceError::Network("down".to_string()));
        assert!(report(&h.controller, "1", rolled_back).is_err());
    }

    #[tokio::test]
    async fn test_rename_rejects_blank_title_before_network() {
        let mut config = Config::default();
        // Nothing listens here; a network call would fail differently.
        config.api.base_url = "http://127.0.0.1:9".to_string();
        config.api.use_keyring = false;

        let err = rename_chat(&config, "1", "   ", None).await.unwrap_err();
        assert!(err.to_string().contains("Title cannot be empty"));
    }
}
