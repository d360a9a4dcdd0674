//! End-to-end optimistic mutation tests
//!
//! Drives `ChatController` over a real `HttpChatService` pointed at a
//! `wiremock` server, checking the store, navigation and notifications after
//! the backend accepts or refuses each change.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatroll::auth::StaticToken;
use chatroll::commands::chats::rename_chat;
use chatroll::config::{ApiConfig, Config};
use chatroll::navigation::{NavigationState, Navigator, View};
use chatroll::notify::{NotificationLevel, RecordingNotifier};
use chatroll::service::HttpChatService;
use chatroll::store::StoreChange;
use chatroll::{ChatController, ChatStore, ChatSummary, ChatTitle, MutationOutcome, TitleRules};

struct Fixture {
    server: MockServer,
    controller: ChatController,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<NavigationState>,
}

/// Start a backend holding `chats` and load them into a fresh controller
async fn fixture(chats: serde_json::Value, active: Option<&str>) -> Fixture {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chats": chats })))
        .mount(&server)
        .await;

    let config = ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
        token: None,
        use_keyring: false,
    };
    let service =
        HttpChatService::new(&config, Arc::new(StaticToken::new(Some("tok".to_string()))))
            .expect("valid service");

    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(NavigationState::new(
        active
            .map(|id| View::Chat(id.to_string()))
            .unwrap_or_default(),
    ));

    let controller = ChatController::new(
        Arc::new(ChatStore::new()),
        Arc::new(service),
        notifier.clone(),
        navigator.clone(),
    );
    controller.refresh().await.expect("initial load");

    Fixture {
        server,
        controller,
        notifier,
        navigator,
    }
}

fn two_chats() -> serde_json::Value {
    json!([
        { "id": "1", "title": "First", "favorite": false },
        { "id": "2", "title": "Second", "favorite": false }
    ])
}

#[tokio::test]
async fn test_toggle_confirmed_leaves_other_entries_alone() {
    let f = fixture(two_chats(), None).await;
    Mock::given(method("PATCH"))
        .and(path("/chat/2/toggle-chat-fav"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&f.server)
        .await;

    let outcome = f.controller.toggle_favorite("2").await;

    assert_eq!(outcome, MutationOutcome::Confirmed);
    assert_eq!(
        f.controller.store().get_all(),
        vec![
            ChatSummary::new("1", "First", false),
            ChatSummary::new("2", "Second", true)
        ]
    );
}

#[tokio::test]
async fn test_toggle_rejected_writes_optimistic_then_rollback() {
    let f = fixture(json!([{ "id": "1", "title": "A", "favorite": false }]), None).await;
    Mock::given(method("PATCH"))
        .and(path("/chat/1/toggle-chat-fav"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&f.server)
        .await;
    let mut events = f.controller.store().subscribe();

    let outcome = f.controller.toggle_favorite("1").await;

    assert!(outcome.is_rolled_back());
    let optimistic = events.try_recv().expect("optimistic write");
    assert_eq!(optimistic.snapshot, vec![ChatSummary::new("1", "A", true)]);
    let rollback = events.try_recv().expect("rollback write");
    assert_eq!(rollback.snapshot, vec![ChatSummary::new("1", "A", false)]);
    assert!(events.try_recv().is_err());

    let notes = f.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(
        notes[0].message,
        "Failed to update favorite status. Please try again later."
    );
}

#[tokio::test]
async fn test_delete_missing_id_sends_nothing() {
    let f = fixture(two_chats(), None).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&f.server)
        .await;

    let outcome = f.controller.delete("99").await;

    assert_eq!(outcome, MutationOutcome::Skipped);
    assert_eq!(f.controller.store().len(), 2);
}

#[tokio::test]
async fn test_delete_active_rejected_restores_list_and_view() {
    let f = fixture(two_chats(), Some("1")).await;
    Mock::given(method("DELETE"))
        .and(path("/chat/1/delete"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&f.server)
        .await;

    let outcome = f.controller.delete("1").await;

    assert!(outcome.is_rolled_back());
    let ids: Vec<String> = f
        .controller
        .store()
        .get_all()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(f.navigator.current(), View::Chat("1".to_string()));
    assert_eq!(
        f.navigator.history(),
        vec![
            View::Chat("1".to_string()),
            View::NewChat,
            View::Chat("1".to_string())
        ]
    );
}

#[tokio::test]
async fn test_delete_active_confirmed_moves_to_new_chat() {
    let f = fixture(two_chats(), Some("1")).await;
    Mock::given(method("DELETE"))
        .and(path("/chat/1/delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&f.server)
        .await;
    let mut events = f.controller.store().subscribe();

    let outcome = f.controller.delete("1").await;

    assert!(outcome.is_confirmed());
    assert_eq!(
        f.controller.store().get_all(),
        vec![ChatSummary::new("2", "Second", false)]
    );
    assert_eq!(f.navigator.current(), View::NewChat);
    assert_eq!(
        events.try_recv().expect("removal").change,
        StoreChange::Removed {
            id: "1".to_string()
        }
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_invalid_titles_never_reach_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chats": two_chats() })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/chat/1/rename"))
        .and(body_json(json!({ "title": "Road trip" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.use_keyring = false;

    for raw in ["", "   ", "ab", " a "] {
        let err = rename_chat(&config, "1", raw, None).await.unwrap_err();
        assert!(err.to_string().starts_with("Validation error"), "{}", err);
    }

    // Only the valid title loads the list and reaches the rename endpoint.
    rename_chat(&config, "1", "  Road trip ", None)
        .await
        .expect("valid rename");
}

#[tokio::test]
async fn test_rename_rejected_by_backend_rolls_back_title() {
    let f = fixture(two_chats(), None).await;
    Mock::given(method("PATCH"))
        .and(path("/chat/1/rename"))
        .respond_with(ResponseTemplate::new(422).set_body_string("duplicate title"))
        .expect(1)
        .mount(&f.server)
        .await;

    let title = ChatTitle::parse("Second", &TitleRules::default()).unwrap();
    let outcome = f.controller.rename("1", title).await;

    assert!(outcome.is_rolled_back());
    assert_eq!(f.controller.store().get("1").unwrap().title, "First");
    assert_eq!(
        f.notifier.notifications()[0].message,
        "Chat title was rejected: duplicate title"
    );
}
