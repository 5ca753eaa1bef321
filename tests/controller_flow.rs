//! End-to-end conversation flows: controller + real HTTP client against a
//! mock backend server.

use std::sync::Arc;

use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use polichat::backend::HttpChatBackend;
use polichat::config::TimingConfig;
use polichat::controller::ConversationController;
use polichat::events::{ChatEvent, MessageSender};

fn fast_timing() -> TimingConfig {
    TimingConfig {
        typing_tick_ms: 10,
        reply_delay_ms: 20,
        home_delay_ms: 10,
    }
}

fn controller_for(
    url: impl Into<String>,
) -> (ConversationController, mpsc::UnboundedReceiver<ChatEvent>) {
    let backend = Arc::new(HttpChatBackend::new(url.into()));
    ConversationController::new(backend, &fast_timing())
}

/// Feed events into the controller until one passes the predicate, checking
/// the panel-exclusion invariant after every step.
async fn pump_until(
    controller: &mut ConversationController,
    rx: &mut mpsc::UnboundedReceiver<ChatEvent>,
    pred: impl Fn(&ChatEvent) -> bool,
) {
    loop {
        let event = rx.recv().await.expect("event channel closed");
        let done = pred(&event);
        controller.apply(event);
        assert!(
            controller.state().panels_exclusive(),
            "option menu and FAQ list visible at once"
        );
        if done {
            break;
        }
    }
}

#[tokio::test]
async fn fresh_session_shows_greeting_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Bienvenido"))
        .mount(&server)
        .await;

    let (mut controller, mut rx) = controller_for(server.uri());
    controller.open();
    pump_until(&mut controller, &mut rx, |e| {
        matches!(e, ChatEvent::GreetingLoaded { .. })
    })
    .await;

    let state = controller.state();
    assert!(state.is_open);
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].text, "Bienvenido");
    assert_eq!(state.messages[0].sender, MessageSender::Bot);
    assert!(state.show_options);
    assert!(state.is_at_start);
}

#[tokio::test]
async fn selecting_a_category_reveals_its_faq() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Bienvenido"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/category/Carreras"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("¿Cuánto cuesta? ¿Dónde queda?"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, mut rx) = controller_for(server.uri());
    controller.open();
    pump_until(&mut controller, &mut rx, |e| {
        matches!(e, ChatEvent::GreetingLoaded { .. })
    })
    .await;

    controller.send(Some("2".to_string()));
    assert!(controller.state().is_typing);

    pump_until(&mut controller, &mut rx, |e| {
        matches!(e, ChatEvent::FaqReady { .. })
    })
    .await;

    let state = controller.state();
    assert_eq!(
        state.faq_questions,
        vec!["¿Cuánto cuesta?", "¿Dónde queda?"]
    );
    assert!(!state.is_typing);
    assert!(!state.show_options);
    // Only the user's "2" was appended; the raw category body is not a message.
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].text, "2");
}

#[tokio::test]
async fn faq_selection_goes_to_the_free_text_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/respond"))
        .and(body_json(serde_json::json!({ "message": "¿Cuánto cuesta?" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Cuesta poco"))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, mut rx) = controller_for(server.uri());
    controller.send(Some("¿Cuánto cuesta?".to_string()));
    pump_until(&mut controller, &mut rx, |e| {
        matches!(e, ChatEvent::BotReply { .. })
    })
    .await;

    let state = controller.state();
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].text, "Cuesta poco");
    assert_eq!(state.messages[1].sender, MessageSender::Bot);
    assert!(!state.is_typing);
}

#[tokio::test]
async fn home_command_returns_to_start_screen() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Bienvenido"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/respond"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Claro"))
        .mount(&server)
        .await;

    let (mut controller, mut rx) = controller_for(server.uri());
    controller.open();
    pump_until(&mut controller, &mut rx, |e| {
        matches!(e, ChatEvent::GreetingLoaded { .. })
    })
    .await;

    controller.send(Some("hola".to_string()));
    pump_until(&mut controller, &mut rx, |e| {
        matches!(e, ChatEvent::BotReply { .. })
    })
    .await;
    assert!(!controller.state().is_at_start);

    controller.send(Some("INICIO".to_string()));
    pump_until(&mut controller, &mut rx, |e| {
        matches!(e, ChatEvent::GreetingLoaded { .. })
    })
    .await;

    let state = controller.state();
    assert!(state.is_at_start);
    assert!(state.show_options);
    assert_eq!(state.messages.len(), 1);
}

#[tokio::test]
async fn unreachable_backend_leaves_only_the_user_message() {
    let (mut controller, mut rx) = controller_for("http://127.0.0.1:9");

    controller.send(Some("hola".to_string()));
    pump_until(&mut controller, &mut rx, |e| {
        matches!(e, ChatEvent::RequestFailed { .. })
    })
    .await;

    let state = controller.state();
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].text, "hola");
    assert_eq!(state.messages[0].sender, MessageSender::User);
    assert!(!state.is_typing);
    assert!(state.typing_dots.is_empty());
}
