//! Telegram Adapter Tests
//!
//! Exercises the `TelegramNotifier` against a mock Bot API server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use finnhub_news_alerter::{DeliveryError, Notifier, TelegramNotifier};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn delivers_html_message_to_bot_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_partial_json(serde_json::json!({
            "chat_id": "42",
            "parse_mode": "HTML",
            "disable_web_page_preview": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::with_api_base(&server.uri(), "123:abc", "42").unwrap();
    notifier
        .send("Fed hints at rate hike", "No summary available.", "http://x")
        .await
        .unwrap();
}

#[tokio::test]
async fn message_text_contains_bold_title_and_link() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::with_api_base(&server.uri(), "123:abc", "42").unwrap();
    notifier
        .send("Fed hints at rate hike", "Markets react", "http://x")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("<b>Fed hints at rate hike</b>"));
    assert!(text.contains("Markets react"));
    assert!(text.contains(r#"<a href="http://x">Read more</a>"#));
}

#[tokio::test]
async fn rejection_maps_to_delivery_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "ok": false,
            "description": "Forbidden: bot was blocked by the user"
        })))
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::with_api_base(&server.uri(), "123:abc", "42").unwrap();
    let err = notifier.send("title", "body", "http://x").await.unwrap_err();

    match err {
        DeliveryError::Rejected { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("blocked"));
        }
        other => panic!("expected rejection, got: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_maps_to_transport_error() {
    // Nothing listens on this port.
    let notifier =
        TelegramNotifier::with_api_base("http://127.0.0.1:9", "123:abc", "42").unwrap();
    let err = notifier.send("title", "body", "http://x").await.unwrap_err();

    assert!(matches!(err, DeliveryError::Transport(_)));
}
