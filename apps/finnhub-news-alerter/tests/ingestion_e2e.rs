//! Ingestion End-to-End Tests
//!
//! Drives raw feed payloads through the codec, the session state
//! machine, and the ingestion pipeline with a recording notifier:
//! everything except a live transport.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use finnhub_news_alerter::{
    Article, DedupeCache, DeliveryError, IngestionPipeline, JsonCodec, KeywordSet, Notifier,
    SessionMachine,
};
use finnhub_news_alerter::infrastructure::finnhub::{Effect, SessionEvent};

/// Notifier that records every delivery.
#[derive(Default)]
struct RecordingNotifier {
    calls: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, title: &str, body: &str, link: &str) -> Result<(), DeliveryError> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string(), link.to_string()));
        Ok(())
    }
}

struct Harness {
    machine: SessionMachine,
    codec: JsonCodec,
    pipeline: IngestionPipeline,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new(keywords: &[&str]) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let pipeline = IngestionPipeline::new(
            KeywordSet::new(keywords.iter().copied()),
            DedupeCache::unbounded(),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            "No summary available.",
        );

        let mut machine = SessionMachine::new("test-token", vec!["general".to_string()]);
        machine.begin_connect();
        let _ = machine.on_event(SessionEvent::Opened);
        machine.begin_streaming();

        Self {
            machine,
            codec: JsonCodec::new(),
            pipeline,
            notifier,
        }
    }

    /// Feed one raw payload through codec, machine, and pipeline the
    /// way the session driver does: malformed payloads are dropped,
    /// everything else is applied.
    async fn deliver(&mut self, raw: &str) {
        let Ok(frame) = self.codec.decode(raw) else {
            return;
        };

        for effect in self.machine.on_event(SessionEvent::Frame(frame)) {
            if let Effect::Forward(article) = effect {
                self.pipeline.handle(Article::from(article)).await;
            }
        }
    }
}

#[tokio::test]
async fn matching_article_produces_exactly_one_alert() {
    let mut harness = Harness::new(&["rate hike"]);

    harness
        .deliver(
            r#"{"type":"news","data":[{"headline":"Fed hints at rate hike","summary":"","url":"http://x"}]}"#,
        )
        .await;

    let calls = harness.notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Fed hints at rate hike");
    // Empty summary falls back to the configured placeholder.
    assert_eq!(calls[0].1, "No summary available.");
    assert_eq!(calls[0].2, "http://x");
}

#[tokio::test]
async fn duplicate_headline_across_frames_alerts_once() {
    let mut harness = Harness::new(&["rate hike"]);
    let frame =
        r#"{"type":"news","data":[{"headline":"Fed hints at rate hike","summary":"s","url":"http://x"}]}"#;

    harness.deliver(frame).await;
    harness.deliver(frame).await;

    assert_eq!(harness.notifier.calls().len(), 1);
}

#[tokio::test]
async fn duplicate_headline_within_one_frame_alerts_once() {
    let mut harness = Harness::new(&["earnings"]);

    harness
        .deliver(
            r#"{"type":"news","data":[
                {"headline":"Apple earnings beat","url":"http://a"},
                {"headline":"Apple earnings beat","url":"http://b"}
            ]}"#,
        )
        .await;

    assert_eq!(harness.notifier.calls().len(), 1);
}

#[tokio::test]
async fn non_matching_articles_never_alert() {
    let mut harness = Harness::new(&["inflation"]);

    harness
        .deliver(
            r#"{"type":"news","data":[{"headline":"Local bakery opens","summary":"fresh bread","url":"http://x"}]}"#,
        )
        .await;

    assert!(harness.notifier.calls().is_empty());
}

#[tokio::test]
async fn malformed_payload_does_not_stop_the_stream() {
    let mut harness = Harness::new(&["earnings"]);

    harness.deliver("not json at all").await;
    harness.deliver(r#"{"type":"news","data":"wrong shape"}"#).await;
    harness
        .deliver(r#"{"type":"news","data":[{"headline":"Nvidia earnings soar","url":"http://n"}]}"#)
        .await;

    let calls = harness.notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Nvidia earnings soar");
}

#[tokio::test]
async fn unknown_and_ping_frames_are_ignored() {
    let mut harness = Harness::new(&["earnings"]);

    harness.deliver(r#"{"type":"ping"}"#).await;
    harness
        .deliver(r#"{"type":"trade","data":[{"p":189.3,"s":"AAPL"}]}"#)
        .await;

    assert!(harness.notifier.calls().is_empty());
}

#[tokio::test]
async fn whitespace_only_differences_still_deduplicate() {
    let mut harness = Harness::new(&["earnings"]);

    harness
        .deliver(r#"{"type":"news","data":[{"headline":"  Meta earnings jump ","url":"http://m"}]}"#)
        .await;
    harness
        .deliver(r#"{"type":"news","data":[{"headline":"Meta earnings jump","url":"http://m"}]}"#)
        .await;

    assert_eq!(harness.notifier.calls().len(), 1);
}
