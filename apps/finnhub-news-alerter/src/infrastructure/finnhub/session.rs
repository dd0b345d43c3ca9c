//! Feed Session
//!
//! One WebSocket session against the Finnhub news feed. The transition
//! logic lives in [`SessionMachine`], a transport-free state machine
//! whose event methods return the side effects to perform; the
//! [`FeedSession`] driver executes those effects against a live
//! connection. A session never reconnects on its own; it runs to
//! termination and reports the outcome to its supervisor.
//!
//! # Lifecycle
//!
//! ```text
//! Disconnected -> Connecting -> Authenticated -> Subscribed -> Streaming
//!                     |               |               |            |
//!                     +---------------+---------------+------------+--> Closing
//! ```

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::application::services::IngestionPipeline;
use crate::domain::article::Article;

use super::codec::JsonCodec;
use super::messages::{AuthRequest, FeedMessage, SubscribeRequest, WireArticle};

// =============================================================================
// Connection State
// =============================================================================

/// Lifecycle state of the feed connection.
///
/// Exactly one state holds at a time; the only success path is
/// `Connecting → Authenticated → Subscribed → Streaming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No transport established.
    #[default]
    Disconnected,
    /// Transport dial in progress.
    Connecting,
    /// Auth frame sent.
    Authenticated,
    /// All subscription frames sent.
    Subscribed,
    /// Receive loop active.
    Streaming,
    /// Session ended; awaiting supervisor action.
    Closing,
}

impl ConnectionState {
    /// Whether the session reached the receive loop.
    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }
}

// =============================================================================
// Events and Effects
// =============================================================================

/// Transport-level events driving the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Transport connection established.
    Opened,
    /// A decoded inbound frame.
    Frame(FeedMessage),
    /// Server closed the connection.
    Closed {
        /// Close code, when the server sent one.
        code: Option<u16>,
        /// Close reason, empty if none was given.
        reason: String,
    },
    /// Transport-level failure.
    TransportError(String),
}

/// Outbound frame requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Authentication frame.
    Auth(AuthRequest),
    /// Topic subscription frame.
    Subscribe(SubscribeRequest),
}

/// Side effects requested by a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a frame over the transport.
    Send(OutboundFrame),
    /// Forward an article to the ingestion pipeline.
    Forward(WireArticle),
    /// Report session termination to the supervisor.
    Terminate,
}

// =============================================================================
// State Machine
// =============================================================================

/// Transport-free session state machine.
///
/// Each event maps to one transition returning the next state (held
/// internally) plus the side effects to perform, so the logic is
/// testable without a live connection. Events that are invalid for the
/// current state produce no effects and no transition.
#[derive(Debug)]
pub struct SessionMachine {
    state: ConnectionState,
    token: String,
    topics: Vec<String>,
}

impl SessionMachine {
    /// Create a machine for the given credential and topic list.
    #[must_use]
    pub fn new(token: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            token: token.into(),
            topics,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Mark the transport dial as started.
    ///
    /// `Disconnected → Connecting`; no effect in any other state.
    pub fn begin_connect(&mut self) {
        if self.state == ConnectionState::Disconnected {
            self.state = ConnectionState::Connecting;
        }
    }

    /// Mark the handshake as flushed and the receive loop as entered.
    ///
    /// `Subscribed → Streaming`; no effect in any other state.
    pub fn begin_streaming(&mut self) {
        if self.state == ConnectionState::Subscribed {
            self.state = ConnectionState::Streaming;
        }
    }

    /// Apply one event, returning the side effects to perform.
    pub fn on_event(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::Opened => self.on_opened(),
            SessionEvent::Frame(frame) => self.on_frame(frame),
            SessionEvent::Closed { code, reason } => {
                tracing::info!(?code, %reason, "Feed connection closed");
                self.close()
            }
            SessionEvent::TransportError(err) => {
                tracing::warn!(error = %err, "Feed transport error");
                self.close()
            }
        }
    }

    /// Handshake: auth frame first, then one subscribe per topic in
    /// listed order.
    fn on_opened(&mut self) -> Vec<Effect> {
        if self.state != ConnectionState::Connecting {
            return Vec::new();
        }

        let mut effects =
            vec![Effect::Send(OutboundFrame::Auth(AuthRequest::new(self.token.clone())))];
        self.state = ConnectionState::Authenticated;

        for topic in &self.topics {
            effects.push(Effect::Send(OutboundFrame::Subscribe(SubscribeRequest::new(
                topic.clone(),
            ))));
        }
        self.state = ConnectionState::Subscribed;

        effects
    }

    fn on_frame(&mut self, frame: FeedMessage) -> Vec<Effect> {
        if self.state != ConnectionState::Streaming {
            return Vec::new();
        }

        match frame {
            FeedMessage::News(news) => news.data.into_iter().map(Effect::Forward).collect(),
            // Keepalives and unknown message types carry nothing for us.
            FeedMessage::Ping | FeedMessage::Other => Vec::new(),
        }
    }

    fn close(&mut self) -> Vec<Effect> {
        self.state = ConnectionState::Closing;
        vec![Effect::Terminate]
    }
}

// =============================================================================
// Session Error
// =============================================================================

/// Errors terminating a feed session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Connection or handshake failed.
    #[error("feed connection failed: {0}")]
    ConnectionFailed(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Server ended the session.
    #[error("connection closed by server")]
    ConnectionClosed,
}

// =============================================================================
// Session Driver
// =============================================================================

/// Drives one session over a live transport.
pub struct FeedSession {
    url: String,
    machine: SessionMachine,
    codec: JsonCodec,
    pipeline: Arc<IngestionPipeline>,
    cancel: CancellationToken,
    reached_streaming: bool,
}

impl FeedSession {
    /// Create a session for one connection attempt.
    ///
    /// `url` must already carry the auth token as a query parameter;
    /// the machine additionally sends the in-band auth frame.
    #[must_use]
    pub fn new(
        url: String,
        token: impl Into<String>,
        topics: Vec<String>,
        pipeline: Arc<IngestionPipeline>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            url,
            machine: SessionMachine::new(token, topics),
            codec: JsonCodec::new(),
            pipeline,
            cancel,
            reached_streaming: false,
        }
    }

    /// Whether this session got as far as the receive loop.
    ///
    /// Used by the supervisor to reset its backoff after a session that
    /// was healthy before it died.
    #[must_use]
    pub const fn reached_streaming(&self) -> bool {
        self.reached_streaming
    }

    /// Run the session to termination.
    ///
    /// Returns `Ok(())` only when cancelled; every other outcome is a
    /// [`SessionError`] for the supervisor to act on.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the dial, handshake, or transport
    /// fails, or when the server closes the connection.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        let cancel = self.cancel.clone();

        self.machine.begin_connect();
        tracing::info!("Connecting to news feed");

        let (ws_stream, _response) = tokio_tungstenite::connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        let effects = self.machine.on_event(SessionEvent::Opened);
        self.apply_effects(effects, &mut write).await?;

        self.machine.begin_streaming();
        self.reached_streaming = true;
        tracing::info!(topics = self.machine.topics.len(), "News feed streaming");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Feed session cancelled");
                    return Ok(());
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match self.codec.decode(&text) {
                                Ok(frame) => {
                                    let effects =
                                        self.machine.on_event(SessionEvent::Frame(frame));
                                    if self.apply_effects(effects, &mut write).await? {
                                        return Err(SessionError::ConnectionClosed);
                                    }
                                }
                                Err(e) => {
                                    // Malformed single message is not fatal.
                                    tracing::warn!(error = %e, "Dropping malformed frame");
                                }
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (Some(u16::from(f.code)), f.reason.to_string()))
                                .unwrap_or((None, String::new()));
                            let _ = self.machine.on_event(SessionEvent::Closed { code, reason });
                            return Err(SessionError::ConnectionClosed);
                        }
                        Some(Ok(_)) => {
                            // Binary and pong frames carry nothing for us.
                        }
                        Some(Err(e)) => {
                            let _ = self
                                .machine
                                .on_event(SessionEvent::TransportError(e.to_string()));
                            return Err(e.into());
                        }
                        None => {
                            let _ = self.machine.on_event(SessionEvent::Closed {
                                code: None,
                                reason: "stream ended".to_string(),
                            });
                            return Err(SessionError::ConnectionClosed);
                        }
                    }
                }
            }
        }
    }

    /// Execute the machine's side effects; returns true if the machine
    /// requested termination.
    async fn apply_effects<W>(
        &self,
        effects: Vec<Effect>,
        write: &mut W,
    ) -> Result<bool, SessionError>
    where
        W: SinkExt<Message> + Unpin,
        W::Error: std::fmt::Display,
    {
        let mut terminate = false;

        for effect in effects {
            match effect {
                Effect::Send(frame) => self.send_frame(frame, write).await?,
                Effect::Forward(article) => {
                    self.pipeline.handle(Article::from(article)).await;
                }
                Effect::Terminate => terminate = true,
            }
        }

        Ok(terminate)
    }

    async fn send_frame<W>(&self, frame: OutboundFrame, write: &mut W) -> Result<(), SessionError>
    where
        W: SinkExt<Message> + Unpin,
        W::Error: std::fmt::Display,
    {
        let json = match &frame {
            OutboundFrame::Auth(req) => {
                tracing::debug!("Sending auth frame");
                self.codec.encode(req)
            }
            OutboundFrame::Subscribe(req) => {
                tracing::info!(topic = %req.symbol, "Subscribing to feed topic");
                self.codec.encode(req)
            }
        }
        .map_err(|e| SessionError::ConnectionFailed(format!("failed to serialize frame: {e}")))?;

        write
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| SessionError::ConnectionFailed(format!("failed to send frame: {e}")))
    }
}
