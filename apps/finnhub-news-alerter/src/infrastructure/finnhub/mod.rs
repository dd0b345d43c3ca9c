//! Finnhub Streaming Feed Client
//!
//! WebSocket client for Finnhub's real-time news feed:
//!
//! - `messages`: wire-format frame types
//! - `codec`: JSON encode/decode with per-message error containment
//! - `session`: connection state machine and single-session driver
//! - `reconnect`: backoff policy between sessions
//! - `supervisor`: owns the session lifecycle, reconnects forever

/// JSON codec for feed frames.
pub mod codec;

/// Wire-format message types.
pub mod messages;

/// Backoff policy for reconnection.
pub mod reconnect;

/// Connection state machine and session driver.
pub mod session;

/// Session lifecycle supervision.
pub mod supervisor;

pub use codec::{CodecError, JsonCodec};
pub use messages::{AuthRequest, FeedMessage, NewsMessage, SubscribeRequest, WireArticle};
pub use reconnect::{BackoffConfig, BackoffPolicy};
pub use session::{
    ConnectionState, Effect, FeedSession, OutboundFrame, SessionError, SessionEvent, SessionMachine,
};
pub use supervisor::{FeedSupervisor, SupervisorError};
