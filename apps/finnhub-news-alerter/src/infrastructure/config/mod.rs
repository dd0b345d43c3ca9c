//! Configuration
//!
//! Settings loaded from environment variables at startup.

mod settings;

pub use settings::{
    AlerterConfig, ConfigError, FilterSettings, ReconnectSettings, Secrets, DEFAULT_KEYWORDS,
    DEFAULT_TOPICS,
};
