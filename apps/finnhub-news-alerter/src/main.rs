//! Finnhub News Alerter Binary
//!
//! Starts the market-news alerter.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin finnhub-news-alerter
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `FINNHUB_API_KEY`: Finnhub API key
//! - `TELEGRAM_BOT_TOKEN`: Telegram bot token
//! - `TELEGRAM_CHAT_ID`: Telegram destination chat id
//!
//! ## Optional
//! - `NEWS_ALERTER_SYMBOLS`: comma-separated feed topics
//! - `NEWS_ALERTER_KEYWORDS`: comma-separated relevance keywords
//! - `NEWS_ALERTER_DEDUPE_CAPACITY`: bounded dedupe size (default: 0 = unbounded)
//! - `NEWS_ALERTER_RECONNECT_DELAY_SECS`: backoff delay (default: 5)
//! - `RUST_LOG`: log level (default: info)
//!
//! The process exits 1 when required configuration is missing;
//! otherwise it runs until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use finnhub_news_alerter::infrastructure::telemetry;
use finnhub_news_alerter::{
    AlerterConfig, BackoffConfig, DedupeCache, FeedSupervisor, IngestionPipeline, KeywordSet,
    TelegramNotifier,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Delay before restarting a failed supervisor.
const SUPERVISOR_RESTART_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    load_dotenv();
    telemetry::init();

    tracing::info!("Starting Finnhub news alerter");

    let config = match AlerterConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                error = %e,
                "Configuration invalid; set FINNHUB_API_KEY, TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID"
            );
            return Err(e.into());
        }
    };
    log_config(&config);

    let notifier = TelegramNotifier::new(
        &config.secrets.telegram_bot_token,
        config.secrets.telegram_chat_id.clone(),
    )
    .map_err(|e| anyhow!("failed to construct Telegram client: {e}"))?;

    let pipeline = Arc::new(IngestionPipeline::new(
        KeywordSet::new(config.filter.keywords.clone()),
        DedupeCache::with_capacity(config.filter.dedupe_capacity),
        Arc::new(notifier),
        config.filter.summary_placeholder.clone(),
    ));

    let shutdown_token = CancellationToken::new();

    let supervisor = FeedSupervisor::new(
        config.feed_url(),
        config.secrets.finnhub_api_key.clone(),
        config.topics.clone(),
        BackoffConfig::from(&config.reconnect),
        pipeline,
        shutdown_token.clone(),
    );

    // Guard the supervisor itself: once configuration has validated,
    // no runtime fault may end the process.
    let supervisor_token = shutdown_token.clone();
    tokio::spawn(async move {
        loop {
            match supervisor.run().await {
                Ok(()) => break,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        delay_secs = SUPERVISOR_RESTART_DELAY.as_secs(),
                        "Supervisor failed; restarting"
                    );
                    tokio::select! {
                        () = supervisor_token.cancelled() => break,
                        () = tokio::time::sleep(SUPERVISOR_RESTART_DELAY) => {}
                    }
                }
            }
        }
    });

    tracing::info!("News alerter ready");

    await_shutdown(shutdown_token).await;

    tracing::info!("News alerter stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration (secrets redacted by their Debug impl).
fn log_config(config: &AlerterConfig) {
    tracing::info!(
        endpoint = %config.feed_endpoint,
        topics = config.topics.len(),
        keywords = config.filter.keywords.len(),
        dedupe_capacity = config.filter.dedupe_capacity,
        reconnect_delay_secs = config.reconnect.delay_initial.as_secs(),
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
