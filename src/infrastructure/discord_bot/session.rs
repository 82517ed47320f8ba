use crate::infrastructure::discord_bot::bot::{AppContext, run_bot};
use crate::infrastructure::settings::Settings;
use serenity::gateway::GatewayError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub const RETRY_BACKOFF: Duration = Duration::from_secs(10);
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFailure {
    RateLimited,
    InvalidToken,
    Transient,
}

impl SessionFailure {
    pub fn classify(err: &serenity::Error) -> Self {
        match err {
            serenity::Error::Gateway(GatewayError::InvalidAuthentication) => {
                SessionFailure::InvalidToken
            }
            serenity::Error::Http(http_err) => match http_err.status_code().map(|s| s.as_u16()) {
                Some(429) => SessionFailure::RateLimited,
                Some(401) => SessionFailure::InvalidToken,
                _ => SessionFailure::Transient,
            },
            _ => SessionFailure::Transient,
        }
    }

    /// How long to wait before reconnecting.
    pub fn backoff(self) -> Duration {
        match self {
            SessionFailure::RateLimited => RATE_LIMIT_BACKOFF,
            SessionFailure::Transient | SessionFailure::InvalidToken => RETRY_BACKOFF,
        }
    }
}

/// Keep a gateway session alive, reconnecting with backoff. Never returns.
pub async fn run_supervised(settings: &Settings, app: Arc<AppContext>) {
    loop {
        let wait = match run_bot(settings, app.clone()).await {
            Ok(()) => {
                warn!("Gateway session ended, reconnecting");
                RETRY_BACKOFF
            }
            Err(e) => {
                let failure = SessionFailure::classify(&e);
                if failure == SessionFailure::InvalidToken {
                    error!("Discord rejected the bot token, check DISCORD_TOKEN: {}", e);
                } else {
                    error!(?failure, "Gateway session failed: {}", e);
                }
                failure.backoff()
            }
        };

        info!("Reconnecting in {}s", wait.as_secs());
        tokio::time::sleep(wait).await;
    }
}
