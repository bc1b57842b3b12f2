//! Startup configuration.
//!
//! Loaded once from the environment and passed by reference — no
//! process-wide mutable state.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default port for the webhook listener.
const DEFAULT_PORT: u16 = 8080;

/// Immutable relay configuration, built once at process start.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Pre-shared Events API verification token.
    pub verification_token: SecretString,
    /// Bot token for the Slack Web API.
    pub bot_token: SecretString,
    /// Channel id the permalinks are forwarded into.
    pub timeline_channel: String,
    /// Port the webhook listener binds to.
    pub port: u16,
}

impl RelayConfig {
    /// Load configuration from the environment.
    ///
    /// Required: `SLACK_VERIFICATION_TOKEN`, `SLACK_BOT_TOKEN`,
    /// `TIMELINE_CHANNEL`. Optional: `WOODPECKER_PORT` (default 8080).
    pub fn from_env() -> Result<Self, ConfigError> {
        let verification_token = require_env("SLACK_VERIFICATION_TOKEN")?;
        let bot_token = require_env("SLACK_BOT_TOKEN")?;
        let timeline_channel = require_env("TIMELINE_CHANNEL")?;

        let port = match std::env::var("WOODPECKER_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "WOODPECKER_PORT".into(),
                message: format!("not a valid port: {raw}"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            verification_token: SecretString::from(verification_token),
            bot_token: SecretString::from(bot_token),
            timeline_channel,
            port,
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}
