//! Error types for Woodpecker.

/// Top-level error type for the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    #[error("Slack API error: {0}")]
    Slack(#[from] SlackError),
}

/// Configuration-related errors. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Inbound webhook errors — the only outcomes the event source can
/// distinguish from success.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Request body does not match the expected envelope shape.
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Envelope kind requires a field the payload lacks.
    #[error("Missing field in payload: {0}")]
    MissingField(&'static str),

    /// Verification token mismatch. The response body never says why.
    #[error("Verification token mismatch")]
    TokenMismatch,
}

/// Outbound Slack Web API errors. Logged for operators, never surfaced
/// to the event source.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    #[error("Transport error calling {method}: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Slack answered `{"ok": false, "error": ...}`.
    #[error("{method} failed: {error}")]
    Api { method: &'static str, error: String },

    /// Slack answered ok but without the field the call exists for.
    #[error("{method} response missing field: {field}")]
    MissingField {
        method: &'static str,
        field: &'static str,
    },
}

/// Result type alias for the relay.
pub type Result<T> = std::result::Result<T, Error>;
