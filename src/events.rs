//! Inbound payload model for the Slack Events API.
//!
//! One HTTP delivery carries one `EventEnvelope`. The envelope's `type`
//! distinguishes the one-time URL-verification handshake from event
//! callbacks; a callback wraps exactly one inner event, classified into
//! `CallbackEvent` before dispatch.

use serde::Deserialize;

use crate::error::WebhookError;

/// Envelope `type` for the URL-verification handshake.
pub const URL_VERIFICATION: &str = "url_verification";

/// Envelope `type` for an event callback.
pub const EVENT_CALLBACK: &str = "event_callback";

/// Inner-event `type` for a posted message.
pub const MESSAGE_EVENT: &str = "message";

// ── Outer envelope ──────────────────────────────────────────────────

/// The outer Events API envelope, as delivered in the request body.
///
/// `challenge` is only present on handshakes, `event` only on callbacks;
/// both stay optional so one shape covers every envelope kind.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    /// Envelope kind: `url_verification`, `event_callback`, or other.
    #[serde(rename = "type")]
    pub kind: String,
    /// Pre-shared verification token, present on every delivery.
    #[serde(default)]
    pub token: String,
    /// Challenge string to echo back (handshake only).
    pub challenge: Option<String>,
    /// Raw inner event (callback only). Classified lazily so that
    /// non-callback envelopes never touch it.
    pub event: Option<serde_json::Value>,
}

impl EventEnvelope {
    /// Parse an envelope from the raw request body.
    pub fn parse(body: &str) -> Result<Self, WebhookError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Classify this callback's inner event.
    ///
    /// Returns `CallbackEvent::Other` for a missing event or an unknown
    /// inner-event tag; a `message` event whose body does not match the
    /// expected shape is a parse error.
    pub fn callback_event(&self) -> Result<CallbackEvent, WebhookError> {
        let Some(inner) = &self.event else {
            return Ok(CallbackEvent::Other);
        };

        match inner.get("type").and_then(serde_json::Value::as_str) {
            Some(MESSAGE_EVENT) => {
                let ev: MessageEvent = serde_json::from_value(inner.clone())?;
                Ok(CallbackEvent::Message(ev))
            }
            _ => Ok(CallbackEvent::Other),
        }
    }
}

// ── Inner event ─────────────────────────────────────────────────────

/// Inner event of an `event_callback` envelope.
///
/// Only `message` events are acted on; everything else falls into the
/// no-op `Other` arm.
#[derive(Debug, Clone)]
pub enum CallbackEvent {
    /// A posted message — the only event kind the relay forwards.
    Message(MessageEvent),
    /// Any other inner-event kind (reactions, joins, ...). Accepted
    /// with no action.
    Other,
}

/// A `message` inner event.
///
/// Optional Slack fields deserialize to empty strings so the filter
/// checks read as plain comparisons.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    /// Channel the message was posted in.
    pub channel: String,
    /// Channel-type tag: `channel` (public), `group`, `im`, `mpim`.
    #[serde(default)]
    pub channel_type: String,
    /// Bot id of the author. Empty for human authors.
    #[serde(default)]
    pub bot_id: String,
    /// Timestamp of the thread parent. Empty for top-level messages.
    #[serde(default)]
    pub thread_ts: String,
    /// Message subtype. Empty for plain messages.
    #[serde(default)]
    pub subtype: String,
    /// Message timestamp — with `channel`, the key to its permalink.
    pub ts: String,
    /// Author user id, carried for logging only.
    #[serde(default)]
    pub user: String,
    /// Message text, carried for logging only.
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_handshake_envelope() {
        let env = EventEnvelope::parse(
            r#"{"type":"url_verification","token":"tok","challenge":"abc123"}"#,
        )
        .unwrap();
        assert_eq!(env.kind, URL_VERIFICATION);
        assert_eq!(env.token, "tok");
        assert_eq!(env.challenge.as_deref(), Some("abc123"));
        assert!(env.event.is_none());
    }

    #[test]
    fn parses_message_callback() {
        let env = EventEnvelope::parse(
            r#"{
                "type": "event_callback",
                "token": "tok",
                "event": {
                    "type": "message",
                    "channel": "C123",
                    "channel_type": "channel",
                    "ts": "1700000000.000100",
                    "user": "U42",
                    "text": "hello times"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(env.kind, EVENT_CALLBACK);

        match env.callback_event().unwrap() {
            CallbackEvent::Message(ev) => {
                assert_eq!(ev.channel, "C123");
                assert_eq!(ev.channel_type, "channel");
                assert_eq!(ev.ts, "1700000000.000100");
                assert_eq!(ev.bot_id, "");
                assert_eq!(ev.thread_ts, "");
                assert_eq!(ev.subtype, "");
            }
            CallbackEvent::Other => panic!("expected a message event"),
        }
    }

    #[test]
    fn non_message_inner_event_is_other() {
        let env = EventEnvelope::parse(
            r#"{
                "type": "event_callback",
                "token": "tok",
                "event": {"type": "reaction_added", "user": "U42"}
            }"#,
        )
        .unwrap();
        assert!(matches!(env.callback_event().unwrap(), CallbackEvent::Other));
    }

    #[test]
    fn callback_without_inner_event_is_other() {
        let env =
            EventEnvelope::parse(r#"{"type":"event_callback","token":"tok"}"#).unwrap();
        assert!(matches!(env.callback_event().unwrap(), CallbackEvent::Other));
    }

    #[test]
    fn malformed_message_event_is_parse_error() {
        // A message event must carry channel and ts.
        let env = EventEnvelope::parse(
            r#"{"type":"event_callback","token":"tok","event":{"type":"message"}}"#,
        )
        .unwrap();
        assert!(env.callback_event().is_err());
    }

    #[test]
    fn malformed_body_is_parse_error() {
        assert!(EventEnvelope::parse("not json").is_err());
        assert!(EventEnvelope::parse(r#"{"token":"tok"}"#).is_err());
    }

    #[test]
    fn optional_message_fields_default_to_empty() {
        let ev: MessageEvent = serde_json::from_str(
            r#"{"type":"message","channel":"C1","ts":"1.2"}"#,
        )
        .unwrap();
        assert_eq!(ev.channel_type, "");
        assert_eq!(ev.bot_id, "");
        assert_eq!(ev.thread_ts, "");
        assert_eq!(ev.subtype, "");
        assert_eq!(ev.user, "");
        assert_eq!(ev.text, "");
    }

    #[test]
    fn unknown_envelope_kind_still_parses() {
        let env = EventEnvelope::parse(r#"{"type":"app_rate_limited","token":"tok"}"#)
            .unwrap();
        assert_eq!(env.kind, "app_rate_limited");
    }
}
