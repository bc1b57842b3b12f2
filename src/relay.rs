//! Webhook relay — verification handshake, dispatch, and forwarding.
//!
//! Flow per delivery:
//! 1. Parse the envelope, verify the pre-shared token (before anything else)
//! 2. `url_verification` → echo the challenge, touching nothing else
//! 3. `event_callback` with a `message` event → filter pipeline → on
//!    acceptance, resolve the permalink and post it to the timeline
//!
//! **Core invariant: the event source only ever sees success or outright
//! request failure.** Rejections and outbound-call failures answer 200 so
//! Slack's retry machinery never re-delivers; they are logged for
//! operators instead.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use secrecy::ExposeSecret;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::error::{SlackError, WebhookError};
use crate::events::{CallbackEvent, EVENT_CALLBACK, EventEnvelope, MessageEvent, URL_VERIFICATION};
use crate::filter::{self, FilterVerdict};
use crate::slack::{ChatApi, PostOptions};

/// Successful outcome of one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookReply {
    /// Handshake: echo this string verbatim as a text/plain body.
    Challenge(String),
    /// Everything else: 200 with an empty body.
    Ok,
}

/// The relay — immutable config plus a shared API client handle.
///
/// Stateless across deliveries; safe to share behind an `Arc`.
pub struct Relay {
    config: RelayConfig,
    api: Arc<dyn ChatApi>,
}

impl Relay {
    pub fn new(config: RelayConfig, api: Arc<dyn ChatApi>) -> Self {
        Self { config, api }
    }

    /// Handle one inbound delivery body.
    ///
    /// Errors here (parse, token mismatch) are the only outcomes the
    /// event source can tell apart from success.
    pub async fn handle(&self, body: &str) -> Result<WebhookReply, WebhookError> {
        let envelope = EventEnvelope::parse(body)?;
        self.verify(&envelope.token)?;

        match envelope.kind.as_str() {
            URL_VERIFICATION => {
                let challenge = envelope
                    .challenge
                    .ok_or(WebhookError::MissingField("challenge"))?;
                info!("Answering URL-verification handshake");
                Ok(WebhookReply::Challenge(challenge))
            }
            EVENT_CALLBACK => {
                match envelope.callback_event()? {
                    CallbackEvent::Message(event) => self.process_message(&event).await,
                    CallbackEvent::Other => {
                        debug!("Ignoring non-message callback event");
                    }
                }
                Ok(WebhookReply::Ok)
            }
            kind => {
                debug!(kind, "Ignoring envelope kind");
                Ok(WebhookReply::Ok)
            }
        }
    }

    /// Authenticity check — runs before classification, for every kind.
    fn verify(&self, token: &str) -> Result<(), WebhookError> {
        if token == self.config.verification_token.expose_secret() {
            Ok(())
        } else {
            Err(WebhookError::TokenMismatch)
        }
    }

    /// Run one message through the filter and log the outcome.
    ///
    /// External-call failures end the request's side effects but are
    /// operator-visible only.
    async fn process_message(&self, event: &MessageEvent) {
        match self.forward_if_eligible(event).await {
            Ok(FilterVerdict::Accepted) => {
                info!(
                    channel = %event.channel,
                    ts = %event.ts,
                    user = %event.user,
                    "Forwarded message to timeline"
                );
            }
            Ok(FilterVerdict::Rejected(rejection)) => {
                debug!(
                    channel = %event.channel,
                    ts = %event.ts,
                    rejection = rejection.label(),
                    "Message filtered out"
                );
            }
            Err(e) => {
                warn!(
                    channel = %event.channel,
                    ts = %event.ts,
                    error = %e,
                    "Dropping message after Slack API failure"
                );
            }
        }
    }

    /// Filter one message; on acceptance, forward its permalink.
    ///
    /// Local checks run first so the channel lookup is skipped for
    /// locally disqualified events.
    pub async fn forward_if_eligible(
        &self,
        event: &MessageEvent,
    ) -> Result<FilterVerdict, SlackError> {
        if let Err(rejection) = filter::local_checks(event) {
            return Ok(FilterVerdict::Rejected(rejection));
        }

        let channel = self.api.channel_metadata(&event.channel).await?;
        if let FilterVerdict::Rejected(rejection) = filter::evaluate(event, &channel.name) {
            return Ok(FilterVerdict::Rejected(rejection));
        }

        let permalink = self.api.permalink(&event.channel, &event.ts).await?;
        self.api
            .post_message(
                &self.config.timeline_channel,
                &permalink,
                PostOptions::unfurl_all(),
            )
            .await?;

        Ok(FilterVerdict::Accepted)
    }
}

// ── HTTP surface ────────────────────────────────────────────────────

/// Build the webhook routes.
pub fn webhook_routes(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/slack/events", post(receive_event))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// POST /slack/events
///
/// Takes the raw body so parsing (and its 400) stays ours rather than
/// the framework's. Failure bodies are empty: no reason is leaked.
async fn receive_event(State(relay): State<Arc<Relay>>, body: String) -> Response {
    match relay.handle(&body).await {
        Ok(WebhookReply::Challenge(challenge)) => {
            ([(header::CONTENT_TYPE, "text/plain")], challenge).into_response()
        }
        Ok(WebhookReply::Ok) => StatusCode::OK.into_response(),
        Err(WebhookError::TokenMismatch) => {
            warn!("Rejecting delivery with bad verification token");
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(e) => {
            warn!(error = %e, "Rejecting malformed delivery");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
