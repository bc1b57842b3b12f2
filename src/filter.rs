//! Eligibility filter for message events.
//!
//! Decides whether a message belongs in the timeline, checking in a
//! fixed order and short-circuiting on the first failure:
//! 1. Public channel only (`channel_type == "channel"`)
//! 2. No bot authors (forwarding-loop guard)
//! 3. No thread replies
//! 4. No subtypes except `file_share`
//! 5. Channel name starts with `times-`
//!
//! Checks 1–4 are local; check 5 needs the channel's resolved name, which
//! costs one API call, so the caller only resolves it when 1–4 pass.

use crate::events::MessageEvent;

/// Channel-name prefix that marks a personal timeline channel.
pub const TIMES_PREFIX: &str = "times-";

/// The one message subtype allowed through (file uploads).
pub const ALLOWED_SUBTYPE: &str = "file_share";

/// Channel-type tag of an ordinary public channel.
const PUBLIC_CHANNEL_TYPE: &str = "channel";

/// Why a message was excluded from the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Posted outside an ordinary public channel (DM, private group, ...).
    NotPublicChannel,
    /// Authored by a bot — forwarding it could re-trigger the relay.
    BotMessage,
    /// A reply inside a thread, not a top-level message.
    ThreadMessage,
    /// Carries a subtype other than the `file_share` allowlist entry.
    HasSubType,
    /// The channel's name lacks the `times-` prefix.
    NotTimesChannel,
}

impl Rejection {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotPublicChannel => "not_public_channel",
            Self::BotMessage => "bot_message",
            Self::ThreadMessage => "thread_message",
            Self::HasSubType => "has_subtype",
            Self::NotTimesChannel => "not_times_channel",
        }
    }
}

/// Outcome of running a message through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Forward the message's permalink to the timeline.
    Accepted,
    /// Drop the message. Logged, never surfaced to the event source.
    Rejected(Rejection),
}

/// Run the local checks (1–4). No I/O; cheap enough for every delivery.
pub fn local_checks(event: &MessageEvent) -> Result<(), Rejection> {
    if event.channel_type != PUBLIC_CHANNEL_TYPE {
        return Err(Rejection::NotPublicChannel);
    }
    if !event.bot_id.is_empty() {
        return Err(Rejection::BotMessage);
    }
    if !event.thread_ts.is_empty() {
        return Err(Rejection::ThreadMessage);
    }
    if !event.subtype.is_empty() && event.subtype != ALLOWED_SUBTYPE {
        return Err(Rejection::HasSubType);
    }
    Ok(())
}

/// Check 5: the resolved channel name must follow the `times-` convention.
pub fn channel_name_check(channel_name: &str) -> Result<(), Rejection> {
    if channel_name.starts_with(TIMES_PREFIX) {
        Ok(())
    } else {
        Err(Rejection::NotTimesChannel)
    }
}

/// Full verdict for a message and its resolved channel name.
///
/// Pure function of its inputs — the external lookup happens in the
/// caller, and only when `local_checks` has already passed.
pub fn evaluate(event: &MessageEvent, channel_name: &str) -> FilterVerdict {
    match local_checks(event).and_then(|()| channel_name_check(channel_name)) {
        Ok(()) => FilterVerdict::Accepted,
        Err(rejection) => FilterVerdict::Rejected(rejection),
    }
}
