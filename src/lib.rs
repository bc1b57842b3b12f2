//! Woodpecker — relays `times-*` channel messages into one timeline.

pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod relay;
pub mod slack;
