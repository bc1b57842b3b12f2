use std::sync::Arc;

use woodpecker::config::RelayConfig;
use woodpecker::relay::{Relay, webhook_routes};
use woodpecker::slack::SlackClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export SLACK_VERIFICATION_TOKEN=...");
        eprintln!("  export SLACK_BOT_TOKEN=xoxb-...");
        eprintln!("  export TIMELINE_CHANNEL=C...");
        std::process::exit(1);
    });

    eprintln!("🪶 Woodpecker v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Timeline channel: {}", config.timeline_channel);
    eprintln!(
        "   Events endpoint: http://0.0.0.0:{}/slack/events\n",
        config.port
    );

    let api = Arc::new(SlackClient::new(config.bot_token.clone()));
    let relay = Arc::new(Relay::new(config.clone(), api));
    let app = webhook_routes(relay);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
