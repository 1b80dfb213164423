mod buttons;
mod config;
mod platform;
mod relay;
mod sanitize;
mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, SOURCE_CHANNEL, TARGET_CHANNEL};
use crate::platform::telegram::{self, TelegramTransport};
use crate::relay::Relay;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relaybot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let transport = Arc::new(
        TelegramTransport::connect(&config, &[SOURCE_CHANNEL, TARGET_CHANNEL]).await?,
    );
    let client = transport.client();
    let relay = Arc::new(Relay::new(transport));

    // The update loop runs in the background; the health server keeps the
    // process alive.
    tokio::spawn(async move {
        if let Err(e) = telegram::run(client, relay).await {
            error!("relay loop stopped: {:#}", e);
        }
    });
    info!(
        "relay started, forwarding @{} -> @{}",
        SOURCE_CHANNEL, TARGET_CHANNEL
    );

    server::run(config.port).await
}
