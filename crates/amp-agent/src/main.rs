use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amp_agent::{Args, Bridge, Command, send_action};
use application::InfraredDispatcher;
use domain::IrTransmitter;
use infrastructure::{AmpConfig, IrCtlTransmitter, LogNotifier, SocketIoFeed};

async fn run() -> Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,amp_agent=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("🔈 Amp IR Bridge Starting...");
    info!("🆔 Process ID: {}", std::process::id());

    let config_dir = args.resolve_config_dir();
    info!("📂 Config directory: {}", config_dir);

    let mut config = AmpConfig::load(&config_dir)
        .with_context(|| format!("Failed to load configuration from {}", config_dir))?;
    args.apply_overrides(&mut config);

    info!(
        device = %config.ir.device,
        carrier = config.ir.carrier_hz,
        cooldown_ms = config.ir.cooldown.as_millis() as u64,
        commands = config.ir.command_map.len(),
        "✅ Configuration loaded"
    );

    let transmitter: Arc<dyn IrTransmitter> = Arc::new(IrCtlTransmitter::new());

    match args.command() {
        Command::Run => serve(&config, transmitter).await,
        Command::Send { action } => {
            let dispatcher = InfraredDispatcher::new(transmitter, config.ir.clone());
            let result = send_action(&dispatcher, &action).await;
            dispatcher.shutdown().await;
            result
        }
    }
}

async fn serve(config: &AmpConfig, transmitter: Arc<dyn IrTransmitter>) -> Result<()> {
    info!(
        url = %config.stream.url,
        eio = config.stream.eio_version.as_number(),
        "Connecting to state feed..."
    );

    let feed = Arc::new(SocketIoFeed::new(
        &config.stream.url,
        config.stream.eio_version,
        config.stream.request_state,
    ));

    let bridge = Bridge::new(config, transmitter, feed, Arc::new(LogNotifier));
    bridge.start();

    info!("✅ Bridge running. Press Ctrl-C to stop.");

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutting down..."),
        Err(err) => warn!(error = %err, "Unable to listen for shutdown signal"),
    }

    bridge.shutdown().await;

    info!("👋 Good bye!");
    Ok(())
}

fn main() {
    let result = tokio::runtime::Runtime::new()
        .context("Failed to start the async runtime")
        .and_then(|rt| rt.block_on(run()));

    if let Err(e) = result {
        eprintln!("\n❌ CRITICAL ERROR: {:?}", e);
        std::process::exit(1);
    }
}
