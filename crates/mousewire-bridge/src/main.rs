//! MouseWire bridge entry point.
//!
//! Parses the command line, merges it over the optional TOML config,
//! initialises logging, opens the two external collaborators, and hands
//! control to the session loop.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::parse() + load_config()  -- flags override file over defaults
//!  └─ UdpDatagramSource::bind()     -- the datagram source
//!  └─ HidDevice::open()             -- the device sink
//!  └─ BridgeSession::run()          -- runs until a collaborator fails
//! ```
//!
//! The loop runs forever by design; the only exits are a fatal source or
//! sink error (non-zero exit through `anyhow`) or external termination.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mousewire_bridge::application::session::{BridgeSession, SessionConfig};
use mousewire_bridge::infrastructure::{
    device::HidDevice,
    network::UdpDatagramSource,
    storage::config::{load_config, BridgeConfig},
};
use mousewire_core::ProtocolMode;

#[derive(Parser)]
#[command(
    name = "mousewire-bridge",
    about = "Bridges a UDP pointer protocol onto a local HID mouse device",
    version
)]
struct Cli {
    /// Maximum addressable x coordinate (absolute mode)
    #[arg(long)]
    width: Option<i32>,

    /// Maximum addressable y coordinate (absolute mode)
    #[arg(long)]
    height: Option<i32>,

    /// HID mouse device file to write to
    #[arg(long)]
    device: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// UDP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Wire variant the senders speak: absolute or relative
    #[arg(long)]
    mode: Option<ProtocolMode>,

    /// TOML configuration file; flags given here override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Folds the given flags over the file-or-default configuration.
    fn apply_to(&self, config: &mut BridgeConfig) {
        if let Some(width) = self.width {
            config.screen.width = width;
        }
        if let Some(height) = self.height {
            config.screen.height = height;
        }
        if let Some(device) = &self.device {
            config.device.path = device.clone();
        }
        if let Some(host) = &self.host {
            config.network.bind_address = host.clone();
        }
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(mode) = self.mode {
            config.runtime.mode = mode;
        }
        if let Some(level) = &self.log_level {
            config.runtime.log_level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };
    cli.apply_to(&mut config);
    config.validate()?;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.runtime.log_level)),
        )
        .init();

    info!("MouseWire bridge starting");

    let source =
        UdpDatagramSource::bind(&config.network.bind_address, config.network.port).await?;
    let sink = HidDevice::open(&config.device.path).await?;

    let session = BridgeSession::new(
        SessionConfig {
            mode: config.runtime.mode,
            bounds: config.screen_bounds(),
            max_step: config.screen.max_step,
            max_senders: config.runtime.max_senders,
        },
        source,
        sink,
    );

    info!(mode = %config.runtime.mode, "MouseWire bridge ready");
    session.run().await?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
