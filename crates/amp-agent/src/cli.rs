use clap::{Parser, Subcommand};
use infrastructure::AmpConfig;
use std::path::Path;
use std::time::Duration;

/// Development layout: `cargo run` from the workspace root
const DEV_CONFIG_DIR: &str = "crates/amp-agent/config";

#[derive(Parser, Debug)]
#[command(author, version, about = "Mirror streamer volume changes onto an IR-controlled amplifier", long_about = None)]
pub struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    /// Override the IR transmitter device node
    #[arg(long)]
    pub device: Option<String>,

    /// Override the IR carrier frequency in Hz
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub carrier: Option<u32>,

    /// Override the post-transmission cooldown
    #[arg(long)]
    pub cooldown_ms: Option<u64>,

    /// Override the push-state endpoint
    #[arg(long)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Watch the state feed and forward volume changes (default)
    Run,
    /// Send a single IR command and exit, e.g. `send power`
    Send {
        /// Action name: power, volUp, volDown, linePhono, lineCd, lineOne, lineTwo
        action: String,
    },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }

    /// The configured directory, falling back to the in-tree one when the
    /// default is missing and we are run from the workspace root.
    pub fn resolve_config_dir(&self) -> String {
        if self.config_dir == "config"
            && !Path::new(&self.config_dir).exists()
            && Path::new(DEV_CONFIG_DIR).exists()
        {
            return DEV_CONFIG_DIR.to_string();
        }
        self.config_dir.clone()
    }

    pub fn apply_overrides(&self, config: &mut AmpConfig) {
        if let Some(device) = &self.device {
            config.ir.device = device.clone();
        }
        if let Some(carrier) = self.carrier {
            config.ir.carrier_hz = carrier;
        }
        if let Some(ms) = self.cooldown_ms {
            config.ir.cooldown = Duration::from_millis(ms);
        }
        if let Some(url) = &self.url {
            config.stream.url = url.clone();
        }
    }
}
