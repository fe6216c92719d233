use config::{Config, ConfigError, Environment, File, Value};
use domain::{CommandMap, LogicalAction};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::feed::EngineIoVersion;

pub const DEFAULT_IR_DEVICE: &str = "/dev/lirc0";
pub const DEFAULT_CARRIER_HZ: u32 = 36_000;
pub const DEFAULT_COOLDOWN_MS: u64 = 120;
pub const DEFAULT_SIGNALS_DIR: &str = "signals";
pub const DEFAULT_STREAM_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct IrConfig {
    pub device: String,
    pub carrier_hz: u32,
    pub cooldown: Duration,
    pub signals_dir: PathBuf,
    pub command_map: CommandMap,
}

impl Default for IrConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_IR_DEVICE.to_string(),
            carrier_hz: DEFAULT_CARRIER_HZ,
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            signals_dir: PathBuf::from(DEFAULT_SIGNALS_DIR),
            command_map: CommandMap::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    pub url: String,
    pub eio_version: EngineIoVersion,
    pub request_state: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STREAM_URL.to_string(),
            eio_version: EngineIoVersion::V3,
            request_state: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotifyConfig {
    pub enabled: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmpConfig {
    pub ir: IrConfig,
    pub stream: StreamConfig,
    pub notify: NotifyConfig,
}

impl AmpConfig {
    /// Load layered configuration from `config_dir` and the environment.
    ///
    /// Only unreadable or unparsable sources are errors. Individual settings
    /// that are missing or of the wrong type fall back to their defaults.
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Local config file, e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. AMP__IR__DEVICE=/dev/lirc1)
            .add_source(Environment::with_prefix("AMP").separator("__"))
            .build()?;

        Ok(Self::from_config(&s))
    }

    pub fn from_config(s: &Config) -> Self {
        let ir_defaults = IrConfig::default();
        let stream_defaults = StreamConfig::default();

        let carrier_hz = int_or(s, "ir.carrier", DEFAULT_CARRIER_HZ, |v| {
            u32::try_from(v).ok().filter(|hz| *hz > 0)
        });
        let cooldown_ms = int_or(s, "ir.cooldown_ms", DEFAULT_COOLDOWN_MS, |v| {
            u64::try_from(v).ok()
        });
        let eio_version = int_or(
            s,
            "stream.eio_version",
            stream_defaults.eio_version,
            EngineIoVersion::from_number,
        );

        Self {
            ir: IrConfig {
                device: string_or(s, "ir.device", &ir_defaults.device),
                carrier_hz,
                cooldown: Duration::from_millis(cooldown_ms),
                signals_dir: PathBuf::from(string_or(s, "ir.signals_dir", DEFAULT_SIGNALS_DIR)),
                command_map: command_map(s),
            },
            stream: StreamConfig {
                url: string_or(s, "stream.url", &stream_defaults.url),
                eio_version,
                request_state: bool_or(s, "stream.request_state", stream_defaults.request_state),
            },
            notify: NotifyConfig {
                enabled: bool_or(s, "notify.enabled", true),
            },
        }
    }
}

fn string_or(s: &Config, key: &str, default: &str) -> String {
    match s.get_string(key) {
        Ok(v) if !v.trim().is_empty() => v,
        Ok(_) => {
            warn!(key, default, "Empty configuration value, using default");
            default.to_string()
        }
        Err(ConfigError::NotFound(_)) => default.to_string(),
        Err(e) => {
            warn!(key, default, error = %e, "Invalid configuration value, using default");
            default.to_string()
        }
    }
}

fn int_or<T: Copy + std::fmt::Debug>(
    s: &Config,
    key: &str,
    default: T,
    convert: impl Fn(i64) -> Option<T>,
) -> T {
    match s.get_int(key) {
        Ok(v) => convert(v).unwrap_or_else(|| {
            warn!(key, value = v, default = ?default, "Out of range configuration value, using default");
            default
        }),
        Err(ConfigError::NotFound(_)) => default,
        Err(e) => {
            warn!(key, default = ?default, error = %e, "Invalid configuration value, using default");
            default
        }
    }
}

fn bool_or(s: &Config, key: &str, default: bool) -> bool {
    match s.get_bool(key) {
        Ok(v) => v,
        Err(ConfigError::NotFound(_)) => default,
        Err(e) => {
            warn!(key, default, error = %e, "Invalid configuration value, using default");
            default
        }
    }
}

/// Default command map with `[ir.signals]` overrides applied.
///
/// Keys are matched case-insensitively since the config crate lowercases
/// them. An empty file name removes the action from the map.
fn command_map(s: &Config) -> CommandMap {
    let mut map = CommandMap::default();

    let table = match s.get_table("ir.signals") {
        Ok(table) => table,
        Err(ConfigError::NotFound(_)) => return map,
        Err(e) => {
            warn!(error = %e, "Invalid ir.signals table, using default command map");
            return map;
        }
    };

    for (key, value) in table {
        let Some(action) = LogicalAction::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(&key))
        else {
            warn!(key = %key, "Ignoring signal override for unknown action");
            continue;
        };

        match Value::into_string(value) {
            Ok(file) if file.trim().is_empty() => {
                map.remove(action);
            }
            Ok(file) => map.insert(action, file),
            Err(e) => warn!(action = %action, error = %e, "Invalid signal file name, keeping default"),
        }
    }

    map
}
