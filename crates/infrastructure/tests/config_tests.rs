use config::{Config, File, FileFormat};
use domain::LogicalAction;
use infrastructure::config::{AmpConfig, DEFAULT_CARRIER_HZ, DEFAULT_COOLDOWN_MS, DEFAULT_IR_DEVICE};
use infrastructure::feed::EngineIoVersion;
use std::path::PathBuf;
use std::time::Duration;

fn from_toml(toml: &str) -> AmpConfig {
    let s = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .expect("test config should parse");
    AmpConfig::from_config(&s)
}

#[test]
fn empty_config_uses_defaults() {
    let config = from_toml("");
    assert_eq!(config, AmpConfig::default());
    assert_eq!(config.ir.device, DEFAULT_IR_DEVICE);
    assert_eq!(config.ir.carrier_hz, DEFAULT_CARRIER_HZ);
    assert_eq!(config.ir.cooldown, Duration::from_millis(DEFAULT_COOLDOWN_MS));
    assert_eq!(config.stream.eio_version, EngineIoVersion::V3);
    assert!(config.stream.request_state);
    assert!(config.notify.enabled);
}

#[test]
fn explicit_values_are_used() {
    let config = from_toml(
        r#"
        [ir]
        device = "/dev/lirc1"
        carrier = 38000
        cooldown_ms = 1000
        signals_dir = "/opt/amp/signals"

        [stream]
        url = "http://volumio.local:3000"
        eio_version = 4
        request_state = false

        [notify]
        enabled = false
        "#,
    );

    assert_eq!(config.ir.device, "/dev/lirc1");
    assert_eq!(config.ir.carrier_hz, 38000);
    assert_eq!(config.ir.cooldown, Duration::from_millis(1000));
    assert_eq!(config.ir.signals_dir, PathBuf::from("/opt/amp/signals"));
    assert_eq!(config.stream.url, "http://volumio.local:3000");
    assert_eq!(config.stream.eio_version, EngineIoVersion::V4);
    assert!(!config.stream.request_state);
    assert!(!config.notify.enabled);
}

#[test]
fn carrier_given_as_string_is_accepted() {
    let config = from_toml(
        r#"
        [ir]
        carrier = "36000"
        "#,
    );
    assert_eq!(config.ir.carrier_hz, 36000);
}

#[test]
fn wrong_types_fall_back_to_defaults() {
    let config = from_toml(
        r#"
        [ir]
        device = { path = "/dev/lirc1" }
        carrier = "fast"
        cooldown_ms = "soon"

        [stream]
        eio_version = 7
        request_state = "maybe"
        "#,
    );

    assert_eq!(config.ir.device, DEFAULT_IR_DEVICE);
    assert_eq!(config.ir.carrier_hz, DEFAULT_CARRIER_HZ);
    assert_eq!(config.ir.cooldown, Duration::from_millis(DEFAULT_COOLDOWN_MS));
    assert_eq!(config.stream.eio_version, EngineIoVersion::V3);
    assert!(config.stream.request_state);
}

#[test]
fn out_of_range_numbers_fall_back_to_defaults() {
    let config = from_toml(
        r#"
        [ir]
        carrier = 0
        cooldown_ms = -5
        "#,
    );
    assert_eq!(config.ir.carrier_hz, DEFAULT_CARRIER_HZ);
    assert_eq!(config.ir.cooldown, Duration::from_millis(DEFAULT_COOLDOWN_MS));
}

#[test]
fn signal_overrides_update_the_command_map() {
    let config = from_toml(
        r#"
        [ir.signals]
        power = "power_toggle.ir"
        volUp = "vol_up_long.ir"
        lineTwo = ""
        bogus = "bogus.ir"
        "#,
    );

    let map = &config.ir.command_map;
    assert_eq!(map.resolve(LogicalAction::Power), Some("power_toggle.ir"));
    assert_eq!(map.resolve(LogicalAction::VolUp), Some("vol_up_long.ir"));
    assert_eq!(map.resolve(LogicalAction::VolDown), Some("vol_down.ir"));
    assert_eq!(map.resolve(LogicalAction::LineTwo), None);
    assert_eq!(map.len(), 6);
}
