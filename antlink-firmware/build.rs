//! Build script for antlink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates radio.toml at compile time
//! - Generates `radio_config.rs` with the validated values as constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    let config = validate_config();
    generate_constants(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Print a boxed build error and abort
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate radio.toml and return the parsed document
fn validate_config() -> toml::Value {
    println!("cargo:rerun-if-changed=radio.toml");

    let config_path = Path::new("radio.toml");
    if !config_path.exists() {
        fail(
            "radio.toml not found!",
            &["Create radio.toml in the antlink-firmware directory".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read radio.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in radio.toml", &[e.to_string()]),
    };

    let mut errors = Vec::new();
    validate_serial(&config, &mut errors);
    validate_link(&config, &mut errors);
    validate_channel(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid radio configuration", &errors);
    }

    config
}

/// Fetch `[section] key` as an integer within `min..=max`
fn integer(config: &toml::Value, section: &str, key: &str, min: i64, max: i64, errors: &mut Vec<String>) {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
        None => errors.push(format!("[{}] missing '{}'", section, key)),
    }
}

fn validate_serial(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(toml::Value::Integer(baud)) = config.get("serial").and_then(|s| s.get("baudrate")) {
        if ![4800, 9600, 19200, 38400, 50000, 57600].contains(baud) {
            errors.push(format!("[serial] baudrate {} is not a radio rate", baud));
        }
    } else {
        errors.push("[serial] missing integer 'baudrate'".to_string());
    }
}

fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    integer(config, "link", "read_timeout_ms", 1, 10_000, errors);
    integer(config, "link", "inter_byte_timeout_ms", 1, 1_000, errors);
    // Sync, length, id, checksum plus at least one payload byte
    integer(config, "link", "max_frame_len", 5, 253, errors);
    integer(config, "link", "stall_threshold", 1, 65_535, errors);
    integer(config, "link", "reset_pulse_ms", 1, 1_000, errors);

    match config.get("link").and_then(|s| s.get("await_startup_after_reset")) {
        Some(toml::Value::Boolean(_)) => {}
        _ => errors.push("[link] missing boolean 'await_startup_after_reset'".to_string()),
    }
}

fn validate_channel(config: &toml::Value, errors: &mut Vec<String>) {
    integer(config, "channel", "channel_number", 0, 255, errors);
    integer(config, "channel", "network_number", 0, 255, errors);
    integer(config, "channel", "device_type", 0, 255, errors);
    integer(config, "channel", "frequency_offset", 0, 124, errors);
    integer(config, "channel", "message_period", 1, 65_535, errors);
    integer(config, "channel", "search_timeout", 0, 255, errors);

    match config.get("channel").and_then(|s| s.get("network_key")) {
        Some(toml::Value::Array(key)) => {
            let bytes_ok = key
                .iter()
                .all(|b| matches!(b, toml::Value::Integer(v) if (0..=255).contains(v)));
            if key.len() != 8 || !bytes_ok {
                errors.push("[channel] network_key must be 8 bytes".to_string());
            }
        }
        _ => errors.push("[channel] missing 'network_key'".to_string()),
    }
}

/// Write the validated values as Rust constants
fn generate_constants(config: &toml::Value) {
    let int = |section: &str, key: &str| -> i64 {
        config[section][key].as_integer().unwrap()
    };
    let key = config["channel"]["network_key"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| format!("0x{:02X}", b.as_integer().unwrap()))
        .collect::<Vec<_>>()
        .join(", ");

    let source = format!(
        "// Generated from radio.toml by build.rs\n\
        \n\
        pub const SERIAL: SerialConfig = SerialConfig {{ baudrate: {baudrate} }};\n\
        \n\
        pub const LINK: LinkConfig = LinkConfig {{\n\
        \x20   sync: SYNC_TX,\n\
        \x20   read_timeout_ms: {read_timeout_ms},\n\
        \x20   inter_byte_timeout_ms: {inter_byte_timeout_ms},\n\
        \x20   max_frame_len: {max_frame_len},\n\
        \x20   stall_threshold: {stall_threshold},\n\
        \x20   reset_pulse_ms: {reset_pulse_ms},\n\
        \x20   await_startup_after_reset: {await_startup},\n\
        }};\n\
        \n\
        pub const CHANNEL: ChannelConfig = ChannelConfig {{\n\
        \x20   channel_number: {channel_number},\n\
        \x20   network_number: {network_number},\n\
        \x20   search_timeout: {search_timeout},\n\
        \x20   device_type: {device_type},\n\
        \x20   frequency_offset: {frequency_offset},\n\
        \x20   message_period: {message_period},\n\
        \x20   network_key: [{key}],\n\
        }};\n",
        baudrate = int("serial", "baudrate"),
        read_timeout_ms = int("link", "read_timeout_ms"),
        inter_byte_timeout_ms = int("link", "inter_byte_timeout_ms"),
        max_frame_len = int("link", "max_frame_len"),
        stall_threshold = int("link", "stall_threshold"),
        reset_pulse_ms = int("link", "reset_pulse_ms"),
        await_startup = config["link"]["await_startup_after_reset"].as_bool().unwrap(),
        channel_number = int("channel", "channel_number"),
        network_number = int("channel", "network_number"),
        search_timeout = int("channel", "search_timeout"),
        device_type = int("channel", "device_type"),
        frequency_offset = int("channel", "frequency_offset"),
        message_period = int("channel", "message_period"),
        key = key,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("radio_config.rs"), source).unwrap();
}
