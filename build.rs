use std::{env, error::Error, fs, path::Path};

use serde::Deserialize;

const CONFIG_FILE: &str = "cfg.toml";
const CONFIG_TEMPLATE: &str = "cfg.toml.example";

/// Environment variables that take precedence over the secrets in the toml file
const ENV_MQTT_USERNAME: &str = "MQTT_USERNAME";
const ENV_MQTT_PASSWORD: &str = "MQTT_PASSWORD";

#[derive(Deserialize)]
struct RawConfig {
    pins: RawPins,
    mqtt: RawMqtt,
    #[serde(default)]
    device: RawDevice,
    rc_switch: RawRcSwitch,
    #[serde(default)]
    buffers: RawBuffers,
}

#[derive(Deserialize)]
struct RawPins {
    wlan_trigger: String,
    rc_switch: String,
}

#[derive(Deserialize)]
struct RawMqtt {
    server: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    channel_basename: String,
    use_ssl: bool,
    #[serde(default)]
    verify_ssl: bool,
}

#[derive(Deserialize, Default)]
struct RawDevice {
    hostname: Option<String>,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    mdns: bool,
}

#[derive(Deserialize)]
struct RawRcSwitch {
    pulse_length: u16,
    min_pulse_length: u16,
    max_pulse_length: u16,
    protocol: u8,
    max_protocol: u8,
    repeat_transmit: u16,
    min_repeat_transmit: u16,
    max_repeat_transmit: u16,
    #[serde(default)]
    tristate: bool,
}

#[derive(Deserialize, Default)]
struct RawBuffers {
    max_length_of_config: Option<usize>,
    max_length_of_binary_code: Option<usize>,
    max_length_of_tristate_code: Option<usize>,
}

/// Accepts "D4", "GPIO4", "IO4" or "4" (case-insensitive) and returns the GPIO number.
fn parse_pin(label: &str) -> Result<u8, String> {
    let upper = label.trim().to_ascii_uppercase();
    let digits = upper
        .strip_prefix("GPIO")
        .or_else(|| upper.strip_prefix("IO"))
        .or_else(|| upper.strip_prefix('D'))
        .unwrap_or(upper.as_str());

    digits
        .parse::<u8>()
        .map_err(|_| format!("invalid pin label {:?}", label))
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if the toml or the secret overrides change
    println!("cargo:rerun-if-changed={}", CONFIG_FILE);
    println!("cargo:rerun-if-changed={}", CONFIG_TEMPLATE);
    println!("cargo:rerun-if-env-changed={}", ENV_MQTT_USERNAME);
    println!("cargo:rerun-if-env-changed={}", ENV_MQTT_PASSWORD);

    let path = if Path::new(CONFIG_FILE).exists() {
        CONFIG_FILE
    } else {
        println!(
            "cargo:warning={} not found, building with {}",
            CONFIG_FILE, CONFIG_TEMPLATE
        );
        CONFIG_TEMPLATE
    };

    // Read and parse
    let toml_str = fs::read_to_string(path)?;
    let raw: RawConfig = toml::from_str(&toml_str)?;

    let wlan_trigger_pin = parse_pin(&raw.pins.wlan_trigger)?;
    let rc_switch_pin = parse_pin(&raw.pins.rc_switch)?;

    // The chip has no environment at runtime, so overrides are baked into the image
    let username = env::var(ENV_MQTT_USERNAME).unwrap_or(raw.mqtt.username);
    let password = env::var(ENV_MQTT_PASSWORD).unwrap_or(raw.mqtt.password);

    // Generate Rust code
    let code = format!(
        r#"
        pub const SETTINGS: Settings<'static> = Settings {{
            wlan_trigger_pin: Pin::new({wlan_pin}),
            rc_switch_pin: Pin::new({rc_pin}),
            hostname: {host:?},
            debug_enabled: {debug},
            mdns_enabled: {mdns},
            mqtt: MqttConfig {{
                server: {server:?},
                username: {user:?},
                password: {pw:?},
                channel_basename: {channel:?},
                use_ssl: {ssl},
                verify_ssl: {verify},
            }},
            rc_switch: RcSwitchConfig {{
                pulse_length: Bounded::new({pulse}, {min_pulse}, {max_pulse}),
                protocol: Bounded::new({proto}, 1, {max_proto}),
                repeat_transmit: Bounded::new({repeat}, {min_repeat}, {max_repeat}),
                tristate_enabled: {tristate},
            }},
            buffers: BufferOverrides {{
                max_length_of_config: {len_config:?},
                max_length_of_binary_code: {len_binary:?},
                max_length_of_tristate_code: {len_tristate:?},
            }},
        }};
    "#,
        wlan_pin = wlan_trigger_pin,
        rc_pin = rc_switch_pin,
        host = raw.device.hostname,
        debug = raw.device.debug,
        mdns = raw.device.mdns,
        server = raw.mqtt.server,
        user = username,
        pw = password,
        channel = raw.mqtt.channel_basename,
        ssl = raw.mqtt.use_ssl,
        verify = raw.mqtt.verify_ssl,
        pulse = raw.rc_switch.pulse_length,
        min_pulse = raw.rc_switch.min_pulse_length,
        max_pulse = raw.rc_switch.max_pulse_length,
        proto = raw.rc_switch.protocol,
        max_proto = raw.rc_switch.max_protocol,
        repeat = raw.rc_switch.repeat_transmit,
        min_repeat = raw.rc_switch.min_repeat_transmit,
        max_repeat = raw.rc_switch.max_repeat_transmit,
        tristate = raw.rc_switch.tristate,
        len_config = raw.buffers.max_length_of_config,
        len_binary = raw.buffers.max_length_of_binary_code,
        len_tristate = raw.buffers.max_length_of_tristate_code,
    );

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("settings.rs");
    fs::write(dest_path, code)?;
    Ok(())
}
