/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hostname announced over DHCP and mDNS when none is configured
pub const DEFAULT_HOSTNAME: &str = "ESP433MHzTransmitter";

/// Default MQTT broker port for plain TCP
pub const MQTT_PORT: u16 = 1883;
/// Default MQTT broker port for TLS
pub const MQTT_TLS_PORT: u16 = 8883;

/// Maximum payload length of a subscription message, owned by the MQTT client.
/// A binary RC code is 24 symbols, so this must be at least 25.
pub const SUBSCRIPTION_DATA_LEN: usize = 25;

/// Command buffers hold the subscription payload plus this many extra bytes
pub const BUFFER_LENGTH_OFFSET: usize = 2;

/// Interval in seconds between heartbeat log lines once started
pub const HEARTBEAT_INTERVAL_SECS: u64 = 3600;

/// RC switch protocols are numbered from 1
pub const RC_MIN_PROTOCOL: u8 = 1;
