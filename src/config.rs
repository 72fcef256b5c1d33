//! Bridge configuration: the build-time settings table, and the validated
//! [`Config`] the rest of the firmware reads from.

use log::LevelFilter;

use crate::constants::{
    BUFFER_LENGTH_OFFSET, DEFAULT_HOSTNAME, MQTT_PORT, MQTT_TLS_PORT, RC_MIN_PROTOCOL,
};
use crate::error::{Error, Field, Violations};
use crate::pin::Pin;

/// A value with the inclusive bounds it must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounded<T> {
    pub value: T,
    pub min: T,
    pub max: T,
}

impl<T> Bounded<T> {
    pub const fn new(value: T, min: T, max: T) -> Self {
        Self { value, min, max }
    }
}

impl<T> Bounded<T>
where
    T: Copy + PartialOrd + Into<u32>,
{
    pub fn in_bounds(&self) -> bool {
        self.min <= self.value && self.value <= self.max
    }

    fn check(&self, field: Field) -> Option<Error> {
        if self.in_bounds() {
            return None;
        }
        Some(Error::OutOfRange {
            field,
            value: self.value.into(),
            min: self.min.into(),
            max: self.max.into(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MqttConfig<'a> {
    // MQTT broker hostname or IP address
    pub server: &'a str,

    // MQTT username, empty if the broker allows anonymous clients
    pub username: &'a str,

    // MQTT password, empty if the broker allows anonymous clients
    pub password: &'a str,

    // Prefix of every topic the bridge subscribes to
    pub channel_basename: &'a str,

    // Connect over TLS
    pub use_ssl: bool,

    // Verify the broker certificate, only meaningful with `use_ssl`
    pub verify_ssl: bool,
}

impl MqttConfig<'_> {
    /// Broker port implied by the transport: 8883 for TLS, 1883 otherwise.
    pub const fn derived_port(&self) -> u16 {
        if self.use_ssl {
            MQTT_TLS_PORT
        } else {
            MQTT_PORT
        }
    }

    pub const fn verifies_certificate(&self) -> bool {
        self.use_ssl && self.verify_ssl
    }
}

/// Timing parameters handed to the RC switch driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RcSwitchConfig {
    /// Pulse length in microseconds
    pub pulse_length: Bounded<u16>,

    /// Protocol number; checked against `RC_MIN_PROTOCOL` regardless of `min`
    pub protocol: Bounded<u8>,

    /// Number of times each code is repeated
    pub repeat_transmit: Bounded<u16>,

    /// Accept tristate codes in addition to binary ones
    pub tristate_enabled: bool,
}

/// Explicit buffer lengths from the settings file. Unset lengths are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferOverrides {
    pub max_length_of_config: Option<usize>,
    pub max_length_of_binary_code: Option<usize>,
    pub max_length_of_tristate_code: Option<usize>,
}

/// Command buffer lengths, all coupled to the MQTT client's subscription data length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits {
    pub subscription_data_len: usize,
    pub max_length_of_config: usize,
    pub max_length_of_binary_code: usize,
    /// Present only when tristate codes are enabled
    pub max_length_of_tristate_code: Option<usize>,
}

impl BufferLimits {
    /// Lengths saturate when the subscription data length is too large to
    /// hold the offset; validation then reports them as mismatched.
    pub const fn derive(subscription_data_len: usize, tristate_enabled: bool) -> Self {
        let len = subscription_data_len.saturating_add(BUFFER_LENGTH_OFFSET);
        Self {
            subscription_data_len,
            max_length_of_config: len,
            max_length_of_binary_code: len,
            max_length_of_tristate_code: if tristate_enabled { Some(len) } else { None },
        }
    }

    /// `None` if the subscription data length leaves no room for the offset.
    pub const fn expected_length(&self) -> Option<usize> {
        self.subscription_data_len.checked_add(BUFFER_LENGTH_OFFSET)
    }
}

/// The raw settings table, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings<'a> {
    pub wlan_trigger_pin: Pin,
    pub rc_switch_pin: Pin,
    pub hostname: Option<&'a str>,
    pub debug_enabled: bool,
    pub mdns_enabled: bool,
    pub mqtt: MqttConfig<'a>,
    pub rc_switch: RcSwitchConfig,
    pub buffers: BufferOverrides,
}

/// Validated configuration. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config<'a> {
    // Button that starts Wi-Fi provisioning
    pub wlan_trigger_pin: Pin,

    // Data line of the 433 MHz transmitter
    pub rc_switch_pin: Pin,

    // DHCP and mDNS hostname
    pub hostname: &'a str,

    // Enables debug level diagnostics
    pub debug_enabled: bool,

    // Registers the device with mDNS
    pub mdns_enabled: bool,

    pub mqtt: MqttConfig<'a>,

    pub rc_switch: RcSwitchConfig,

    pub buffers: BufferLimits,
}

impl<'a> Config<'a> {
    /// Resolve `settings` against the MQTT client's subscription data length.
    ///
    /// Fails with every violation found, not just the first one.
    pub fn load(settings: &Settings<'a>, subscription_data_len: usize) -> Result<Self, Violations> {
        let derived =
            BufferLimits::derive(subscription_data_len, settings.rc_switch.tristate_enabled);
        let overrides = settings.buffers;

        let buffers = BufferLimits {
            subscription_data_len,
            max_length_of_config: overrides
                .max_length_of_config
                .unwrap_or(derived.max_length_of_config),
            max_length_of_binary_code: overrides
                .max_length_of_binary_code
                .unwrap_or(derived.max_length_of_binary_code),
            max_length_of_tristate_code: overrides
                .max_length_of_tristate_code
                .or(derived.max_length_of_tristate_code),
        };

        let hostname = settings
            .hostname
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_HOSTNAME);

        let config = Self {
            wlan_trigger_pin: settings.wlan_trigger_pin,
            rc_switch_pin: settings.rc_switch_pin,
            hostname,
            debug_enabled: settings.debug_enabled,
            mdns_enabled: settings.mdns_enabled,
            mqtt: settings.mqtt,
            rc_switch: settings.rc_switch,
            buffers,
        };

        let violations = config.validate();
        if violations.is_empty() {
            Ok(config)
        } else {
            Err(violations)
        }
    }

    pub const fn derived_port(&self) -> u16 {
        self.mqtt.derived_port()
    }

    /// Check every invariant and collect all violations.
    pub fn validate(&self) -> Violations {
        let mut violations = Violations::new();

        self.check_required(&mut violations);
        self.check_pins(&mut violations);
        self.check_ranges(&mut violations);
        self.check_buffers(&mut violations);

        violations
    }

    fn check_required(&self, violations: &mut Violations) {
        if self.mqtt.server.trim().is_empty() {
            report(violations, Error::MissingField(Field::MqttServer));
        }
        if self.mqtt.channel_basename.trim().is_empty() {
            report(violations, Error::MissingField(Field::ChannelBasename));
        }
    }

    fn check_pins(&self, violations: &mut Violations) {
        if !self.wlan_trigger_pin.is_digital_io() {
            report(
                violations,
                Error::InvalidPin {
                    field: Field::WlanTriggerPin,
                    pin: self.wlan_trigger_pin,
                },
            );
        }
        if !self.rc_switch_pin.is_output() {
            report(
                violations,
                Error::InvalidPin {
                    field: Field::RcSwitchPin,
                    pin: self.rc_switch_pin,
                },
            );
        }
        if self.wlan_trigger_pin == self.rc_switch_pin {
            report(
                violations,
                Error::PinConflict {
                    pin: self.rc_switch_pin,
                },
            );
        }
    }

    fn check_ranges(&self, violations: &mut Violations) {
        let rc = &self.rc_switch;
        let checks = [
            rc.pulse_length.check(Field::RcPulseLength),
            Bounded::new(rc.protocol.value, RC_MIN_PROTOCOL, rc.protocol.max)
                .check(Field::RcProtocol),
            rc.repeat_transmit.check(Field::RcRepeatTransmit),
        ];
        for err in checks.into_iter().flatten() {
            report(violations, err);
        }
    }

    fn check_buffers(&self, violations: &mut Violations) {
        let expected = self.buffers.expected_length();

        let lengths = [
            (Field::MaxLengthOfConfig, self.buffers.max_length_of_config),
            (
                Field::MaxLengthOfBinaryCode,
                self.buffers.max_length_of_binary_code,
            ),
        ];
        for (field, actual) in lengths {
            if Some(actual) != expected {
                report(
                    violations,
                    Error::LengthMismatch {
                        field,
                        expected,
                        actual: Some(actual),
                    },
                );
            }
        }

        let expected_tristate = if self.rc_switch.tristate_enabled {
            expected
        } else {
            None
        };
        if self.buffers.max_length_of_tristate_code != expected_tristate {
            report(
                violations,
                Error::LengthMismatch {
                    field: Field::MaxLengthOfTristateCode,
                    expected: expected_tristate,
                    actual: self.buffers.max_length_of_tristate_code,
                },
            );
        }
    }

    /// Log level implied by the debug flag.
    pub fn log_level(&self) -> LevelFilter {
        if self.debug_enabled {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Log the loaded values. The password is never logged.
    pub fn log_summary(&self) {
        log::info!(
            "Hostname: {} (mDNS {})",
            self.hostname,
            if self.mdns_enabled { "on" } else { "off" }
        );
        log::info!(
            "Wi-Fi trigger on {}, RC switch on {}",
            self.wlan_trigger_pin,
            self.rc_switch_pin
        );
        log::info!(
            "MQTT broker {}:{} (TLS: {}, verify: {}), channel {:?}",
            self.mqtt.server,
            self.derived_port(),
            self.mqtt.use_ssl,
            self.mqtt.verifies_certificate(),
            self.mqtt.channel_basename
        );
        log::debug!("MQTT username: {:?}", self.mqtt.username);
        log::info!(
            "RC switch: pulse {}us, protocol {}, repeat {}, tristate {}",
            self.rc_switch.pulse_length.value,
            self.rc_switch.protocol.value,
            self.rc_switch.repeat_transmit.value,
            self.rc_switch.tristate_enabled
        );
        log::debug!("Buffer limits: {:?}", self.buffers);
    }
}

fn report(violations: &mut Violations, err: Error) {
    if violations.push(err).is_err() {
        log::warn!("Too many configuration violations, dropping: {}", err);
    }
}

// settings are generated at compile time from cfg.toml
include!(concat!(env!("OUT_DIR"), "/settings.rs"));
