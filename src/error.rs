use core::fmt;

use heapless::Vec;

use crate::pin::Pin;

/// Upper bound on the number of violations a single validation can report
pub const MAX_VIOLATIONS: usize = 16;

/// All violations found by one validation pass, in the order they were checked.
pub type Violations = Vec<Error, MAX_VIOLATIONS>;

/// Configurable fields, as referenced by violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    WlanTriggerPin,
    RcSwitchPin,
    MqttServer,
    ChannelBasename,
    RcPulseLength,
    RcProtocol,
    RcRepeatTransmit,
    MaxLengthOfConfig,
    MaxLengthOfBinaryCode,
    MaxLengthOfTristateCode,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::WlanTriggerPin => "wlan_trigger_pin",
            Field::RcSwitchPin => "rc_switch_pin",
            Field::MqttServer => "mqtt.server",
            Field::ChannelBasename => "mqtt.channel_basename",
            Field::RcPulseLength => "rc_switch.pulse_length",
            Field::RcProtocol => "rc_switch.protocol",
            Field::RcRepeatTransmit => "rc_switch.repeat_transmit",
            Field::MaxLengthOfConfig => "buffers.max_length_of_config",
            Field::MaxLengthOfBinaryCode => "buffers.max_length_of_binary_code",
            Field::MaxLengthOfTristateCode => "buffers.max_length_of_tristate_code",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Broad category of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required value is missing or unusable
    Configuration,
    /// A numeric value lies outside its declared bounds
    Range,
    /// A derived value disagrees with the constant it is derived from
    Consistency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    MissingField(Field),
    InvalidPin {
        field: Field,
        pin: Pin,
    },
    PinConflict {
        pin: Pin,
    },
    OutOfRange {
        field: Field,
        value: u32,
        min: u32,
        max: u32,
    },
    LengthMismatch {
        field: Field,
        expected: Option<usize>,
        actual: Option<usize>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingField(_) | Error::InvalidPin { .. } | Error::PinConflict { .. } => {
                ErrorKind::Configuration
            }
            Error::OutOfRange { .. } => ErrorKind::Range,
            Error::LengthMismatch { .. } => ErrorKind::Consistency,
        }
    }

    /// The field the violation is reported against.
    ///
    /// A pin conflict involves both pins and is reported against the RC switch pin.
    pub fn field(&self) -> Field {
        match *self {
            Error::MissingField(field)
            | Error::InvalidPin { field, .. }
            | Error::OutOfRange { field, .. }
            | Error::LengthMismatch { field, .. } => field,
            Error::PinConflict { .. } => Field::RcSwitchPin,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingField(field) => write!(f, "{} must not be empty", field),
            Error::InvalidPin { field, pin } => {
                write!(f, "{} is not usable on this chip: {}", field, pin)
            }
            Error::PinConflict { pin } => write!(
                f,
                "wlan_trigger_pin and rc_switch_pin are both assigned to {}",
                pin
            ),
            Error::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} = {} is outside {}..={}", field, value, min, max),
            Error::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} is {:?}, expected {:?} (subscription data length + 2)",
                field, actual, expected
            ),
        }
    }
}
