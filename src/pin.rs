//! GPIO identifiers for the ESP32 the firmware runs on.

use core::fmt;

/// Highest GPIO number on the ESP32
const MAX_GPIO: u8 = 39;

/// A GPIO pin, identified by its GPIO number.
///
/// The number is only checked against the chip's capabilities when the
/// configuration is validated, so any `u8` can be held here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin(u8);

impl Pin {
    pub const fn new(gpio: u8) -> Self {
        Self(gpio)
    }

    pub const fn gpio(self) -> u8 {
        self.0
    }

    /// GPIO 6 to 11 are wired to the SPI flash
    pub const fn is_flash(self) -> bool {
        matches!(self.0, 6..=11)
    }

    /// GPIO 34 to 39 have no output driver
    pub const fn is_input_only(self) -> bool {
        matches!(self.0, 34..=39)
    }

    /// Whether the pin exists on the chip and can be read as a digital input.
    pub const fn is_digital_io(self) -> bool {
        let exists = matches!(self.0, 0..=5 | 12..=19 | 21..=23 | 25..=27 | 32..=MAX_GPIO);
        exists && !self.is_flash()
    }

    /// Whether the pin can drive a digital output (e.g. the RF transmitter data line).
    pub const fn is_output(self) -> bool {
        self.is_digital_io() && !self.is_input_only()
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_pins_rejected() {
        for gpio in 6..=11 {
            let pin = Pin::new(gpio);
            assert!(!pin.is_digital_io(), "GPIO{} should be reserved", gpio);
            assert!(!pin.is_output());
        }
    }

    #[test]
    fn test_input_only_pins() {
        for gpio in 34..=39 {
            let pin = Pin::new(gpio);
            assert!(pin.is_digital_io());
            assert!(!pin.is_output(), "GPIO{} cannot drive an output", gpio);
        }
    }

    #[test]
    fn test_missing_pins() {
        for gpio in [20, 24, 28, 29, 30, 31, 40, 255] {
            assert!(!Pin::new(gpio).is_digital_io(), "GPIO{} does not exist", gpio);
        }
    }

    #[test]
    fn test_general_purpose_pins() {
        for gpio in [0, 2, 4, 5, 12, 16, 17, 21, 23, 25, 27, 32, 33] {
            let pin = Pin::new(gpio);
            assert!(pin.is_digital_io());
            assert!(pin.is_output());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Pin::new(4).to_string(), "GPIO4");
    }
}
