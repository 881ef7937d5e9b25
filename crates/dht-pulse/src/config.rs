use core::fmt;

use crate::error::ConfigError;

/// Highest addressable pin number on a port.
pub const MAX_PIN_NUMBER: u8 = 15;

/// GPIO ports a sensor can be wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Port {
    /// Port `A`.
    A,
    /// Port `B`.
    B,
    /// Port `F`.
    F,
}

impl Port {
    const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::F => 'F',
        }
    }
}

/// A pin on a GPIO port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinId {
    /// Port the pin belongs to.
    pub port: Port,
    /// Pin number within the port.
    pub number: u8,
}

impl PinId {
    /// Creates a [`PinId`].
    ///
    /// The pin number is checked when the configuration is validated.
    #[must_use]
    pub const fn new(port: Port, number: u8) -> Self {
        Self { port, number }
    }

    /// Returns `true` if the pin number exists on a port.
    #[must_use]
    pub const fn is_addressable(&self) -> bool {
        self.number <= MAX_PIN_NUMBER
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.number)
    }
}

/// Hardware timers able to measure pulse widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerId {
    /// Timer 3.
    Tim3,
    /// Timer 7.
    Tim7,
    /// Timer 15.
    Tim15,
    /// Timer 16.
    Tim16,
    /// Timer 17.
    Tim17,
}

impl TimerId {
    const fn index(self) -> u8 {
        match self {
            Self::Tim3 => 3,
            Self::Tim7 => 7,
            Self::Tim15 => 15,
            Self::Tim16 => 16,
            Self::Tim17 => 17,
        }
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TIM{}", self.index())
    }
}

/// Describes how a sensor is wired and how long to wait for it.
///
/// A configuration is immutable once a driver has been initialized with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorConfig {
    /// Data line of the sensor.
    pub pin: PinId,
    /// Timer measuring bit pulses.
    pub timer: TimerId,
    /// Polling iterations allowed for each wait on the data line.
    ///
    /// This is an iteration count, not a duration.
    pub timeout: u32,
}

impl SensorConfig {
    /// Default number of polling iterations for each wait.
    pub const DEFAULT_TIMEOUT: u32 = 100_000;

    /// Creates a [`SensorConfig`] with [`Self::DEFAULT_TIMEOUT`].
    #[must_use]
    pub const fn new(pin: PinId, timer: TimerId) -> Self {
        Self {
            pin,
            timer,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the number of polling iterations for each wait.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: u32) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks the configuration without touching any hardware.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pin number does not exist on a port
    /// - The timeout is zero
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if !self.pin.is_addressable() {
            return Err(ConfigError::InvalidPort);
        }
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
