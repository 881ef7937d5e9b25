use core::fmt;

/// Configuration errors, detected before the data line is driven.
///
/// They are always recoverable by fixing the configuration and initializing
/// the driver again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The pin does not exist or the board cannot provide it.
    InvalidPort,
    /// The board cannot provide the requested timer.
    InvalidTimer,
    /// The polling timeout is zero.
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort => f.write_str("invalid data pin"),
            Self::InvalidTimer => f.write_str("invalid timer"),
            Self::ZeroTimeout => f.write_str("timeout must be non-zero"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Errors that may occur while initializing the driver.
#[derive(Debug)]
pub enum InitError<E> {
    /// Invalid configuration.
    Config(ConfigError),
    /// GPIO pin errors.
    Pin(E),
}

impl<E> From<ConfigError> for InitError<E> {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}

impl<E: fmt::Debug> fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Pin(e) => write!(f, "pin error: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for InitError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Pin(_) => None,
        }
    }
}

/// Errors that may occur when reading the sensor.
///
/// The data line is left in its idle state whichever error is returned, so
/// a new read can be attempted right away.
#[derive(Debug)]
pub enum ReadError<E> {
    /// GPIO pin errors.
    Pin(E),
    /// Timeout waiting for the sensor to drive the data line.
    Timeout,
    /// Data checksum mismatch.
    ChecksumMismatch,
}

impl<E> From<E> for ReadError<E> {
    fn from(e: E) -> Self {
        ReadError::Pin(e)
    }
}

impl<E: fmt::Debug> fmt::Display for ReadError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "pin error: {e:?}"),
            Self::Timeout => f.write_str("timeout waiting for the sensor"),
            Self::ChecksumMismatch => f.write_str("data checksum mismatch"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for ReadError<E> {}
