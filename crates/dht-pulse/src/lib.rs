//! `dht-pulse` is a library crate that provides an architecture-agnostic
//! driver for the `DHT` family of humidity and temperature sensors.
//!
//! Unlike drivers that sample the data line after a fixed delay, this driver
//! measures the width of every bit pulse with a hardware timer running at
//! 1 MHz and classifies it against a fixed threshold.
//!
//! All hardware access goes through the [`embedded-hal`] traits and the
//! small set of capabilities described in [`hal`], so the same driver runs on
//! any platform able to provide a data line, a free-running timer and a
//! delay provider.
//!
//! A transaction is performed with three steps:
//!
//! 1. Describe where the sensor is wired with a [`SensorConfig`].
//! 2. Call [`Dht::initialize`] once to resolve and configure the hardware.
//! 3. Call [`Dht::read`] to obtain a checksum-verified [`RawReading`].
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![no_std]

/// Sensor configuration and hardware identifiers.
pub mod config;
/// Pulse width classification.
pub mod decoder;
/// The protocol engine.
pub mod driver;
/// Errors reported by the driver.
pub mod error;
/// Hardware capabilities consumed by the driver.
pub mod hal;
/// Raw sensor readings and their integrity checks.
pub mod reading;

mod poll;

#[cfg(test)]
pub(crate) mod sim;

pub use config::{PinId, Port, SensorConfig, TimerId};
pub use decoder::{Bit, THRESHOLD_TICKS, classify};
pub use driver::Dht;
pub use error::{ConfigError, InitError, ReadError};
pub use hal::{Board, DataLine, PinMode, PulseTimer};
pub use reading::RawReading;
