//! The driver only needs three capabilities from the platform:
//!
//! - A [`DataLine`]: an open-drain GPIO pin that can switch between output
//!   and input mode.
//! - A [`PulseTimer`]: a free-running counter that can be started, stopped
//!   and cleared.
//! - A delay provider implementing [`embedded_hal::delay::DelayNs`].
//!
//! A [`Board`] maps the hardware identifiers of a
//! [`SensorConfig`](crate::SensorConfig) to concrete instances of the first
//! two.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{PinId, TimerId};

/// Duration of one timer tick in nanoseconds (1 tick = 1 µs).
pub const TICK_PERIOD_NS: u32 = 1_000;

/// Direction of the data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// The host drives the line.
    Output,
    /// The sensor drives the line.
    Input,
}

/// A bidirectional data line.
pub trait DataLine: InputPin + OutputPin {
    /// Switches the line direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be reconfigured.
    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error>;

    /// Configures the line as an open-drain output.
    ///
    /// Called once, when the driver is initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be reconfigured.
    fn configure_as_open_drain_output(&mut self) -> Result<(), Self::Error>;
}

/// A hardware counter measuring pulse widths.
pub trait PulseTimer {
    /// Enables the peripheral clock of the timer.
    fn enable_clock(&mut self);

    /// Programs the free-running resolution, one tick every `tick_period_ns`.
    ///
    /// The counter must be left stopped.
    fn configure(&mut self, tick_period_ns: u32);

    /// Starts counting.
    fn start(&mut self);

    /// Stops counting, keeping the current value.
    fn stop(&mut self);

    /// Clears the counter.
    fn reset_counter(&mut self);

    /// Returns the current counter value in ticks.
    fn read_counter(&mut self) -> u32;
}

/// Resolves hardware identifiers into platform peripherals.
pub trait Board {
    /// Data line type.
    type Line: DataLine;
    /// Timer type.
    type Timer: PulseTimer;

    /// Returns the data line for `pin`, or `None` if the board has no such
    /// pin.
    fn line(&mut self, pin: PinId) -> Option<Self::Line>;

    /// Returns the timer for `timer`, or `None` if the board has no such
    /// timer.
    fn timer(&mut self, timer: TimerId) -> Option<Self::Timer>;
}
