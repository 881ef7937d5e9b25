//! # DHT Driver
//!
//! This module provides an architecture-agnostic driver for the `DHT` family
//! of temperature and humidity sensors.
//!
//! A transaction goes through the following stages:
//!
//! 1. **Start signal**: the host pulls the line low for 20 ms and releases it.
//! 2. **Acknowledge**: the sensor pulls the line low, releases it and pulls
//!    it low again.
//! 3. **Bit sampling**: for each of the 40 data bits, the width of the high
//!    pulse is measured with the timer and classified by
//!    [`classify`](crate::decoder::classify).
//! 4. **Checksum**: the received frame is accepted only if the checksum byte
//!    matches the four data bytes.
//!
//! Every wait on the data line is bounded by
//! [`SensorConfig::timeout`] polling iterations. Whatever the outcome, the
//! line is left released high in output mode so that a new transaction can
//! be started right away.
//!
//! The driver is synchronous to meet the strict timing requirements of the
//! sensor's single-wire protocol. With the `async` feature,
//! [`Dht::read_async`] awaits the start signal without blocking the
//! executor, while the timing-critical sampling stays blocking.

use core::fmt;
use core::result::Result::{self, Err, Ok};

use embedded_hal::delay::DelayNs as SyncDelay;
use embedded_hal::digital::PinState;

#[cfg(feature = "async")]
use embedded_hal_async::delay::DelayNs as AsyncDelay;

use log::{debug, trace, warn};

use crate::config::SensorConfig;
use crate::decoder::classify;
use crate::error::{ConfigError, InitError, ReadError};
use crate::hal::{Board, DataLine, PinMode, PulseTimer, TICK_PERIOD_NS};
use crate::poll::wait_for_level;
use crate::reading::{FRAME_BITS, FRAME_LEN, FrameAssembler, RawReading};

// Protocol-specific timing constants.
const START_SIGNAL_LOW_MS: u32 = 20; // MCU pulls line low for 20 ms to wake the sensor.

// Points of a transaction where the driver waits for the sensor.
#[derive(Debug, Clone, Copy)]
enum Wait {
    AckLow,
    AckHigh,
    DataLow,
    BitStart(usize),
    BitEnd(usize),
}

impl fmt::Display for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AckLow => f.write_str("acknowledge low"),
            Self::AckHigh => f.write_str("acknowledge high"),
            Self::DataLow => f.write_str("data low"),
            Self::BitStart(bit) => write!(f, "start of bit {bit}"),
            Self::BitEnd(bit) => write!(f, "end of bit {bit}"),
        }
    }
}

/// The `DHT` driver.
pub struct Dht<L, T, D>
where
    L: DataLine,
    T: PulseTimer,
    D: SyncDelay,
{
    line: L,
    timer: T,
    delay: D,
    config: SensorConfig,
}

impl<L, T, D> Dht<L, T, D>
where
    L: DataLine,
    T: PulseTimer,
    D: SyncDelay,
{
    /// Initializes a [`Dht`] driver.
    ///
    /// The configuration is validated before any hardware is touched. The
    /// pin and timer are then resolved through the `board`, the line is
    /// released high as an open-drain output and the timer is programmed to
    /// tick once per microsecond with its counter stopped.
    ///
    /// Initializing twice with the same configuration leaves the hardware in
    /// the same idle state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pin number is out of range or the board has no such pin
    /// - The board has no such timer
    /// - The timeout is zero
    /// - Configuring the pin fails
    pub fn initialize<B>(
        board: &mut B,
        config: &SensorConfig,
        delay: D,
    ) -> Result<Self, InitError<L::Error>>
    where
        B: Board<Line = L, Timer = T>,
    {
        config.validate()?;

        let mut line = board.line(config.pin).ok_or(ConfigError::InvalidPort)?;
        let mut timer = board.timer(config.timer).ok_or(ConfigError::InvalidTimer)?;

        timer.enable_clock();

        // Idle state: released high before becoming an output.
        line.set_high().map_err(InitError::Pin)?;
        line.configure_as_open_drain_output().map_err(InitError::Pin)?;
        line.set_mode(PinMode::Output).map_err(InitError::Pin)?;

        timer.stop();
        timer.configure(TICK_PERIOD_NS);
        timer.reset_counter();

        debug!(
            "DHT sensor on {} initialized, pulses timed by {}",
            config.pin, config.timer
        );

        Ok(Self {
            line,
            timer,
            delay,
            config: *config,
        })
    }

    /// Returns the configuration the driver was initialized with.
    #[must_use]
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Releases the data line, the timer and the delay provider.
    #[must_use]
    pub fn release(self) -> (L, T, D) {
        (self.line, self.timer, self.delay)
    }

    /// Reads a single checksum-verified frame from the sensor.
    ///
    /// Exactly one transaction is attempted, no retry is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Driving or reading the pin fails
    /// - The sensor does not drive the line within the configured timeout
    /// - The received data fails checksum validation
    pub fn read(&mut self) -> Result<RawReading, ReadError<L::Error>> {
        let outcome = self.send_start_signal().and_then(|()| self.receive());
        self.finish(outcome)
    }

    /// Reads a single checksum-verified frame from the sensor, awaiting the
    /// start signal.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read`].
    #[cfg(feature = "async")]
    pub async fn read_async(&mut self) -> Result<RawReading, ReadError<L::Error>>
    where
        D: AsyncDelay,
    {
        let outcome = match self.send_start_signal_async().await {
            Ok(()) => self.receive(),
            Err(e) => Err(e),
        };
        self.finish(outcome)
    }

    fn send_start_signal(&mut self) -> Result<(), ReadError<L::Error>> {
        self.line.set_mode(PinMode::Output)?;

        // Pull the line low for 20 ms to signal the sensor, then release it.
        self.line.set_low()?;
        SyncDelay::delay_ms(&mut self.delay, START_SIGNAL_LOW_MS);
        self.line.set_high()?;

        Ok(())
    }

    #[cfg(feature = "async")]
    async fn send_start_signal_async(&mut self) -> Result<(), ReadError<L::Error>>
    where
        D: AsyncDelay,
    {
        self.line.set_mode(PinMode::Output)?;

        self.line.set_low()?;
        AsyncDelay::delay_ms(&mut self.delay, START_SIGNAL_LOW_MS).await;
        self.line.set_high()?;

        Ok(())
    }

    fn receive(&mut self) -> Result<RawReading, ReadError<L::Error>> {
        // The sensor drives the line from now on.
        self.line.set_mode(PinMode::Input)?;

        self.wait_for_acknowledge()?;

        let frame = self.read_frame()?;

        RawReading::from_frame(frame).ok_or_else(|| {
            warn!(
                "DHT sensor on {}: checksum mismatch in frame {frame:02x?}",
                self.config.pin
            );
            ReadError::ChecksumMismatch
        })
    }

    fn wait_for_acknowledge(&mut self) -> Result<(), ReadError<L::Error>> {
        self.wait_until(PinState::Low, Wait::AckLow)?;
        self.wait_until(PinState::High, Wait::AckHigh)?;
        self.wait_until(PinState::Low, Wait::DataLow)
    }

    fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], ReadError<L::Error>> {
        let mut assembler = FrameAssembler::new();

        for bit in 0..FRAME_BITS {
            let ticks = self.measure_pulse(bit)?;
            assembler.push(classify(ticks));
        }
        debug_assert_eq!(assembler.len(), FRAME_BITS);

        let frame = assembler.into_frame();
        trace!("DHT sensor on {}: frame {frame:02x?}", self.config.pin);

        Ok(frame)
    }

    // Returns the width of the high pulse of a bit, in timer ticks.
    fn measure_pulse(&mut self, bit: usize) -> Result<u32, ReadError<L::Error>> {
        self.timer.reset_counter();

        // The rising edge marks the start of the bit.
        self.wait_until(PinState::High, Wait::BitStart(bit))?;
        self.timer.start();

        self.wait_until(PinState::Low, Wait::BitEnd(bit))?;
        self.timer.stop();

        Ok(self.timer.read_counter())
    }

    fn wait_until(&mut self, state: PinState, wait: Wait) -> Result<(), ReadError<L::Error>> {
        if wait_for_level(&mut self.line, state, self.config.timeout)? {
            Ok(())
        } else {
            warn!(
                "DHT sensor on {}: timeout waiting for {wait}",
                self.config.pin
            );
            Err(ReadError::Timeout)
        }
    }

    fn finish(
        &mut self,
        outcome: Result<RawReading, ReadError<L::Error>>,
    ) -> Result<RawReading, ReadError<L::Error>> {
        self.timer.stop();

        // Leave the line released high in output mode, whatever happened.
        // The first error is the one reported.
        let idle = self.release_line();

        match (outcome, idle) {
            (Ok(reading), Ok(())) => {
                debug!("DHT sensor on {}: {reading}", self.config.pin);
                Ok(reading)
            }
            (Ok(_), Err(e)) => Err(ReadError::Pin(e)),
            (Err(e), _) => Err(e),
        }
    }

    fn release_line(&mut self) -> Result<(), L::Error> {
        self.line.set_mode(PinMode::Output)?;
        self.line.set_high()
    }
}
