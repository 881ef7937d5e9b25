use core::fmt;

use crate::decoder::Bit;

/// Number of bytes in a sensor frame.
pub const FRAME_LEN: usize = 5;

/// Number of bits in a sensor frame.
pub const FRAME_BITS: usize = FRAME_LEN * 8;

/// Computes the checksum of the four data bytes.
///
/// The checksum is the low 8 bits of their sum.
#[inline]
#[must_use]
pub const fn checksum(payload: &[u8; 4]) -> u8 {
    payload[0]
        .wrapping_add(payload[1])
        .wrapping_add(payload[2])
        .wrapping_add(payload[3])
}

/// Returns `true` if `checksum` matches the four data bytes.
#[inline]
#[must_use]
pub const fn verify(payload: &[u8; 4], checksum: u8) -> bool {
    self::checksum(payload) == checksum
}

/// A checksum-verified sensor frame.
///
/// Bytes are kept in transmission order: humidity integral part, humidity
/// fractional part, temperature integral part, temperature fractional part
/// and checksum. The values are reported as the sensor sent them, no unit
/// conversion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawReading([u8; FRAME_LEN]);

impl RawReading {
    /// Builds a [`RawReading`] from a received frame.
    ///
    /// Returns `None` if the checksum byte does not match the data bytes.
    #[must_use]
    pub const fn from_frame(frame: [u8; FRAME_LEN]) -> Option<Self> {
        let payload = [frame[0], frame[1], frame[2], frame[3]];
        if verify(&payload, frame[4]) {
            Some(Self(frame))
        } else {
            None
        }
    }

    /// Integral part of the relative humidity.
    #[must_use]
    pub const fn humidity_integral(&self) -> u8 {
        self.0[0]
    }

    /// Fractional part of the relative humidity.
    #[must_use]
    pub const fn humidity_fractional(&self) -> u8 {
        self.0[1]
    }

    /// Integral part of the temperature.
    #[must_use]
    pub const fn temperature_integral(&self) -> u8 {
        self.0[2]
    }

    /// Fractional part of the temperature.
    #[must_use]
    pub const fn temperature_fractional(&self) -> u8 {
        self.0[3]
    }

    /// Checksum byte sent by the sensor.
    #[must_use]
    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// Returns the frame bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Consumes the reading and returns the frame bytes.
    #[must_use]
    pub const fn into_bytes(self) -> [u8; FRAME_LEN] {
        self.0
    }
}

impl fmt::Display for RawReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "humidity {}.{}, temperature {}.{}",
            self.humidity_integral(),
            self.humidity_fractional(),
            self.temperature_integral(),
            self.temperature_fractional()
        )
    }
}

// Collects decoded bits into a frame, most significant bit first within each
// byte and bytes in transmission order.
#[derive(Debug, Default)]
pub(crate) struct FrameAssembler {
    bytes: [u8; FRAME_LEN],
    filled: usize,
}

impl FrameAssembler {
    pub(crate) const fn new() -> Self {
        Self {
            bytes: [0; FRAME_LEN],
            filled: 0,
        }
    }

    // Bits past the end of the frame are ignored.
    pub(crate) fn push(&mut self, bit: Bit) {
        if self.filled >= FRAME_BITS {
            return;
        }

        if bit == Bit::One {
            self.bytes[self.filled / 8] |= 1 << (7 - (self.filled % 8));
        }
        self.filled += 1;
    }

    pub(crate) const fn len(&self) -> usize {
        self.filled
    }

    pub(crate) const fn into_frame(self) -> [u8; FRAME_LEN] {
        self.bytes
    }
}
