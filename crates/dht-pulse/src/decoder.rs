//! A bit is encoded by how long the sensor keeps the line high: roughly
//! 26–28 µs for a `0` and 70 µs for a `1`.
//! With the timer ticking once per microsecond, the threshold sits between
//! the two nominal widths.

/// Pulse width, in timer ticks, above which a bit is decoded as `1`.
pub const THRESHOLD_TICKS: u32 = 50;

/// A decoded data bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    /// Short high pulse.
    Zero,
    /// Long high pulse.
    One,
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> Self {
        match bit {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl From<Bit> for bool {
    fn from(bit: Bit) -> Self {
        matches!(bit, Bit::One)
    }
}

/// Classifies a measured pulse width.
///
/// Returns [`Bit::One`] if `ticks` strictly exceeds [`THRESHOLD_TICKS`],
/// [`Bit::Zero`] otherwise. Every tick count is a valid input, including
/// implausible values caused by timing glitches.
#[inline]
#[must_use]
pub const fn classify(ticks: u32) -> Bit {
    if ticks > THRESHOLD_TICKS {
        Bit::One
    } else {
        Bit::Zero
    }
}
