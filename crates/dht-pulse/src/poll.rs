use embedded_hal::digital::{InputPin, PinState};

// Polls the line until it reaches `state`.
//
// Each iteration reads the line once. Returns `Ok(false)` when `budget`
// iterations pass without the line reaching `state`.
pub(crate) fn wait_for_level<L>(
    line: &mut L,
    state: PinState,
    budget: u32,
) -> Result<bool, L::Error>
where
    L: InputPin,
{
    for _ in 0..budget {
        let reached = match state {
            PinState::High => line.is_high()?,
            PinState::Low => line.is_low()?,
        };
        if reached {
            return Ok(true);
        }
    }

    Ok(false)
}
