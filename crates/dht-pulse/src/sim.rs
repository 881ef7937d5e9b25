//! Simulated board used by the tests.
//!
//! The data line, the timer and the delay provider share one [`Bus`].
//! Every read of the line advances the simulated clock by one microsecond
//! and, while the timer runs, its counter by one tick. Delays advance the
//! clock without consuming the input script.

extern crate std;

use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};

use crate::config::{PinId, Port, TimerId};
use crate::hal::{Board, DataLine, PinMode, PulseTimer};
use crate::reading::FRAME_LEN;

pub(crate) const ZERO_PULSE_US: u32 = 26;
pub(crate) const ONE_PULSE_US: u32 = 70;
const BIT_GAP_US: u32 = 50;
const NS_PER_POLL: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SimError;

impl digital::Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    high: bool,
    polls: u32,
}

// Levels the sensor drives while the line is in input mode.
pub(crate) struct Script(Vec<Segment>);

impl Script {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn level(mut self, high: bool, polls: u32) -> Self {
        self.0.push(Segment { high, polls });
        self
    }

    // Line still pulled up, then low, high, and low before the first bit.
    pub(crate) fn acknowledge(self) -> Self {
        self.level(true, 3)
            .level(false, 80)
            .level(true, 80)
            .level(false, BIT_GAP_US)
    }

    pub(crate) fn bit(self, one: bool) -> Self {
        let width = if one { ONE_PULSE_US } else { ZERO_PULSE_US };
        self.level(true, width).level(false, BIT_GAP_US)
    }

    pub(crate) fn frame(mut self, frame: [u8; FRAME_LEN]) -> Self {
        for byte in frame {
            for shift in (0..8).rev() {
                self = self.bit((byte >> shift) & 1 == 1);
            }
        }
        self
    }

    pub(crate) fn transaction(frame: [u8; FRAME_LEN]) -> Self {
        Self::new().acknowledge().frame(frame)
    }
}

// Observable state left behind by an initialization.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct IdleState {
    pub(crate) mode: Option<PinMode>,
    pub(crate) open_drain: bool,
    pub(crate) driven_high: bool,
    pub(crate) timer_clock: bool,
    pub(crate) tick_period_ns: Option<u32>,
    pub(crate) running: bool,
    pub(crate) counter: u32,
}

pub(crate) struct Bus {
    pub(crate) mode: Option<PinMode>,
    pub(crate) open_drain: bool,
    pub(crate) driven_high: bool,
    pub(crate) reads: u64,
    pub(crate) fail_pin: bool,
    // Level seen once the script is exhausted.
    pub(crate) idle_level: bool,
    script: VecDeque<Segment>,

    now_ns: u64,
    low_since_ns: Option<u64>,
    pub(crate) start_pulses_ns: Vec<u64>,

    pub(crate) timer_clock: bool,
    pub(crate) tick_period_ns: Option<u32>,
    pub(crate) running: bool,
    pub(crate) counter: u32,
}

impl Bus {
    fn new() -> Self {
        Self {
            mode: None,
            open_drain: false,
            driven_high: false,
            reads: 0,
            fail_pin: false,
            idle_level: true,
            script: VecDeque::new(),
            now_ns: 0,
            low_since_ns: None,
            start_pulses_ns: Vec::new(),
            timer_clock: false,
            tick_period_ns: None,
            running: false,
            counter: 0,
        }
    }

    pub(crate) fn load(&mut self, script: Script) {
        self.script = script.0.into_iter().collect();
    }

    pub(crate) fn idle_state(&self) -> IdleState {
        IdleState {
            mode: self.mode,
            open_drain: self.open_drain,
            driven_high: self.driven_high,
            timer_clock: self.timer_clock,
            tick_period_ns: self.tick_period_ns,
            running: self.running,
            counter: self.counter,
        }
    }

    fn check(&self) -> Result<(), SimError> {
        if self.fail_pin { Err(SimError) } else { Ok(()) }
    }

    fn drive(&mut self, high: bool) -> Result<(), SimError> {
        self.check()?;

        if high {
            if let Some(since) = self.low_since_ns.take() {
                self.start_pulses_ns.push(self.now_ns - since);
            }
        } else if self.low_since_ns.is_none() {
            self.low_since_ns = Some(self.now_ns);
        }
        self.driven_high = high;

        Ok(())
    }

    fn sample(&mut self) -> Result<bool, SimError> {
        self.check()?;

        self.now_ns += NS_PER_POLL;
        self.reads += 1;
        if self.running {
            self.counter = self.counter.wrapping_add(1);
        }

        if self.mode != Some(PinMode::Input) {
            return Ok(self.driven_high);
        }

        while let Some(segment) = self.script.front_mut() {
            if segment.polls > 0 {
                segment.polls -= 1;
                return Ok(segment.high);
            }
            let _ = self.script.pop_front();
        }

        Ok(self.idle_level)
    }
}

#[derive(Clone)]
pub(crate) struct SimLine(Rc<RefCell<Bus>>);

impl ErrorType for SimLine {
    type Error = SimError;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.borrow_mut().sample()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().drive(true)
    }
}

impl DataLine for SimLine {
    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        bus.check()?;
        bus.mode = Some(mode);
        Ok(())
    }

    fn configure_as_open_drain_output(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        bus.check()?;
        bus.open_drain = true;
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct SimTimer(Rc<RefCell<Bus>>);

impl PulseTimer for SimTimer {
    fn enable_clock(&mut self) {
        self.0.borrow_mut().timer_clock = true;
    }

    fn configure(&mut self, tick_period_ns: u32) {
        self.0.borrow_mut().tick_period_ns = Some(tick_period_ns);
    }

    fn start(&mut self) {
        self.0.borrow_mut().running = true;
    }

    fn stop(&mut self) {
        self.0.borrow_mut().running = false;
    }

    fn reset_counter(&mut self) {
        self.0.borrow_mut().counter = 0;
    }

    fn read_counter(&mut self) -> u32 {
        self.0.borrow().counter
    }
}

pub(crate) struct SimDelay(Rc<RefCell<Bus>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_ns += u64::from(ns);
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_ns += u64::from(ns);
    }
}

pub(crate) struct SimBoard {
    bus: Rc<RefCell<Bus>>,
    ports: &'static [Port],
    timers: &'static [TimerId],
    pub(crate) requests: u32,
}

impl SimBoard {
    pub(crate) fn new() -> Self {
        Self {
            bus: Rc::new(RefCell::new(Bus::new())),
            ports: &[Port::A, Port::B],
            timers: &[TimerId::Tim3, TimerId::Tim16],
            requests: 0,
        }
    }

    pub(crate) fn delay(&self) -> SimDelay {
        SimDelay(Rc::clone(&self.bus))
    }

    pub(crate) fn bus(&self) -> Ref<'_, Bus> {
        self.bus.borrow()
    }

    pub(crate) fn bus_mut(&self) -> RefMut<'_, Bus> {
        self.bus.borrow_mut()
    }
}

impl Board for SimBoard {
    type Line = SimLine;
    type Timer = SimTimer;

    fn line(&mut self, pin: PinId) -> Option<Self::Line> {
        self.requests += 1;
        self.ports
            .contains(&pin.port)
            .then(|| SimLine(Rc::clone(&self.bus)))
    }

    fn timer(&mut self, timer: TimerId) -> Option<Self::Timer> {
        self.requests += 1;
        self.timers
            .contains(&timer)
            .then(|| SimTimer(Rc::clone(&self.bus)))
    }
}
