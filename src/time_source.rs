//! Clock abstraction for the decision core.
//!
//! The schedule only depends on the local wall-clock hour, so the trait is
//! reduced to that. [`SystemClock`] reads it from chrono; [`FixedClock`] and
//! [`ManualClock`] let tests and `themeshift status --at` pick the hour.

use chrono::{Local, Timelike};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Source of the current local hour.
pub trait Clock {
    /// The current local hour, `0..=23`.
    fn current_hour(&self) -> u8;
}

/// Real local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> u8 {
        Local::now().hour() as u8
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u8);

impl Clock for FixedClock {
    fn current_hour(&self) -> u8 {
        self.0
    }
}

/// An hour that can be moved while the clock is in use.
///
/// Clones share the same hour, so a test can keep one handle after moving
/// another into the decision core.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    hour: Arc<AtomicU8>,
}

impl ManualClock {
    pub fn new(hour: u8) -> Self {
        Self {
            hour: Arc::new(AtomicU8::new(hour % 24)),
        }
    }

    pub fn set_hour(&self, hour: u8) {
        self.hour.store(hour % 24, Ordering::SeqCst);
    }

    /// Move forward by `hours`, wrapping past midnight.
    pub fn advance(&self, hours: u8) {
        let next = (u16::from(self.current_hour()) + u16::from(hours)) % 24;
        self.set_hour(next as u8);
    }
}

impl Clock for ManualClock {
    fn current_hour(&self) -> u8 {
        self.hour.load(Ordering::SeqCst)
    }
}
