//! GPIO adapters

use antlink_hal::{InputPin, OutputPin};
use embassy_rp::gpio::Output;
use portable_atomic::{AtomicBool, Ordering};

/// Push-pull output driving one radio control line
pub struct RpOutput<'d>(Output<'d>);

impl<'d> RpOutput<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self(pin)
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }
}

/// Level of an input owned by an edge-waiting task
///
/// Waiting for an edge needs the `Input` exclusively, so the task that
/// owns it publishes the level here and the driver reads it.
pub struct MirroredLevel {
    high: AtomicBool,
}

impl MirroredLevel {
    pub const fn new() -> Self {
        Self {
            high: AtomicBool::new(false),
        }
    }

    /// Record the level last observed on the pin
    pub fn set(&self, high: bool) {
        self.high.store(high, Ordering::Release);
    }
}

impl Default for MirroredLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPin for &MirroredLevel {
    fn is_high(&self) -> bool {
        self.high.load(Ordering::Acquire)
    }
}
