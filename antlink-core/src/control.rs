//! Radio control lines
//!
//! The driver resets, wakes and watches the radio through [`RadioControl`].
//! [`PinControl`] implements it from four hal pins and a delay provider.
//!
//! Line polarity:
//! - RESET is active low
//! - SUSPEND is active low
//! - SLEEP high puts the radio to sleep
//! - RTS high means the radio is busy and not accepting bytes; low is its
//!   resting state

use antlink_hal::{InputPin, OutputPin};
use embedded_hal::delay::DelayNs;

/// Hardware control of the radio module
pub trait RadioControl {
    /// Assert or release the RESET line
    fn set_reset(&mut self, asserted: bool);

    /// Put the radio to sleep or wake it
    fn set_sleep(&mut self, asleep: bool);

    /// Assert or release the SUSPEND line
    fn set_suspend(&mut self, suspended: bool);

    /// True while the radio holds RTS asserted (busy)
    fn rts_asserted(&self) -> bool;

    /// Block for the given number of milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// [`RadioControl`] built from discrete pins
pub struct PinControl<RST, SLP, SUS, RTS, D> {
    reset: RST,
    sleep: SLP,
    suspend: SUS,
    rts: RTS,
    delay: D,
}

impl<RST, SLP, SUS, RTS, D> PinControl<RST, SLP, SUS, RTS, D>
where
    RST: OutputPin,
    SLP: OutputPin,
    SUS: OutputPin,
    RTS: InputPin,
    D: DelayNs,
{
    /// Create a pin-based controller
    pub fn new(reset: RST, sleep: SLP, suspend: SUS, rts: RTS, delay: D) -> Self {
        Self {
            reset,
            sleep,
            suspend,
            rts,
            delay,
        }
    }

    /// Give the pins back
    pub fn release(self) -> (RST, SLP, SUS, RTS, D) {
        (self.reset, self.sleep, self.suspend, self.rts, self.delay)
    }
}

impl<RST, SLP, SUS, RTS, D> RadioControl for PinControl<RST, SLP, SUS, RTS, D>
where
    RST: OutputPin,
    SLP: OutputPin,
    SUS: OutputPin,
    RTS: InputPin,
    D: DelayNs,
{
    fn set_reset(&mut self, asserted: bool) {
        self.reset.set_level(!asserted);
    }

    fn set_sleep(&mut self, asleep: bool) {
        self.sleep.set_level(asleep);
    }

    fn set_suspend(&mut self, suspended: bool) {
        self.suspend.set_level(!suspended);
    }

    fn rts_asserted(&self) -> bool {
        self.rts.is_high()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pin {
        high: bool,
    }

    impl OutputPin for Pin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }
    }

    impl InputPin for Pin {
        fn is_high(&self) -> bool {
            self.high
        }
    }

    #[derive(Default)]
    struct Delay {
        total_ns: u64,
    }

    impl DelayNs for Delay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    fn control() -> PinControl<Pin, Pin, Pin, Pin, Delay> {
        PinControl::new(
            Pin::default(),
            Pin::default(),
            Pin::default(),
            Pin::default(),
            Delay::default(),
        )
    }

    #[test]
    fn test_reset_and_suspend_are_active_low() {
        let mut control = control();
        control.set_reset(false);
        control.set_suspend(false);

        let (reset, _, suspend, _, _) = control.release();
        assert!(reset.high);
        assert!(suspend.high);

        let mut control = self::control();
        control.set_reset(true);
        control.set_suspend(true);

        let (reset, _, suspend, _, _) = control.release();
        assert!(!reset.high);
        assert!(!suspend.high);
    }

    #[test]
    fn test_sleep_is_active_high() {
        let mut control = control();
        control.set_sleep(true);
        let (_, sleep, _, _, _) = control.release();
        assert!(sleep.high);
    }

    #[test]
    fn test_rts_level() {
        let control = PinControl::new(
            Pin::default(),
            Pin::default(),
            Pin::default(),
            Pin { high: true },
            Delay::default(),
        );
        assert!(control.rts_asserted());
    }

    #[test]
    fn test_delay_forwarded() {
        let mut control = control();
        control.delay_ms(10);
        let (_, _, _, _, delay) = control.release();
        assert!(delay.total_ns >= 10_000_000);
    }
}
