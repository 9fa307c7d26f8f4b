//! Control line abstractions
//!
//! The radio module exposes a few discrete lines next to its serial port:
//! RESET, SLEEP and SUSPEND are driven by the host, RTS is driven by the
//! radio to signal that it is busy.

/// Host-driven control line
pub trait OutputPin {
    /// Drive the line high (logic 1)
    fn set_high(&mut self);

    /// Drive the line low (logic 0)
    fn set_low(&mut self);

    /// Drive the line to a specific level
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Radio-driven status line
pub trait InputPin {
    /// Check if the line reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the line reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line {
        high: bool,
    }

    impl OutputPin for Line {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }
    }

    impl InputPin for Line {
        fn is_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_set_level() {
        let mut line = Line { high: false };

        line.set_level(true);
        assert!(line.is_high());

        line.set_level(false);
        assert!(line.is_low());
    }
}
