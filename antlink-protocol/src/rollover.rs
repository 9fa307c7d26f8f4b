//! Wrapping event counter accumulation
//!
//! Device profiles report running counts (heart beats, strides) in a single
//! byte that wraps at 256. Sampling it at least once per wrap is enough to
//! recover the true total.

/// Accumulates an 8-bit wrapping counter into a running total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RolloverCounter {
    last: Option<u8>,
    total: u32,
}

impl RolloverCounter {
    /// Create a counter with no samples
    pub const fn new() -> Self {
        Self {
            last: None,
            total: 0,
        }
    }

    /// Record a new raw sample and return the increment since the last one
    ///
    /// The first sample only establishes the baseline and returns 0.
    pub fn update(&mut self, raw: u8) -> u8 {
        let delta = match self.last {
            Some(last) => raw.wrapping_sub(last),
            None => 0,
        };
        self.last = Some(raw);
        self.total = self.total.wrapping_add(delta as u32);
        delta
    }

    /// Sum of all increments seen so far
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Forget the baseline and the total
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_baseline() {
        let mut counter = RolloverCounter::new();
        assert_eq!(counter.update(200), 0);
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn test_accumulates_across_wrap() {
        let mut counter = RolloverCounter::new();
        counter.update(250);
        assert_eq!(counter.update(254), 4);
        assert_eq!(counter.update(3), 5); // 254 -> 255 -> 0 -> 3
        assert_eq!(counter.total(), 9);
    }

    #[test]
    fn test_repeated_sample_adds_nothing() {
        let mut counter = RolloverCounter::new();
        counter.update(10);
        assert_eq!(counter.update(10), 0);
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn test_reset() {
        let mut counter = RolloverCounter::new();
        counter.update(1);
        counter.update(5);
        counter.reset();
        assert_eq!(counter.total(), 0);
        assert_eq!(counter.update(100), 0);
    }
}
