//! Test doubles for the transport, clock and control lines

use core::cell::Cell;

use antlink_hal::{ByteTransport, Clock};
use antlink_protocol::Frame;
use heapless::{Deque, Vec};

use crate::control::RadioControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Loopback-free serial port: tests push what the radio "sends" into
/// `rx` and inspect what the driver wrote in `tx`.
pub struct MockTransport {
    rx: Deque<u8, 1024>,
    tx: Vec<u8, 1024>,
    reads_before_failure: Option<usize>,
    fail_writes: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
            reads_before_failure: None,
            fail_writes: false,
        }
    }

    pub fn push_rx(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.rx.push_back(byte).unwrap();
        }
    }

    pub fn push_frame(&mut self, frame: &Frame) {
        let bytes = frame.encode_to_vec().unwrap();
        self.push_rx(&bytes);
    }

    pub fn tx(&self) -> &[u8] {
        &self.tx
    }

    /// Take the bytes written so far
    pub fn take_tx(&mut self) -> Vec<u8, 1024> {
        core::mem::take(&mut self.tx)
    }

    /// Decode the single frame written so far and clear the log
    pub fn take_frame(&mut self) -> Option<Frame> {
        let tx = self.take_tx();
        if tx.is_empty() {
            None
        } else {
            Some(Frame::decode(&tx).unwrap())
        }
    }

    pub fn fail_reads_after(&mut self, reads: usize) {
        self.reads_before_failure = Some(reads);
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl ByteTransport for MockTransport {
    type Error = MockError;

    fn bytes_available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, MockError> {
        if let Some(remaining) = self.reads_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(MockError);
            }
            *remaining -= 1;
        }
        self.rx.pop_front().ok_or(MockError)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), MockError> {
        if self.fail_writes {
            return Err(MockError);
        }
        self.tx.push(byte).map_err(|_| MockError)
    }
}

/// Clock that advances by a fixed step on every read
pub struct MockClock {
    now: Cell<u64>,
    step: u64,
}

impl MockClock {
    pub fn new() -> Self {
        Self::with_step(1)
    }

    pub fn with_step(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// Control lines recorded as plain state
#[derive(Debug, Default)]
pub struct MockControl {
    pub reset_asserted: bool,
    pub asleep: bool,
    pub suspended: bool,
    pub rts: bool,
    pub reset_pulses: u32,
    pub delayed_ms: u32,
}

impl RadioControl for MockControl {
    fn set_reset(&mut self, asserted: bool) {
        if asserted && !self.reset_asserted {
            self.reset_pulses += 1;
        }
        self.reset_asserted = asserted;
    }

    fn set_sleep(&mut self, asleep: bool) {
        self.asleep = asleep;
    }

    fn set_suspend(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    fn rts_asserted(&self) -> bool {
        self.rts
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delayed_ms += ms;
    }
}
