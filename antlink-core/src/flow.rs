//! Flow control
//!
//! The radio allows one host message at a time. Two conditions gate a send:
//!
//! 1. A grant: the radio pulsed RTS since the last send. The edge handler
//!    records it in a [`ReadySignal`], and each send consumes it.
//! 2. No response owed: the previous message's acknowledgement (if it
//!    needed one) has been read. The [`ResponseWait`] tracks this.
//!
//! [`FlowGate`] combines both. The driver also checks that RTS itself is
//! at rest before it writes.

use portable_atomic::{AtomicBool, Ordering};

/// Clear-to-send grant set from the RTS edge handler
///
/// The only state shared between the interrupt context and the control
/// loop. Safe to place in a `static`.
pub struct ReadySignal {
    granted: AtomicBool,
}

impl ReadySignal {
    /// Create a signal with no grant pending
    pub const fn new() -> Self {
        Self {
            granted: AtomicBool::new(false),
        }
    }

    /// Record an RTS ready edge
    ///
    /// Call from the edge interrupt or task. Repeated edges before the next
    /// send collapse into one grant.
    pub fn on_ready_edge(&self) {
        self.granted.store(true, Ordering::Release);
    }

    /// Whether a grant is pending
    pub fn is_set(&self) -> bool {
        self.granted.load(Ordering::Acquire)
    }

    /// Consume the grant, returning whether one was pending
    pub fn take(&self) -> bool {
        self.granted.swap(false, Ordering::AcqRel)
    }

    /// Drop any pending grant
    pub fn clear(&self) {
        self.granted.store(false, Ordering::Release);
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Response the host is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseWait {
    #[default]
    Idle,
    /// Waiting for a frame with this message id
    Awaiting(u8),
}

impl ResponseWait {
    pub fn is_idle(&self) -> bool {
        matches!(self, ResponseWait::Idle)
    }

    /// Message id being waited for, if any
    pub fn expected(&self) -> Option<u8> {
        match self {
            ResponseWait::Idle => None,
            ResponseWait::Awaiting(id) => Some(*id),
        }
    }
}

/// Send gate combining the RTS grant and the response wait
pub struct FlowGate<'a> {
    signal: &'a ReadySignal,
    response: ResponseWait,
}

impl<'a> FlowGate<'a> {
    pub fn new(signal: &'a ReadySignal) -> Self {
        Self {
            signal,
            response: ResponseWait::Idle,
        }
    }

    /// The grant signal this gate consumes
    pub fn signal(&self) -> &'a ReadySignal {
        self.signal
    }

    /// Grant pending and no response owed
    pub fn is_open(&self) -> bool {
        self.response.is_idle() && self.signal.is_set()
    }

    /// Consume the grant for a send
    ///
    /// Returns false, leaving the grant untouched, while a response is
    /// owed. Returns false if no grant was pending.
    pub fn acquire(&mut self) -> bool {
        if !self.response.is_idle() {
            return false;
        }
        self.signal.take()
    }

    /// Start waiting for a response after a send
    pub fn await_response(&mut self, expected: Option<u8>) {
        self.response = match expected {
            Some(id) => ResponseWait::Awaiting(id),
            None => ResponseWait::Idle,
        };
    }

    pub fn response_wait(&self) -> ResponseWait {
        self.response
    }

    /// Match a received frame against the wait
    ///
    /// Returns true and clears the wait if `msg_id` is the awaited one.
    pub fn on_frame(&mut self, msg_id: u8) -> bool {
        if self.response == ResponseWait::Awaiting(msg_id) {
            self.response = ResponseWait::Idle;
            true
        } else {
            false
        }
    }

    /// Forget both the grant and the wait
    pub fn reset(&mut self) {
        self.signal.clear();
        self.response = ResponseWait::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SIGNAL: ReadySignal = ReadySignal::new();

    #[test]
    fn test_static_signal() {
        SIGNAL.on_ready_edge();
        assert!(SIGNAL.is_set());
        assert!(SIGNAL.take());
        assert!(!SIGNAL.take());
    }

    #[test]
    fn test_edges_collapse() {
        let signal = ReadySignal::new();
        signal.on_ready_edge();
        signal.on_ready_edge();
        assert!(signal.take());
        assert!(!signal.is_set());
    }

    #[test]
    fn test_acquire_consumes_grant() {
        let signal = ReadySignal::new();
        let mut gate = FlowGate::new(&signal);
        assert!(!gate.acquire());

        signal.on_ready_edge();
        assert!(gate.is_open());
        assert!(gate.acquire());
        assert!(!gate.is_open());
        assert!(!gate.acquire());
    }

    #[test]
    fn test_response_owed_blocks_and_keeps_grant() {
        let signal = ReadySignal::new();
        let mut gate = FlowGate::new(&signal);
        gate.await_response(Some(0x40));

        signal.on_ready_edge();
        assert!(!gate.is_open());
        assert!(!gate.acquire());
        assert!(signal.is_set());

        assert!(!gate.on_frame(0x4E));
        assert_eq!(gate.response_wait(), ResponseWait::Awaiting(0x40));
        assert!(gate.on_frame(0x40));
        assert!(gate.is_open());
    }

    #[test]
    fn test_no_expected_response_stays_idle() {
        let signal = ReadySignal::new();
        let mut gate = FlowGate::new(&signal);
        gate.await_response(None);
        assert!(gate.response_wait().is_idle());
        assert_eq!(gate.response_wait().expected(), None);
    }

    #[test]
    fn test_reset() {
        let signal = ReadySignal::new();
        let mut gate = FlowGate::new(&signal);
        signal.on_ready_edge();
        gate.await_response(Some(0x54));
        gate.reset();
        assert!(!signal.is_set());
        assert!(gate.response_wait().is_idle());
    }
}
