//! State shared between the RTS edge task and the radio task
//!
//! Both are lock-free so the edge task never blocks.

use antlink_core::ReadySignal;
use antlink_hal_rp2040::MirroredLevel;

/// Send grant raised once RTS has pulsed and returned to rest
pub static READY: ReadySignal = ReadySignal::new();

/// Last observed RTS level (high = radio busy)
pub static RTS_LEVEL: MirroredLevel = MirroredLevel::new();
