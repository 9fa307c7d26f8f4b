//! Packet reader
//!
//! Pulls bytes from the transport into a [`FrameAssembler`] until a frame
//! completes, a framing error occurs, or the deadline passes. The deadline
//! starts at `timeout_ms` from the call and moves out by the inter-byte
//! timeout with every byte received, so a slow but steady frame is never
//! cut off while a stalled one is.

use antlink_hal::{ByteTransport, Clock};
use antlink_protocol::{Frame, FrameAssembler};

use crate::config::LinkConfig;
use crate::error::LinkError;

/// A frame returned by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Received {
    /// The response the driver was waiting for
    Expected(Frame),
    /// Any other frame (broadcast data, channel events)
    Other(Frame),
}

impl Received {
    pub fn frame(&self) -> &Frame {
        match self {
            Received::Expected(frame) | Received::Other(frame) => frame,
        }
    }

    pub fn into_frame(self) -> Frame {
        match self {
            Received::Expected(frame) | Received::Other(frame) => frame,
        }
    }

    pub fn is_expected(&self) -> bool {
        matches!(self, Received::Expected(_))
    }
}

/// Deadline-driven frame reader
pub struct PacketReader {
    assembler: FrameAssembler,
    inter_byte_timeout_ms: u32,
    frames_received: u32,
}

impl PacketReader {
    pub fn new(sync: u8, inter_byte_timeout_ms: u32) -> Self {
        Self {
            assembler: FrameAssembler::new(sync),
            inter_byte_timeout_ms,
            frames_received: 0,
        }
    }

    pub fn from_config(config: &LinkConfig) -> Self {
        Self::new(config.sync, config.inter_byte_timeout_ms)
    }

    /// Read one frame
    ///
    /// Returns `Ok(None)` if nothing arrived before the deadline. A partial
    /// frame at the deadline is discarded and reported as
    /// [`LinkError::TimeoutMidMessage`]. On any error the assembler is
    /// empty again, so the next call starts clean.
    pub fn read<T, C>(
        &mut self,
        transport: &mut T,
        clock: &C,
        timeout_ms: u32,
        max_frame_len: usize,
    ) -> Result<Option<Frame>, LinkError<T::Error>>
    where
        T: ByteTransport,
        C: Clock,
    {
        let mut deadline = clock.now_ms() + timeout_ms as u64;

        while clock.now_ms() <= deadline {
            if transport.bytes_available() == 0 {
                continue;
            }

            let byte = match transport.read_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    self.assembler.reset();
                    return Err(LinkError::Transport(e));
                }
            };
            deadline += self.inter_byte_timeout_ms as u64;

            if let Some(frame) = self.assembler.feed(byte, max_frame_len)? {
                self.frames_received = self.frames_received.wrapping_add(1);
                return Ok(Some(frame));
            }
        }

        if self.assembler.is_idle() {
            Ok(None)
        } else {
            self.assembler.reset();
            Err(LinkError::TimeoutMidMessage)
        }
    }

    /// Frames successfully read since creation or the last reset
    pub fn frames_received(&self) -> u32 {
        self.frames_received
    }

    /// Whether no frame is partially assembled
    pub fn is_idle(&self) -> bool {
        self.assembler.is_idle()
    }

    /// Drop any partial frame and zero the counter
    pub fn reset(&mut self) {
        self.assembler.reset();
        self.frames_received = 0;
    }
}
