//! Frame encoding and decoding.
//!
//! Frame format:
//! - SYNC (1 byte): 0xA4
//! - LENGTH (1 byte): payload length (0-249)
//! - MSG ID (1 byte): message identifier
//! - PAYLOAD (0-249 bytes): message-specific data
//! - CHECKSUM (1 byte): XOR of SYNC, LENGTH, MSG ID and all PAYLOAD bytes

use heapless::Vec;

/// Sync byte for host-to-radio framing (also emitted by the radio on the
/// asynchronous serial interface)
pub const SYNC_TX: u8 = 0xA4;

/// Sync byte for the alternate radio-to-host framing of the protocol family
pub const SYNC_RX: u8 = 0xA5;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 249;

/// Bytes around the payload: SYNC + LENGTH + MSG ID + CHECKSUM
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Errors that can occur during frame assembly or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds the protocol maximum
    PayloadTooLarge,
    /// First byte of a frame was not the sync marker
    MissingSync,
    /// Complete frame failed the checksum
    BadChecksum,
    /// Frame would exceed the receiver's size limit
    PacketTooLarge,
    /// Output buffer too small for encoding
    BufferTooSmall,
    /// Payload does not match what its message id requires
    InvalidFrame,
}

/// XOR-fold of a byte sequence
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// A validated or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Message identifier
    pub msg_id: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given message id and payload
    pub fn new(msg_id: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_id, payload })
    }

    /// Create a frame with no payload
    pub fn empty(msg_id: u8) -> Self {
        Self {
            msg_id,
            payload: Vec::new(),
        }
    }

    /// Size of this frame on the wire
    pub fn wire_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Encode this frame into a byte buffer using the given sync byte
    ///
    /// Returns the number of bytes written
    pub fn encode_with_sync(&self, sync: u8, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.wire_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let body_end = frame_len - 1;
        buffer[0] = sync;
        buffer[1] = self.payload.len() as u8;
        buffer[2] = self.msg_id;
        buffer[3..body_end].copy_from_slice(&self.payload);
        buffer[body_end] = checksum(&buffer[..body_end]);

        Ok(frame_len)
    }

    /// Encode this frame into a byte buffer with the host-to-radio sync byte
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        self.encode_with_sync(SYNC_TX, buffer)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }

    /// Decode one complete frame from a byte slice
    ///
    /// The slice must hold exactly one frame, checksum included.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        let (&sync, rest) = bytes.split_first().ok_or(FrameError::InvalidFrame)?;
        if sync != SYNC_TX {
            return Err(FrameError::MissingSync);
        }
        let &length = rest.first().ok_or(FrameError::InvalidFrame)?;
        if length as usize > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PacketTooLarge);
        }
        if bytes.len() != length as usize + FRAME_OVERHEAD {
            return Err(FrameError::InvalidFrame);
        }

        let body_end = bytes.len() - 1;
        if checksum(&bytes[..body_end]) != bytes[body_end] {
            return Err(FrameError::BadChecksum);
        }

        Self::new(bytes[2], &bytes[3..body_end])
    }
}

/// Byte-at-a-time frame assembler
///
/// Each byte is classified by how many bytes the assembler already holds:
/// the first must be the sync marker, the second is the length, then the
/// message id and payload follow and the final byte is the checksum.
///
/// The assembler never hunts for a sync byte. A stray byte at the start of
/// a frame is reported as [`FrameError::MissingSync`] and left to the
/// caller. Every terminal outcome (frame or error) leaves it empty.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    sync: u8,
    /// SYNC, LENGTH, MSG ID and payload bytes received so far
    buffer: Vec<u8, MAX_FRAME_SIZE>,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(SYNC_TX)
    }
}

impl FrameAssembler {
    /// Create an assembler that expects the given sync byte
    pub fn new(sync: u8) -> Self {
        Self {
            sync,
            buffer: Vec::new(),
        }
    }

    /// Discard any partial frame
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// True when no frame is in progress
    pub fn is_idle(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of bytes of the current frame received so far
    pub fn fill(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte
    ///
    /// `max_frame_len` bounds the complete frame size, checksum included.
    /// Returns `Ok(Some(frame))` when a valid frame completes, `Ok(None)`
    /// when more bytes are needed, or `Err` on a framing error.
    pub fn feed(&mut self, byte: u8, max_frame_len: usize) -> Result<Option<Frame>, FrameError> {
        match self.buffer.len() {
            0 => {
                if byte != self.sync {
                    return Err(FrameError::MissingSync);
                }
                self.push(byte)?;
                Ok(None)
            }
            1 => {
                let frame_len = byte as usize + FRAME_OVERHEAD;
                if frame_len > max_frame_len.min(MAX_FRAME_SIZE) {
                    self.reset();
                    return Err(FrameError::PacketTooLarge);
                }
                self.push(byte)?;
                Ok(None)
            }
            count => {
                let body_len = self.buffer[1] as usize + FRAME_OVERHEAD - 1;
                if count < body_len {
                    self.push(byte)?;
                    return Ok(None);
                }

                // Final byte is the checksum
                let valid = checksum(&self.buffer) == byte;
                let frame = Frame::new(self.buffer[2], &self.buffer[3..]);
                self.reset();

                if valid {
                    frame.map(Some)
                } else {
                    Err(FrameError::BadChecksum)
                }
            }
        }
    }

    /// Feed multiple bytes
    ///
    /// Returns the first complete frame found, if any. Bytes after a
    /// complete frame or an error are not consumed.
    pub fn feed_bytes(
        &mut self,
        bytes: &[u8],
        max_frame_len: usize,
    ) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte, max_frame_len)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn push(&mut self, byte: u8) -> Result<(), FrameError> {
        self.buffer.push(byte).map_err(|_| {
            self.buffer.clear();
            FrameError::PacketTooLarge
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::id;
    use proptest::prelude::*;

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::empty(id::SYSTEM_RESET);
        let mut buffer = [0u8; 10];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(buffer[0], SYNC_TX);
        assert_eq!(buffer[1], 0);
        assert_eq!(buffer[2], id::SYSTEM_RESET);
        assert_eq!(buffer[3], SYNC_TX ^ id::SYSTEM_RESET);
    }

    #[test]
    fn test_capability_request_bytes() {
        let frame = Frame::new(id::REQUEST, &[0, id::CAPABILITIES]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        assert_eq!(&encoded[..], &[0xA4, 0x02, 0x4D, 0x00, 0x54, 0xBF]);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(id::OPEN_CHANNEL, &[0]).unwrap();
        let mut buffer = [0u8; 4];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = Frame::new(id::BROADCAST_DATA, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let frame = Frame::new(id::ASSIGN_CHANNEL, &[0, 0, 0]).unwrap();
        let mut encoded = frame.encode_to_vec().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0x01;

        assert_eq!(Frame::decode(&encoded), Err(FrameError::BadChecksum));
    }

    #[test]
    fn test_decode_rejects_truncated() {
        let frame = Frame::new(id::ASSIGN_CHANNEL, &[0, 0, 0]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        assert_eq!(
            Frame::decode(&encoded[..encoded.len() - 1]),
            Err(FrameError::InvalidFrame)
        );
        assert_eq!(Frame::decode(&[]), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_assembler_roundtrip() {
        let original = Frame::new(id::BROADCAST_DATA, &[0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let mut assembler = FrameAssembler::default();
        let parsed = assembler
            .feed_bytes(&encoded, MAX_FRAME_SIZE)
            .unwrap()
            .unwrap();

        assert_eq!(parsed, original);
        assert!(assembler.is_idle());
    }

    #[test]
    fn test_assembler_missing_sync_does_not_advance() {
        let mut assembler = FrameAssembler::default();

        for byte in [0x00, 0xFF, 0x12, SYNC_RX] {
            assert_eq!(
                assembler.feed(byte, MAX_FRAME_SIZE),
                Err(FrameError::MissingSync)
            );
            assert_eq!(assembler.fill(), 0);
        }
    }

    #[test]
    fn test_assembler_custom_sync() {
        let mut assembler = FrameAssembler::new(SYNC_RX);
        assert_eq!(
            assembler.feed(SYNC_TX, MAX_FRAME_SIZE),
            Err(FrameError::MissingSync)
        );
        assert_eq!(assembler.feed(SYNC_RX, MAX_FRAME_SIZE), Ok(None));
        assert_eq!(assembler.fill(), 1);
    }

    #[test]
    fn test_assembler_packet_too_large() {
        let mut assembler = FrameAssembler::default();
        assert_eq!(assembler.feed(SYNC_TX, 12), Ok(None));
        // 9 payload bytes + 4 overhead = 13 > 12
        assert_eq!(assembler.feed(9, 12), Err(FrameError::PacketTooLarge));
        assert!(assembler.is_idle());
    }

    #[test]
    fn test_assembler_exact_limit_accepted() {
        let frame = Frame::new(id::BROADCAST_DATA, &[0; 9]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let mut assembler = FrameAssembler::default();
        let parsed = assembler.feed_bytes(&encoded, 13).unwrap();
        assert_eq!(parsed, Some(frame));
    }

    #[test]
    fn test_assembler_bad_checksum_resets() {
        let frame = Frame::new(id::RESPONSE_EVENT, &[0, id::OPEN_CHANNEL, 0]).unwrap();
        let mut encoded = frame.encode_to_vec().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let mut assembler = FrameAssembler::default();
        assert_eq!(
            assembler.feed_bytes(&encoded, MAX_FRAME_SIZE),
            Err(FrameError::BadChecksum)
        );
        assert!(assembler.is_idle());

        // The next frame is read cleanly
        let good = frame.encode_to_vec().unwrap();
        assert_eq!(
            assembler.feed_bytes(&good, MAX_FRAME_SIZE),
            Ok(Some(frame))
        );
    }

    #[test]
    fn test_single_bit_flips_are_rejected() {
        let frame = Frame::new(id::CHANNEL_ID, &[0, 0, 0, 120, 0]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        for index in 0..encoded.len() {
            for bit in 0..8 {
                let mut corrupted = encoded.clone();
                corrupted[index] ^= 1 << bit;

                let mut assembler = FrameAssembler::default();
                let result = assembler.feed_bytes(&corrupted, MAX_FRAME_SIZE);
                assert!(
                    !matches!(result, Ok(Some(_))),
                    "byte {} bit {} yielded a frame",
                    index,
                    bit
                );

                match index {
                    0 => assert_eq!(result, Err(FrameError::MissingSync)),
                    // A bad length either truncates the frame or leaves it incomplete
                    1 => {}
                    _ => assert_eq!(
                        result,
                        Err(FrameError::BadChecksum),
                        "byte {} bit {}",
                        index,
                        bit
                    ),
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_encode_decode_roundtrip(
            msg_id in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
        ) {
            let frame = Frame::new(msg_id, &payload).unwrap();
            let encoded = frame.encode_to_vec().unwrap();

            let last = encoded.len() - 1;
            prop_assert_eq!(checksum(&encoded[..last]), encoded[last]);

            let decoded = Frame::decode(&encoded).unwrap();
            prop_assert_eq!(decoded.msg_id, msg_id);
            prop_assert_eq!(&decoded.payload[..], &payload[..]);

            let mut assembler = FrameAssembler::default();
            let assembled = assembler.feed_bytes(&encoded, MAX_FRAME_SIZE).unwrap();
            prop_assert_eq!(assembled, Some(frame));
        }
    }
}
