//! Link error type

use antlink_protocol::FrameError;

/// Errors reported by the link driver
///
/// `E` is the transport's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Framing failure (bad sync, checksum, oversize packet or payload)
    Frame(FrameError),
    /// A frame started but the line went quiet before it completed
    TimeoutMidMessage,
    /// No RTS grant is pending, RTS is asserted, or a response is still owed
    NotReady,
    /// The radio stopped granting sends and was hardware reset
    LinkStall,
    /// The serial transport failed
    Transport(E),
}

impl<E> From<FrameError> for LinkError<E> {
    fn from(e: FrameError) -> Self {
        LinkError::Frame(e)
    }
}

impl<E> LinkError<E> {
    /// True for errors that leave the link usable on the next poll
    ///
    /// Framing errors and timeouts discard only the partial frame. A stall
    /// has already been handled by a hardware reset.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LinkError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_frame_error() {
        let e: LinkError<()> = FrameError::BadChecksum.into();
        assert_eq!(e, LinkError::Frame(FrameError::BadChecksum));
        assert!(e.is_recoverable());
        assert!(!LinkError::Transport(()).is_recoverable());
    }
}
