//! ANT link driver
//!
//! [`AntDriver`] owns the serial transport, the control lines and the
//! clock, and layers the flow-control gate, packet reader and transmitter
//! on top. It is driven entirely by polling from one control loop.

use antlink_hal::{ByteTransport, Clock};
use antlink_protocol::messages::id;
use antlink_protocol::{ConfigMessage, Frame, MAX_FRAME_SIZE};

use crate::config::LinkConfig;
use crate::control::RadioControl;
use crate::error::LinkError;
use crate::establish::{ChannelSetup, EstablishStatus, StepAction, StepOutcome};
use crate::flow::{FlowGate, ReadySignal};
use crate::reader::{PacketReader, Received};

/// Host-side driver for one ANT radio
pub struct AntDriver<'a, T, C, H> {
    transport: T,
    clock: C,
    control: H,
    gate: FlowGate<'a>,
    reader: PacketReader,
    config: LinkConfig,
    frames_sent: u32,
    hard_resets: u32,
    stall_strikes: u16,
}

impl<'a, T, C, H> AntDriver<'a, T, C, H>
where
    T: ByteTransport,
    C: Clock,
    H: RadioControl,
{
    /// Take ownership of the link and put the control lines in their
    /// running state (reset released, not suspended, awake)
    ///
    /// `signal` is the grant written by the RTS edge handler. Any grant
    /// left over from before is dropped.
    pub fn begin(
        transport: T,
        clock: C,
        mut control: H,
        signal: &'a ReadySignal,
        config: LinkConfig,
    ) -> Self {
        control.set_reset(false);
        control.set_suspend(false);
        control.set_sleep(false);
        signal.clear();

        #[cfg(feature = "defmt")]
        defmt::info!("ANT link up, max frame {} bytes", config.max_frame_len);

        Self {
            transport,
            clock,
            control,
            gate: FlowGate::new(signal),
            reader: PacketReader::from_config(&config),
            config,
            frames_sent: 0,
            hard_resets: 0,
            stall_strikes: 0,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Grant signal to hand to the RTS edge handler
    pub fn ready_signal(&self) -> &'a ReadySignal {
        self.gate.signal()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn control(&self) -> &H {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut H {
        &mut self.control
    }

    /// Frames read successfully since start or the last hardware reset
    pub fn frames_received(&self) -> u32 {
        self.reader.frames_received()
    }

    /// Frames written since start or the last hardware reset
    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    /// Hardware resets performed over the driver's lifetime
    pub fn hard_reset_count(&self) -> u32 {
        self.hard_resets
    }

    /// Message id the driver is waiting for, if any
    pub fn awaiting_response(&self) -> Option<u8> {
        self.gate.response_wait().expected()
    }

    /// Grant pending, no response owed, and RTS at rest
    pub fn is_ready_to_send(&self) -> bool {
        self.gate.is_open() && !self.control.rts_asserted()
    }

    /// Put the radio to sleep or wake it
    pub fn sleep(&mut self, asleep: bool) {
        self.control.set_sleep(asleep);
    }

    /// Assert or release SUSPEND
    pub fn suspend(&mut self, suspended: bool) {
        self.control.set_suspend(suspended);
    }

    /// Pulse RESET and return the driver to its power-up state
    ///
    /// Drops the grant, any partial frame and both frame counters. The
    /// response wait is cleared too, but with `await_startup_after_reset`
    /// (the default) it is immediately re-armed for START_UP, so sends stay
    /// blocked until the radio has announced itself. Turn that option off
    /// to leave the wait idle after a reset.
    pub fn hardware_reset(&mut self) {
        self.control.set_sleep(false);
        self.control.set_reset(true);
        self.control.delay_ms(self.config.reset_pulse_ms);
        self.control.set_reset(false);

        self.gate.reset();
        self.reader.reset();
        self.frames_sent = 0;
        self.stall_strikes = 0;
        self.hard_resets = self.hard_resets.wrapping_add(1);

        if self.config.await_startup_after_reset {
            self.gate.await_response(Some(id::STARTUP));
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("ANT hardware reset #{}", self.hard_resets);
    }

    /// Send one message
    ///
    /// Fails with [`LinkError::NotReady`] without writing anything unless
    /// [`is_ready_to_send`](Self::is_ready_to_send) holds. On success the
    /// grant is consumed and the driver waits for `expected` (if given)
    /// before it will send again.
    pub fn send(
        &mut self,
        msg_id: u8,
        expected: Option<u8>,
        payload: &[u8],
    ) -> Result<(), LinkError<T::Error>> {
        let frame = Frame::new(msg_id, payload)?;
        self.send_frame(&frame, expected)
    }

    /// Send a typed configuration message, awaiting its usual response
    pub fn send_message(&mut self, message: &ConfigMessage) -> Result<(), LinkError<T::Error>> {
        let frame = message.to_frame()?;
        self.send_frame(&frame, message.expected_response())
    }

    fn send_frame(&mut self, frame: &Frame, expected: Option<u8>) -> Result<(), LinkError<T::Error>> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = frame.encode(&mut buffer)?;

        if self.control.rts_asserted() || !self.gate.acquire() {
            return Err(LinkError::NotReady);
        }

        self.transport
            .write_all(&buffer[..len])
            .map_err(LinkError::Transport)?;
        self.transport.flush().map_err(LinkError::Transport)?;

        self.frames_sent = self.frames_sent.wrapping_add(1);
        self.gate.await_response(expected);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "TX {} ({=u8:#x}), {} payload bytes",
            antlink_protocol::message_name(frame.msg_id),
            frame.msg_id,
            frame.payload.len()
        );

        Ok(())
    }

    /// Read one frame within `timeout_ms`
    ///
    /// Returns `Ok(None)` when the line stays idle. A frame matching the
    /// awaited response clears the wait and is returned as
    /// [`Received::Expected`]; anything else is [`Received::Other`].
    pub fn read_packet(&mut self, timeout_ms: u32) -> Result<Option<Received>, LinkError<T::Error>> {
        let result = self.reader.read(
            &mut self.transport,
            &self.clock,
            timeout_ms,
            self.config.max_frame_len,
        );

        let frame = match result {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(e) => {
                #[cfg(feature = "defmt")]
                match &e {
                    LinkError::Frame(frame_error) => defmt::warn!("RX dropped: {}", frame_error),
                    LinkError::TimeoutMidMessage => defmt::warn!("RX timed out mid-frame"),
                    _ => {}
                }
                return Err(e);
            }
        };

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "RX {} ({=u8:#x})",
            antlink_protocol::message_name(frame.msg_id),
            frame.msg_id
        );

        if self.gate.on_frame(frame.msg_id) {
            Ok(Some(Received::Expected(frame)))
        } else {
            Ok(Some(Received::Other(frame)))
        }
    }

    /// Read one frame using the configured `read_timeout_ms`
    pub fn poll_packet(&mut self) -> Result<Option<Received>, LinkError<T::Error>> {
        self.read_packet(self.config.read_timeout_ms)
    }

    /// Perform at most one channel establishment step
    ///
    /// Call repeatedly, reading packets in between, until it returns
    /// [`EstablishStatus::Complete`] or an error. A step that cannot send
    /// yet is retried on the next call. If sends keep failing while RTS
    /// sits at rest for `stall_threshold` consecutive calls, the radio is
    /// hardware reset, `setup` goes back to its first step and
    /// [`LinkError::LinkStall`] is returned.
    pub fn progress_channel_establishment(
        &mut self,
        setup: &mut ChannelSetup,
    ) -> Result<EstablishStatus, LinkError<T::Error>> {
        let step = setup.step();

        let outcome = match step.action(setup.config()) {
            StepAction::Begin => StepOutcome::Done,
            StepAction::Send(message) => match self.send_message(&message) {
                Ok(()) => StepOutcome::Done,
                Err(LinkError::NotReady) => self.stall_strike(),
                Err(e) => return Err(e),
            },
            StepAction::Confirm => {
                if self.awaiting_response().is_none() {
                    StepOutcome::Done
                } else {
                    self.stall_strike()
                }
            }
        };

        setup.apply(outcome);

        match outcome {
            StepOutcome::Done => {
                self.stall_strikes = 0;
                if step.is_final() {
                    #[cfg(feature = "defmt")]
                    defmt::info!("channel {} open", setup.config().channel_number);
                    Ok(EstablishStatus::Complete)
                } else {
                    Ok(EstablishStatus::Progressing)
                }
            }
            StepOutcome::Blocked => Ok(EstablishStatus::Progressing),
            StepOutcome::Stalled => Err(LinkError::LinkStall),
        }
    }

    /// Count a failed step and reset the radio once the strikes run out
    fn stall_strike(&mut self) -> StepOutcome {
        if self.control.rts_asserted() {
            // Radio is busy, not stalled
            self.stall_strikes = 0;
            return StepOutcome::Blocked;
        }

        self.stall_strikes = self.stall_strikes.saturating_add(1);
        if self.stall_strikes < self.config.stall_threshold.max(1) {
            return StepOutcome::Blocked;
        }

        #[cfg(feature = "defmt")]
        defmt::error!("ANT link stalled after {} strikes", self.stall_strikes);

        self.hardware_reset();
        StepOutcome::Stalled
    }
}
