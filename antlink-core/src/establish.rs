//! Channel establishment state machine
//!
//! Bringing up a receive channel takes ten steps. Each call to
//! [`AntDriver::progress_channel_establishment`](crate::AntDriver::progress_channel_establishment)
//! performs at most one of them:
//!
//! ```text
//! Entry → RequestCapabilities → AssignChannel → SetChannelId
//!       → SetNetworkKey → SetSearchTimeout → SetRadioFrequency
//!       → SetMessagePeriod → OpenChannel → AwaitOpen → (Entry)
//! ```
//!
//! A step that could not be performed is retried on the next call. A
//! stalled link sends the machine back to `Entry`.

use antlink_protocol::messages::id;
use antlink_protocol::{ChannelType, ConfigMessage};

use crate::config::ChannelConfig;

/// Establishment steps in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupStep {
    /// Nothing sent yet
    #[default]
    Entry,
    RequestCapabilities,
    AssignChannel,
    SetChannelId,
    SetNetworkKey,
    SetSearchTimeout,
    SetRadioFrequency,
    SetMessagePeriod,
    OpenChannel,
    /// Waiting for the radio to acknowledge the open
    AwaitOpen,
}

/// Result of attempting a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// The step's work was done
    Done,
    /// Not ready yet; try the same step again
    Blocked,
    /// The link stalled and was reset
    Stalled,
}

/// What a step does when attempted
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepAction {
    /// No message; the step always succeeds
    Begin,
    /// Send this message
    Send(ConfigMessage),
    /// Succeeds once no response is owed
    Confirm,
}

/// Externally visible progress after one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EstablishStatus {
    /// Not finished yet, call again
    Progressing,
    /// The channel is open
    Complete,
}

impl SetupStep {
    /// All steps in execution order
    pub const ALL: [SetupStep; 10] = [
        SetupStep::Entry,
        SetupStep::RequestCapabilities,
        SetupStep::AssignChannel,
        SetupStep::SetChannelId,
        SetupStep::SetNetworkKey,
        SetupStep::SetSearchTimeout,
        SetupStep::SetRadioFrequency,
        SetupStep::SetMessagePeriod,
        SetupStep::OpenChannel,
        SetupStep::AwaitOpen,
    ];

    /// Position of this step, 0 to 9
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The step that follows a completed one
    pub fn next(self) -> Self {
        let next = (self.index() as usize + 1) % Self::ALL.len();
        Self::ALL[next]
    }

    /// Process an attempt outcome and return the step to run next
    pub fn transition(self, outcome: StepOutcome) -> Self {
        match outcome {
            StepOutcome::Done => self.next(),
            StepOutcome::Blocked => self,
            StepOutcome::Stalled => SetupStep::Entry,
        }
    }

    /// Whether completing this step finishes establishment
    pub fn is_final(self) -> bool {
        self == SetupStep::AwaitOpen
    }

    /// The work this step performs for a channel
    pub fn action(self, config: &ChannelConfig) -> StepAction {
        let channel = config.channel_number;
        match self {
            SetupStep::Entry => StepAction::Begin,
            SetupStep::RequestCapabilities => StepAction::Send(ConfigMessage::Request {
                channel: 0,
                requested: id::CAPABILITIES,
            }),
            SetupStep::AssignChannel => StepAction::Send(ConfigMessage::AssignChannel {
                channel,
                channel_type: ChannelType::Receive,
                network: config.network_number,
            }),
            // Wildcard device number and transmission type
            SetupStep::SetChannelId => StepAction::Send(ConfigMessage::SetChannelId {
                channel,
                device_number: 0,
                device_type: config.device_type,
                transmission_type: 0,
            }),
            SetupStep::SetNetworkKey => StepAction::Send(ConfigMessage::SetNetworkKey {
                network: config.network_number,
                key: config.network_key,
            }),
            SetupStep::SetSearchTimeout => StepAction::Send(ConfigMessage::SetSearchTimeout {
                channel,
                timeout: config.search_timeout,
            }),
            SetupStep::SetRadioFrequency => StepAction::Send(ConfigMessage::SetRadioFrequency {
                channel,
                offset: config.frequency_offset,
            }),
            SetupStep::SetMessagePeriod => StepAction::Send(ConfigMessage::SetMessagePeriod {
                channel,
                period: config.message_period,
            }),
            SetupStep::OpenChannel => StepAction::Send(ConfigMessage::OpenChannel { channel }),
            SetupStep::AwaitOpen => StepAction::Confirm,
        }
    }
}

/// Establishment run for one channel
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSetup {
    config: ChannelConfig,
    step: SetupStep,
}

impl ChannelSetup {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            step: SetupStep::Entry,
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Step the next call will attempt
    pub fn step(&self) -> SetupStep {
        self.step
    }

    /// Apply an attempt outcome
    pub fn apply(&mut self, outcome: StepOutcome) {
        self.step = self.step.transition(outcome);
    }

    /// Start over from the first step
    pub fn restart(&mut self) {
        self.step = SetupStep::Entry;
    }
}
