use crate::traits::Channel;

/// Boxed source error carried by backend-specific failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in pin-access operations.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The pin-access subsystem could not be initialized.
    #[error("failed to set up {target}: {source}")]
    Setup { target: String, source: BoxError },

    /// A pin primitive was used before `setup()` succeeded.
    #[error("pin access used before setup")]
    NotInitialized,

    /// The channel does not exist on the selected device.
    #[error("channel {channel} out of range (device has {lines} lines)")]
    ChannelOutOfRange { channel: Channel, lines: u32 },

    /// The channel was pulled up or read without first being set to input.
    #[error("channel {0} is not configured as an input")]
    NotConfigured(Channel),

    /// Setting the channel's direction or bias failed.
    #[error("failed to configure channel {channel}: {source}")]
    Configure { channel: Channel, source: BoxError },

    /// Reading the channel's level failed.
    #[error("failed to read channel {channel}: {source}")]
    Read { channel: Channel, source: BoxError },
}

pub type Result<T> = std::result::Result<T, AccessError>;
