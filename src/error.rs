//! Error type shared by evaluation, differentiation and the WAV boundary.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChannelError>;

/// Everything that can go wrong while evaluating or rendering a channel.
///
/// Reads outside a [`SampledChannel`](crate::SampledChannel) buffer are not
/// errors; they are defined to yield `0.0`.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{operation} is undefined for {value} at t = {t}")]
    Domain {
        operation: &'static str,
        t: f64,
        value: f64,
    },

    #[error("division of {numerator} by zero at t = {t}")]
    DivisionByZero { t: f64, numerator: f64 },

    #[error("{operation} is not supported by {variant}")]
    UnsupportedOperation {
        operation: &'static str,
        variant: &'static str,
    },

    #[error("sampled channel is already populated")]
    AlreadySampled,

    #[error("track has no channels")]
    EmptyTrack,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "wav")]
    #[error("wav codec error: {0}")]
    Wav(#[from] hound::Error),
}

impl ChannelError {
    pub(crate) fn unsupported(operation: &'static str, variant: &'static str) -> Self {
        ChannelError::UnsupportedOperation { operation, variant }
    }
}
