//! Send path error types.

use std::{io, time::Duration};

use cmdwire_proto::{FrameField, ProtocolError};
use thiserror::Error;

/// Failure of an exclusion guard operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// A thread panicked while holding the primitive's internal lock.
    #[error("exclusion primitive is poisoned")]
    Poisoned,

    /// No permit became available in time.
    #[error("timed out after {0:?} waiting for exclusion guard")]
    Timeout(Duration),

    /// Release would raise the count above its maximum.
    #[error("release would exceed maximum count of {max}")]
    Overflow {
        /// Maximum count of the primitive.
        max: usize,
    },

    /// Guard implementation refused the operation.
    #[error("exclusion guard refused: {0}")]
    Refused(String),
}

/// Failure of a framed send.
///
/// Whenever the guard was acquired it has been released by the time this
/// error reaches the caller.
#[derive(Debug, Error)]
pub enum SendError {
    /// Guard could not be acquired. No bytes were written.
    #[error("exclusion guard unavailable")]
    GuardUnavailable(#[source] GuardError),

    /// Writing a field failed. Fields before it reached the sink intact.
    #[error("failed to write {field} field")]
    SinkWrite {
        /// Field being written.
        field: FrameField,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Flushing after a field failed.
    #[error("failed to flush {field} field")]
    SinkFlush {
        /// Field just written.
        field: FrameField,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Origin or metadata does not fit a 32-bit length prefix. No bytes were
    /// written and the guard was never acquired.
    #[error("command does not fit the frame format")]
    EncodingOverflow(#[source] ProtocolError),

    /// Frame was written but the guard refused the release.
    #[error("failed to release exclusion guard")]
    GuardRelease(#[source] GuardError),
}

impl SendError {
    /// Field whose write or flush failed.
    pub fn field(&self) -> Option<FrameField> {
        match self {
            Self::SinkWrite { field, .. } | Self::SinkFlush { field, .. } => Some(*field),
            Self::GuardUnavailable(_) | Self::EncodingOverflow(_) | Self::GuardRelease(_) => None,
        }
    }
}
