//! Protocol error types.

use thiserror::Error;

use crate::frame::FrameField;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while building, encoding, or decoding a command frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Buffer ended before the field was complete.
    #[error("frame truncated in {field}: need {needed} bytes, have {available}")]
    Truncated {
        /// Field being decoded when the input ran out.
        field: FrameField,
        /// Bytes required to finish the field.
        needed: usize,
        /// Bytes remaining in the input.
        available: usize,
    },

    /// Kind code does not name a [`crate::CommandKind`].
    #[error("unknown command kind: {0}")]
    UnknownCommandKind(u32),

    /// Origin text contains non-ASCII bytes.
    #[error("origin is not ASCII: {0:?}")]
    NonAsciiOrigin(String),

    /// Origin text is empty.
    #[error("origin is empty")]
    EmptyOrigin,

    /// Origin length exceeds the host name cap or the decode limit.
    #[error("origin length {len} exceeds limit of {max} bytes")]
    OriginTooLong {
        /// Length in bytes.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Declared metadata length exceeds the decode limit.
    #[error("metadata length {len} exceeds limit of {max} bytes")]
    MetadataTooLarge {
        /// Length in bytes.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Field is too long to describe with a 32-bit length prefix.
    #[error("{field} of {len} bytes does not fit a 32-bit length prefix")]
    LengthOverflow {
        /// Field whose length overflowed.
        field: FrameField,
        /// Actual length in bytes.
        len: usize,
    },

    /// Reading a field from a stream failed.
    #[error("I/O error reading {field}")]
    Io {
        /// Field being read when the error occurred.
        field: FrameField,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
