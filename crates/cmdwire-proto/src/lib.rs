//! Wire format for cmdwire commands.
//!
//! A command travels as five fields, every integer an unsigned 32-bit
//! little-endian value:
//!
//! ```text
//! [kind:4][originLen:4][origin:originLen][metaLen:4][meta:metaLen]
//! ```
//!
//! There is no magic number, version, or checksum. A reader that loses its
//! place in the stream cannot resynchronize; the connection has to be
//! re-established.
//!
//! # Security
//!
//! Decoding is bounded by [`DecodeLimits`]. Declared lengths are checked
//! against the limits before any buffer is allocated for them.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod errors;
pub mod frame;
pub mod kind;
pub mod origin;

pub use command::Command;
pub use errors::{ProtocolError, Result};
pub use frame::{
    DecodeLimits, EncodeFrame, FrameField, FrameFields, LENGTH_PREFIX_SIZE, read_command,
};
pub use kind::CommandKind;
pub use origin::Origin;
