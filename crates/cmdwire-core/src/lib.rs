//! cmdwire send path
//!
//! Writes [`cmdwire_proto::Command`] frames to a byte sink while holding a
//! shared exclusion guard. Nothing here opens connections: the caller hands
//! in the sink and the guard, and the send path only writes, flushes,
//! acquires and releases.
//!
//! # Ordering
//!
//! Every caller sending on one sink shares one guard. The guard is acquired
//! before the first byte of a frame and released after the last flush, or
//! after the failing call when a write or flush fails. Release goes through a
//! scoped [`Permit`], so it also happens when the sink panics.
//!
//! # Components
//!
//! - [`sink`]: byte sink abstraction
//! - [`guard`]: exclusion guard abstraction and scoped permit
//! - [`semaphore`]: blocking counting semaphore
//! - [`sender`]: the framed send operation
//! - [`client`]: named client bundling a sink, a guard and configuration
//! - [`error`]: send and guard error types

pub mod client;
pub mod error;
pub mod guard;
pub mod semaphore;
pub mod sender;
pub mod sink;

pub use client::{ClientConfig, CommandClient};
pub use error::{GuardError, SendError};
pub use guard::{ExclusionGuard, Permit};
pub use semaphore::Semaphore;
pub use sender::{send_command, send_command_timeout};
pub use sink::CommandSink;
