//! Framed command sending.
//!
//! # Sequence
//!
//! ```text
//! frame_fields ─> acquire ─> write kind ─> flush ─> ... ─> write metadata ─> flush ─> release
//!       │            │                          │
//!       │            └─ Err: GuardUnavailable   └─ Err: release, then SinkWrite / SinkFlush
//!       └─ Err: EncodingOverflow
//! ```
//!
//! The frame is encoded before the guard is taken, so an oversized command
//! never holds the guard and never puts a byte on the wire. Once the guard is
//! held, a write or flush failure stops the sequence at that field; the peer
//! has seen every earlier field in full and nothing is retried.

use std::time::Duration;

use cmdwire_proto::{EncodeFrame, FrameFields};
use tracing::{debug, trace, warn};

use crate::{
    error::SendError,
    guard::{ExclusionGuard, Permit},
    sink::CommandSink,
};

/// Send `command` on `sink` while holding `guard`, blocking until the guard is
/// available.
///
/// # Errors
///
/// - `EncodingOverflow` if a field does not fit its length prefix
/// - `GuardUnavailable` if the guard cannot be acquired
/// - `SinkWrite` / `SinkFlush` naming the field that failed
/// - `GuardRelease` if the frame went out but the guard refused the release
pub fn send_command<S, C, G>(sink: &mut S, command: &C, guard: &G) -> Result<(), SendError>
where
    S: CommandSink + ?Sized,
    C: EncodeFrame + ?Sized,
    G: ExclusionGuard + ?Sized,
{
    send_command_timeout(sink, command, guard, None)
}

/// Like [`send_command`], waiting at most `acquire_timeout` for the guard.
///
/// `None` waits indefinitely.
pub fn send_command_timeout<S, C, G>(
    sink: &mut S,
    command: &C,
    guard: &G,
    acquire_timeout: Option<Duration>,
) -> Result<(), SendError>
where
    S: CommandSink + ?Sized,
    C: EncodeFrame + ?Sized,
    G: ExclusionGuard + ?Sized,
{
    let fields = command.frame_fields().map_err(SendError::EncodingOverflow)?;

    let permit = match acquire_timeout {
        Some(timeout) => Permit::acquire_timeout(guard, timeout),
        None => Permit::acquire(guard),
    }
    .map_err(SendError::GuardUnavailable)?;

    let written = write_fields(sink, &fields);
    let released = permit.release();

    if let Err(error) = &released {
        warn!(%error, "failed to release exclusion guard after send");
    }
    written?;
    released.map_err(SendError::GuardRelease)?;

    debug!(kind = fields.kind_code(), frame_len = fields.encoded_len(), "command sent");
    Ok(())
}

fn write_fields<S>(sink: &mut S, fields: &FrameFields) -> Result<(), SendError>
where
    S: CommandSink + ?Sized,
{
    for (field, bytes) in fields.iter() {
        sink.write_field(bytes).map_err(|source| {
            warn!(%field, error = %source, "field write failed, frame aborted");
            SendError::SinkWrite { field, source }
        })?;
        sink.flush().map_err(|source| {
            warn!(%field, error = %source, "field flush failed, frame aborted");
            SendError::SinkFlush { field, source }
        })?;
        trace!(%field, len = bytes.len(), "field flushed");
    }
    Ok(())
}
