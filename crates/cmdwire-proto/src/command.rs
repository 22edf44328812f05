//! The command value sent from client to server.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{kind::CommandKind, origin::Origin};

/// A ready-to-send command.
///
/// Immutable once built. Metadata that is present but empty is stored as
/// absent: both encode to a zero metadata length, so keeping them apart would
/// make decoded commands compare unequal to the ones that were sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCommand")]
pub struct Command {
    kind: CommandKind,
    origin: Origin,
    metadata: Option<Bytes>,
}

impl Command {
    /// Build a command.
    pub fn new(kind: CommandKind, origin: impl Into<Origin>, metadata: Option<Bytes>) -> Self {
        Self { kind, origin: origin.into(), metadata: metadata.filter(|m| !m.is_empty()) }
    }

    /// Build a command that carries no metadata.
    pub fn bare(kind: CommandKind, origin: impl Into<Origin>) -> Self {
        Self::new(kind, origin, None)
    }

    /// Command kind.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Originating address.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Metadata buffer, `None` when absent.
    pub fn metadata(&self) -> Option<&Bytes> {
        self.metadata.as_ref()
    }

    /// Metadata as a slice; empty when absent.
    pub fn metadata_bytes(&self) -> &[u8] {
        self.metadata.as_deref().unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct RawCommand {
    kind: CommandKind,
    origin: Origin,
    #[serde(default)]
    metadata: Option<Bytes>,
}

impl From<RawCommand> for Command {
    fn from(raw: RawCommand) -> Self {
        Self::new(raw.kind, raw.origin, raw.metadata)
    }
}
