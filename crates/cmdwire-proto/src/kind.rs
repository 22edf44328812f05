//! Command kinds.
//!
//! Each kind is carried on the wire as its `u32` code. The framing is the same
//! for every kind; the code only tells the receiver what to do with the
//! command.

use std::fmt;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Kind of command sent from a client to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u32)]
pub enum CommandKind {
    /// Client is disconnecting.
    UserExit = 0,
    /// Lock the target machine.
    PcLock = 1,
    /// Lock the target machine after a delay carried in the metadata.
    PcLockWithTimer = 2,
    /// Unlock the target machine.
    PcUnlock = 3,
    /// Log the current user off.
    PcLogOff = 4,
    /// Restart the target machine.
    PcRestart = 5,
    /// Shut the target machine down.
    PcShutdown = 6,
    /// Text message; the metadata holds the message body.
    Message = 7,
    /// Announce a client login to other clients.
    ClientLoginInform = 8,
    /// Server reply: the requested network name is taken.
    NameExists = 9,
    /// Request the list of connected clients.
    SendClientList = 10,
    /// Application-defined command; meaning lives entirely in the metadata.
    FreeCommand = 11,
}

impl CommandKind {
    /// Every kind, in code order.
    pub const ALL: [Self; 12] = [
        Self::UserExit,
        Self::PcLock,
        Self::PcLockWithTimer,
        Self::PcUnlock,
        Self::PcLogOff,
        Self::PcRestart,
        Self::PcShutdown,
        Self::Message,
        Self::ClientLoginInform,
        Self::NameExists,
        Self::SendClientList,
        Self::FreeCommand,
    ];

    /// Wire code for this kind.
    pub fn to_u32(self) -> u32 {
        self as u32
    }

    /// Parse a wire code.
    ///
    /// Returns `None` for codes that do not name a kind.
    pub fn from_u32(code: u32) -> Option<Self> {
        Self::ALL.get(usize::try_from(code).ok()?).copied()
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UserExit => "UserExit",
            Self::PcLock => "PcLock",
            Self::PcLockWithTimer => "PcLockWithTimer",
            Self::PcUnlock => "PcUnlock",
            Self::PcLogOff => "PcLogOff",
            Self::PcRestart => "PcRestart",
            Self::PcShutdown => "PcShutdown",
            Self::Message => "Message",
            Self::ClientLoginInform => "ClientLoginInform",
            Self::NameExists => "NameExists",
            Self::SendClientList => "SendClientList",
            Self::FreeCommand => "FreeCommand",
        };
        f.write_str(name)
    }
}
