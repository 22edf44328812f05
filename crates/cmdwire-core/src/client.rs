//! Named command client.
//!
//! Bundles the pieces a sender needs: the sink, the guard shared with every
//! other client on that sink, and configuration. Establishing the sink is
//! left to the caller.

use std::time::Duration;

use cmdwire_proto::Command;
use tracing::instrument;

use crate::{
    error::SendError, guard::ExclusionGuard, sender::send_command_timeout, sink::CommandSink,
};

/// Client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Longest wait for the exclusion guard. `None` waits indefinitely.
    pub acquire_timeout: Option<Duration>,
}

/// Client sending commands over one sink.
///
/// Clones of a socket (`TcpStream::try_clone`) can back several clients, as
/// long as they all share one guard, e.g. an `Arc<Semaphore>`.
#[derive(Debug)]
pub struct CommandClient<S, G> {
    network_name: String,
    sink: S,
    guard: G,
    config: ClientConfig,
}

impl<S: CommandSink, G: ExclusionGuard> CommandClient<S, G> {
    /// Create a client with default configuration.
    pub fn new(network_name: impl Into<String>, sink: S, guard: G) -> Self {
        Self::with_config(network_name, sink, guard, ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(
        network_name: impl Into<String>,
        sink: S,
        guard: G,
        config: ClientConfig,
    ) -> Self {
        Self { network_name: network_name.into(), sink, guard, config }
    }

    /// Name this client announces itself with.
    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Guard shared with other senders on this sink.
    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the client, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Send one command.
    ///
    /// See [`crate::send_command`] for the framing and error semantics.
    #[instrument(level = "debug", skip_all, fields(client = %self.network_name, kind = %command.kind(), origin = %command.origin()))]
    pub fn send_command(&mut self, command: &Command) -> Result<(), SendError> {
        send_command_timeout(&mut self.sink, command, &self.guard, self.config.acquire_timeout)
    }
}
