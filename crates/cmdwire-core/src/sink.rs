//! Byte sink abstraction.
//!
//! The send path writes each frame field with one [`CommandSink::write_field`]
//! call followed by one [`CommandSink::flush`] call. Every [`std::io::Write`]
//! is a sink, including `&TcpStream`, which lets several handles share one
//! socket as long as they also share one guard.

use std::io::{self, Write};

/// Destination for command frames.
pub trait CommandSink {
    /// Write one complete field.
    ///
    /// On error, an unknown prefix of `bytes` may already have been written.
    fn write_field(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Push buffered bytes towards the peer.
    fn flush(&mut self) -> io::Result<()>;
}

impl<W: Write + ?Sized> CommandSink for W {
    fn write_field(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}
