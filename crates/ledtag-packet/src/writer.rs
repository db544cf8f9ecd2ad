use std::io::{ErrorKind, Write};

use crate::codec::{check_packet_size, PacketConfig};
use crate::error::{PacketError, Result};

/// Writes complete packets to any `Write` sink (file, stdout, uploader pipe).
pub struct PacketWriter<T> {
    inner: T,
    config: PacketConfig,
}

impl<T: Write> PacketWriter<T> {
    /// Create a new packet writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, PacketConfig::default())
    }

    /// Create a new packet writer with explicit configuration.
    pub fn with_config(inner: T, config: PacketConfig) -> Self {
        Self { inner, config }
    }

    /// Write a complete packet (blocking), refusing oversized ones.
    pub fn write_packet(&mut self, packet: &[u8]) -> Result<()> {
        check_packet_size(packet, &self.config)?;

        let mut offset = 0usize;
        while offset < packet.len() {
            match self.inner.write(&packet[offset..]) {
                Ok(0) => return Err(PacketError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PacketError::Io(err)),
            }
        }
        tracing::debug!(size = packet.len(), "packet written");

        self.flush()
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PacketError::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current packet writer configuration.
    pub fn config(&self) -> &PacketConfig {
        &self.config
    }
}
