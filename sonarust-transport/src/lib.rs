//! Transport layer for the sensor protocol
//!
//! Provides the byte-stream capability interface the protocol engine runs
//! on, a real serial port implementation, and an in-memory double for
//! tests.

pub mod error;
pub mod mem;
pub mod serial;

pub use error::{Error, Result};
pub use mem::MemTransport;
pub use serial::SerialTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte-stream duplex channel the protocol engine requires
///
/// Implementations own exactly one underlying channel. Callers must ensure
/// no read or write is in flight before calling [`reconfigure`](Self::reconfigure)
/// or [`close`](Self::close).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the underlying channel
    async fn open(&mut self) -> Result<()>;

    /// Close the underlying channel
    async fn close(&mut self) -> Result<()>;

    /// Check if the channel is open
    fn is_open(&self) -> bool;

    /// Write all given bytes
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read exactly `len` bytes within `timeout`
    ///
    /// Never returns a short read: the result holds `len` bytes or the call
    /// fails with [`Error::ReadTimeout`].
    async fn read_exact(&mut self, len: usize, timeout: Duration) -> Result<BytesMut>;

    /// Number of received bytes ready to read without waiting
    fn bytes_available(&self) -> Result<usize>;

    /// Reopen the channel at a new baud rate (close, settle, reopen)
    async fn reconfigure(&mut self, baud: u32) -> Result<()>;

    /// Human-readable endpoint description for diagnostics
    fn endpoint(&self) -> String;
}
