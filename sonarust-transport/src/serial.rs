//! Serial port transport
//!
//! Wraps a tokio-serial stream as a [`Transport`]. The sensor modules talk
//! 8N1; only the rate is configurable.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use serialport::{DataBits, Parity, SerialPort, StopBits};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, trace, warn};

use crate::{Transport, error::*};

/// Default pause between closing a port and reopening it at a new rate,
/// giving the module time to retune its UART
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Serial port transport
pub struct SerialTransport {
    path: String,
    baud: u32,
    stream: Option<SerialStream>,
    settle_delay: Duration,
}

impl SerialTransport {
    /// Create a transport for the given device path and initial baud rate
    pub fn new(path: impl Into<String>, baud: u32) -> Self {
        Self {
            path: path.into(),
            baud,
            stream: None,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Set the settle delay used when reconfiguring the rate
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Currently configured baud rate
    pub fn baud(&self) -> u32 {
        self.baud
    }

    fn open_stream(&self) -> Result<SerialStream> {
        let stream = tokio_serial::new(&self.path, self.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .open_native_async()?;

        Ok(stream)
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyOpen);
        }

        debug!("Opening {} at {} baud...", self.path, self.baud);

        self.stream = Some(self.open_stream()?);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.stream.take().is_some() {
            debug!("Closed {}", self.path);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotOpen)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), data);

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn read_exact(&mut self, len: usize, deadline: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotOpen)?;

        let mut buf = BytesMut::zeroed(len);

        timeout(deadline, stream.read_exact(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout {
                millis: deadline.as_millis() as u64,
            })?
            .map_err(Error::Io)?;

        trace!("Received {} bytes: {:02X?}", len, &buf[..]);

        Ok(buf)
    }

    fn bytes_available(&self) -> Result<usize> {
        let stream = self.stream.as_ref().ok_or(Error::NotOpen)?;
        Ok(stream.bytes_to_read()? as usize)
    }

    async fn reconfigure(&mut self, baud: u32) -> Result<()> {
        if self.stream.is_none() {
            return Err(Error::NotOpen);
        }

        debug!(
            "Reconfiguring {}: {} -> {} baud",
            self.path, self.baud, baud
        );

        self.stream = None;
        tokio::time::sleep(self.settle_delay).await;

        self.baud = baud;
        self.stream = Some(self.open_stream()?);

        Ok(())
    }

    fn endpoint(&self) -> String {
        format!("{}@{}", self.path, self.baud)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_open() {
            warn!("Serial transport for {} dropped while still open", self.path);
        }
    }
}
