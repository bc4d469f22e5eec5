//! In-memory transport double
//!
//! Stands in for a serial port in tests: incoming bytes are scripted,
//! written bytes and baud reconfigurations are recorded for inspection.
//! Cloning yields a handle onto the same channel, so a test can keep one
//! clone while the code under test owns the other.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use parking_lot::Mutex;
use tracing::trace;

use crate::{Transport, error::*};

/// Scriptable in-memory transport
#[derive(Debug, Clone, Default)]
pub struct MemTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    open: bool,
    incoming: VecDeque<u8>,
    written: Vec<u8>,
    baud_changes: Vec<u32>,
}

impl MemTransport {
    /// Create a closed transport with nothing scripted
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an already-open transport (most tests skip the open step)
    pub fn open_pair() -> (Self, Self) {
        let transport = Self::new();
        transport.inner.lock().open = true;
        let handle = transport.clone();
        (transport, handle)
    }

    /// Queue bytes the "module" sends to the driver
    pub fn push_incoming(&self, bytes: &[u8]) {
        self.inner.lock().incoming.extend(bytes.iter().copied());
    }

    /// Everything the driver has written so far
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().written.clone()
    }

    /// Drain the write record
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.inner.lock().written)
    }

    /// Baud rates passed to `reconfigure`, in order
    pub fn baud_changes(&self) -> Vec<u32> {
        self.inner.lock().baud_changes.clone()
    }
}

#[async_trait]
impl Transport for MemTransport {
    async fn open(&mut self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.open {
            return Err(Error::AlreadyOpen);
        }
        inner.open = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.lock().open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.inner.lock().open
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.open {
            return Err(Error::NotOpen);
        }

        trace!("Recording {} written bytes: {:02X?}", data.len(), data);
        inner.written.extend_from_slice(data);
        Ok(())
    }

    async fn read_exact(&mut self, len: usize, deadline: Duration) -> Result<BytesMut> {
        let take = |inner: &mut Inner| -> Option<BytesMut> {
            if inner.incoming.len() < len {
                return None;
            }
            let data: Vec<u8> = inner.incoming.drain(..len).collect();
            Some(BytesMut::from(&data[..]))
        };

        {
            let mut inner = self.inner.lock();
            if !inner.open {
                return Err(Error::NotOpen);
            }
            if let Some(buf) = take(&mut inner) {
                return Ok(buf);
            }
        }

        // Nothing complete yet: wait out the full bound, then re-check so a
        // concurrent test task can deliver bytes mid-wait
        tokio::time::sleep(deadline).await;

        let mut inner = self.inner.lock();
        take(&mut inner).ok_or(Error::ReadTimeout {
            millis: deadline.as_millis() as u64,
        })
    }

    fn bytes_available(&self) -> Result<usize> {
        let inner = self.inner.lock();
        if !inner.open {
            return Err(Error::NotOpen);
        }
        Ok(inner.incoming.len())
    }

    async fn reconfigure(&mut self, baud: u32) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.open {
            return Err(Error::NotOpen);
        }
        inner.baud_changes.push(baud);
        Ok(())
    }

    fn endpoint(&self) -> String {
        "mem".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_scripted_read() {
        let (mut transport, handle) = MemTransport::open_pair();
        handle.push_incoming(&[1, 2, 3, 4, 5]);

        assert_eq!(transport.bytes_available().unwrap(), 5);

        let buf = transport
            .read_exact(3, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(&buf[..], &[1, 2, 3]);
        assert_eq!(transport.bytes_available().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_write_recorded() {
        let (mut transport, handle) = MemTransport::open_pair();

        transport.write(&[0x62, 0x33]).await.unwrap();
        transport.write(&[0x09]).await.unwrap();

        assert_eq!(handle.written(), vec![0x62, 0x33, 0x09]);
        assert_eq!(handle.take_written(), vec![0x62, 0x33, 0x09]);
        assert!(handle.written().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_times_out_without_enough_bytes() {
        let (mut transport, handle) = MemTransport::open_pair();
        handle.push_incoming(&[1, 2, 3]);

        // Short data must never be returned as a frame
        let result = transport.read_exact(9, Duration::from_millis(500)).await;
        assert!(matches!(result, Err(Error::ReadTimeout { millis: 500 })));
        assert_eq!(transport.bytes_available().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reconfigure_recorded() {
        let (mut transport, handle) = MemTransport::open_pair();

        transport.reconfigure(115_200).await.unwrap();
        transport.reconfigure(9_600).await.unwrap();

        assert_eq!(handle.baud_changes(), vec![115_200, 9_600]);
    }

    #[tokio::test]
    async fn test_closed_transport_refuses_io() {
        let mut transport = MemTransport::new();

        assert!(matches!(
            transport.write(&[0x62]).await,
            Err(Error::NotOpen)
        ));
        assert!(matches!(transport.bytes_available(), Err(Error::NotOpen)));

        transport.open().await.unwrap();
        assert!(matches!(transport.open().await, Err(Error::AlreadyOpen)));
    }
}
