//! # sonarust
//!
//! Async Rust driver for ultrasonic ranging sensor modules speaking a
//! fixed 9-byte, XOR-checksummed command/response protocol over a serial
//! link.
//!
//! ## Features
//!
//! - Typed command set: address, baud rate, upload mode/interval,
//!   LED/relay/communication mode, resets, distance queries
//! - Full-frame-or-timeout exchanges, never a short read
//! - Auto-upload streaming with byte-at-a-time resynchronization: a single
//!   corrupted byte costs at most one frame length of data
//! - Transport abstraction with a real serial port and an in-memory double
//!
//! ## Quick Start
//!
//! ```no_run
//! use sonarust::{Sensor, UploadMode};
//!
//! #[tokio::main]
//! async fn main() -> sonarust::Result<()> {
//!     let mut sensor = Sensor::serial("/dev/ttyUSB0", 9600);
//!     sensor.open().await?;
//!
//!     // On-demand query
//!     let sample = sensor.read_distance().await?;
//!     println!("{}", sample);
//!
//!     // Or let the module push readings
//!     sensor.set_upload_mode(UploadMode::Auto).await?;
//!     loop {
//!         if let Some(sample) = sensor.poll_stream().await? {
//!             println!("{}", sample);
//!         }
//!         tokio::time::sleep(std::time::Duration::from_millis(20)).await;
//!     }
//! }
//! ```

pub mod error;
pub mod sensor;

// Re-exports
pub use error::{Error, Result};
pub use sensor::Sensor;

// Re-export protocol and transport types
pub use sonarust_core::{Command, Frame, Session, StreamDecoder};
pub use sonarust_transport::{MemTransport, SerialTransport, Transport};
pub use sonarust_types::{
    BaudRate, CommModeVariant, DistanceSample, LedMode, RelayMode, ResetKind, UploadMode,
};
