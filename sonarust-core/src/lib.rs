//! # sonarust-core
//!
//! Core protocol implementation for ultrasonic ranging sensor modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Command definitions
//! - Byte-stream resynchronization for auto-upload mode
//! - Session state

pub mod checksum;
pub mod command;
pub mod error;
pub mod frame;
pub mod session;
pub mod stream;

pub use command::Command;
pub use error::{Error, Result};
pub use frame::Frame;
pub use session::Session;
pub use stream::StreamDecoder;

/// Fixed frame size for every command and response
pub const FRAME_SIZE: usize = 9;

/// The upload-interval command counts in units of this many milliseconds
pub const UPLOAD_INTERVAL_UNIT_MS: u64 = 100;
