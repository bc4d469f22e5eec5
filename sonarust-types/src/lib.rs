//! Type definitions for sonarust

pub mod error;
pub mod params;
pub mod sample;

pub use error::{Error, Result};
pub use params::{BaudRate, CommModeVariant, LedMode, RelayMode, ResetKind, UploadMode};
pub use sample::DistanceSample;

/// Broadcast / unaddressed target (accepted by every module on the bus)
pub const BROADCAST_ADDRESS: u16 = 0xFFFF;

/// Highest assignable module address (0xFFFF is reserved for broadcast)
pub const MAX_ADDRESS: u16 = 0xFFFE;
