//! Error types for sonarust-core

/// Result type alias for core protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Buffer does not hold a complete frame
    #[error("Frame too short: expected {expected} bytes, got {actual} bytes")]
    FrameTooShort { expected: usize, actual: usize },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch { expected: u8, received: u8 },

    /// Frame does not start with the sync byte the command requires
    #[error("Unexpected sync byte: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedSync { expected: u8, actual: u8 },

    /// Frame echoes a different command code than the one awaited
    #[error("Unexpected command code: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedCommand { expected: u8, actual: u8 },

    /// Structurally valid response without the acknowledgement sentinel:
    /// the module actively refused the command
    #[error("Module rejected {command} (status 0x{status:02X})")]
    Rejected {
        command: crate::command::Command,
        status: u8,
    },
}

impl Error {
    /// Check if error is recoverable (retry might succeed)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }

    /// Check if error indicates lost frame alignment on the byte stream
    pub fn is_desync(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::ChecksumMismatch { .. }
                | Self::UnexpectedSync { .. }
                | Self::UnexpectedCommand { .. }
        )
    }
}
