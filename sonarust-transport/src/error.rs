//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Port not open")]
    NotOpen,

    #[error("Port already open")]
    AlreadyOpen,

    #[error("No complete read within {millis} ms")]
    ReadTimeout { millis: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl Error {
    /// Timeouts are recoverable; the caller may simply try again
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReadTimeout { .. })
    }
}
