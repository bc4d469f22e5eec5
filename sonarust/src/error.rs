//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] sonarust_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] sonarust_transport::Error),

    #[error("Parameter error: {0}")]
    Types(#[from] sonarust_types::Error),

    /// No complete response frame arrived within the configured bound
    #[error("No response within {millis} ms")]
    Timeout { millis: u64 },

    /// The module does not answer on-demand queries while pushing
    /// unsolicited frames; switch back to manual mode first
    #[error("Module is in auto-upload mode; on-demand queries are not answered")]
    AutoUploadActive,

    /// Polling the stream is only meaningful in auto-upload mode
    #[error("Module is in manual mode; enable auto-upload before polling the stream")]
    StreamingInactive,
}

impl Error {
    /// Check if this is the bounded-wait expiring
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
            || matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Check if error is recoverable (retry might succeed)
    ///
    /// Timeouts and corrupted or cross-talked frames are transient; an
    /// active refusal by the module or a bad parameter is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Core(e) => e.is_recoverable(),
            Self::Transport(e) => e.is_timeout(),
            Self::Types(_) => false,
            Self::AutoUploadActive | Self::StreamingInactive => false,
        }
    }
}
