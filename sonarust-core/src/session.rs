//! Session state for one sensor link
//!
//! A session tracks what the driver knows about the module on the other end
//! of the transport:
//! - the current upload mode (manual query vs. auto-upload)
//! - the last validated distance sample
//!
//! The mode flag flips only after the module confirms a mode-change command;
//! samples are recorded only from validated frames. External callers read
//! the session, they never write it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sonarust_types::{DistanceSample, UploadMode};

/// Session state handle
///
/// Thread-safe and can be cloned cheaply (Arc internally).
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// True while the module is believed to be pushing unsolicited frames
    auto_upload: AtomicBool,

    /// Most recent validated sample, query or streamed
    last_sample: parking_lot::RwLock<Option<DistanceSample>>,
}

impl Session {
    /// Create a session in the module's power-on state (manual mode, no
    /// cached sample)
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                auto_upload: AtomicBool::new(false),
                last_sample: parking_lot::RwLock::new(None),
            }),
        }
    }

    /// Current upload mode
    pub fn upload_mode(&self) -> UploadMode {
        if self.is_auto_upload() {
            UploadMode::Auto
        } else {
            UploadMode::Manual
        }
    }

    /// Check if the module is in auto-upload mode
    pub fn is_auto_upload(&self) -> bool {
        self.inner.auto_upload.load(Ordering::Acquire)
    }

    /// Record a module-confirmed upload-mode change
    pub fn set_upload_mode(&self, mode: UploadMode) {
        self.inner
            .auto_upload
            .store(mode == UploadMode::Auto, Ordering::Release);
    }

    /// Last validated distance sample, if any
    pub fn last_sample(&self) -> Option<DistanceSample> {
        *self.inner.last_sample.read()
    }

    /// Record a validated distance sample
    pub fn record_sample(&self, sample: DistanceSample) {
        *self.inner.last_sample.write() = Some(sample);
    }

    /// Fall back to power-on defaults (after a module reset)
    pub fn reset(&self) {
        self.inner.auto_upload.store(false, Ordering::Release);
        *self.inner.last_sample.write() = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
