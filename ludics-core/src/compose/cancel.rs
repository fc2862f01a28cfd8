//! Cancellation for store-backed calls

use super::ComposeError;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancel flag with an optional deadline. Checked strictly before a
/// commit, so a cancelled call never leaves records behind.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<DateTime<Utc>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: DateTime<Utc>) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Utc::now() + timeout)
    }

    /// Cancel this token and every clone of it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.deadline.is_some_and(|d| Utc::now() >= d)
    }

    pub fn check(&self) -> Result<(), ComposeError> {
        if self.is_cancelled() {
            Err(ComposeError::Cancelled)
        } else {
            Ok(())
        }
    }
}
