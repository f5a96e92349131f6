//! Toast-style notification queue.
//!
//! Stores report what they did ("Added Headphones to cart") by enqueueing a
//! [`Notification`] here. Every notification expires on its own after its
//! display duration; a view may also dismiss it early. Both paths go through
//! [`NotificationSink::remove`], which is idempotent, so whichever fires
//! first wins and the other is a no-op.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use shopfront_core::NotificationId;

/// Display duration used when none is given.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// A user-facing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub severity: Severity,
    pub message: String,
    pub duration: Duration,
    /// `None` when the duration reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Notification {
    /// Whether the display duration has elapsed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Shared, cloneable handle to the notification queue.
///
/// Insertion order is display order. The queue is unbounded.
#[derive(Clone)]
pub struct NotificationSink {
    queue: Arc<Mutex<Vec<Notification>>>,
    default_duration: Duration,
}

impl fmt::Debug for NotificationSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationSink")
            .field("pending", &self.lock().len())
            .field("default_duration", &self.default_duration)
            .finish()
    }
}

impl Default for NotificationSink {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl NotificationSink {
    /// Create an empty sink whose helper methods use `default_duration`.
    #[must_use]
    pub fn new(default_duration: Duration) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Vec::new())),
            default_duration,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a notification and schedule its removal after `duration`.
    ///
    /// The removal is a one-shot task on the current tokio runtime. Without a
    /// runtime the notification still disappears from [`active`](Self::active)
    /// once its deadline passes.
    pub fn show(
        &self,
        severity: Severity,
        message: impl Into<String>,
        duration: Duration,
    ) -> NotificationId {
        let id = NotificationId::generate();
        let message = message.into();
        debug!(%id, %severity, %message, "Showing notification");

        self.lock().push(Notification {
            id,
            severity,
            message,
            duration,
            expires_at: Instant::now().checked_add(duration),
        });

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let sink = self.clone();
            handle.spawn(async move {
                tokio::time::sleep(duration).await;
                sink.remove(id);
            });
        }

        id
    }

    /// Show a success notification with the default duration.
    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(Severity::Success, message, self.default_duration)
    }

    /// Show an info notification with the default duration.
    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(Severity::Info, message, self.default_duration)
    }

    /// Show an error notification with the default duration.
    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(Severity::Error, message, self.default_duration)
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn remove(&self, id: NotificationId) -> bool {
        let mut queue = self.lock();
        let before = queue.len();
        queue.retain(|n| n.id != id);
        let removed = queue.len() != before;
        if removed {
            debug!(%id, "Removed notification");
        }
        removed
    }

    /// Notifications currently on display, oldest first.
    ///
    /// Expired entries are pruned as a side effect.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut queue = self.lock();
        queue.retain(|n| !n.is_expired_at(now));
        queue.clone()
    }

    /// Remove every notification and return what was on display.
    pub fn drain(&self) -> Vec<Notification> {
        let now = Instant::now();
        std::mem::take(&mut *self.lock())
            .into_iter()
            .filter(|n| !n.is_expired_at(now))
            .collect()
    }

    #[cfg(test)]
    fn queued(&self) -> usize {
        self.lock().len()
    }
}
