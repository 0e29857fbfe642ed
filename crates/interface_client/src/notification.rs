//! Notifications
//!
//! Stores report outcomes as [`Notification`] values with an explicit
//! [`NotificationKind`]. Message text is never inspected to decide how a
//! notification is shown; the `"Error: "` / `"Success: "` prefix form only
//! exists at the edge, through [`Notification::encode`] and
//! [`Notification::decode`], for display collaborators that take a single
//! string.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{error, info};

/// How a notification is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    Error,
    Success,
    Info,
}

/// A user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    /// Single-string form understood by prefix-classifying displays
    pub fn encode(&self) -> String {
        match self.kind {
            NotificationKind::Error => format!("Error: {}", self.message),
            NotificationKind::Success => format!("Success: {}", self.message),
            NotificationKind::Info => self.message.clone(),
        }
    }

    /// Parses the single-string form
    pub fn decode(raw: &str) -> Self {
        let kind = if raw.starts_with("Error:") {
            NotificationKind::Error
        } else if raw.starts_with("Success:") {
            NotificationKind::Success
        } else {
            NotificationKind::Info
        };
        Self {
            kind,
            message: strip_prefix(raw).to_string(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Removes a leading `Error:`, `Success:` or `Info:` marker and the
/// whitespace after it
pub fn strip_prefix(raw: &str) -> &str {
    ["Error:", "Success:", "Info:"]
        .iter()
        .find_map(|marker| raw.strip_prefix(marker))
        .map(str::trim_start)
        .unwrap_or(raw)
}

/// Receives every notification the stores publish
pub trait NotificationSink: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

/// Logs each notification at a level matching its kind
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => error!(message = %notification.message, "Error notification"),
            NotificationKind::Success => info!(message = %notification.message, "Success notification"),
            NotificationKind::Info => info!(message = %notification.message, "Notification"),
        }
    }
}

/// Forwards every notification to several sinks
#[derive(Clone, Default)]
pub struct FanOut(Vec<Arc<dyn NotificationSink>>);

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.0.push(sink);
        self
    }
}

impl NotificationSink for FanOut {
    fn notify(&self, notification: Notification) {
        for sink in &self.0 {
            sink.notify(notification.clone());
        }
    }
}

#[derive(Debug)]
struct ToastState {
    current: Option<(Notification, Instant)>,
    history: Vec<Notification>,
}

/// Single-toast display
///
/// A new notification replaces the current toast. A toast is visible until
/// it is hidden or `duration` has elapsed since it was shown; nothing is
/// dropped from `history`.
#[derive(Debug)]
pub struct ToastCenter {
    duration: Duration,
    state: Mutex<ToastState>,
}

impl ToastCenter {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            state: Mutex::new(ToastState {
                current: None,
                history: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ToastState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The toast on screen, if any
    pub fn current(&self) -> Option<Notification> {
        let state = self.lock();
        state
            .current
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < self.duration)
            .map(|(notification, _)| notification.clone())
    }

    pub fn is_visible(&self) -> bool {
        self.current().is_some()
    }

    /// Dismisses the current toast
    pub fn hide(&self) {
        self.lock().current = None;
    }

    /// Every notification shown so far, oldest first
    pub fn history(&self) -> Vec<Notification> {
        self.lock().history.clone()
    }

    /// Shown notifications of one kind
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.lock().history.iter().filter(|n| n.kind == kind).count()
    }

    pub fn clear_history(&self) {
        self.lock().history.clear();
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

impl NotificationSink for ToastCenter {
    fn notify(&self, notification: Notification) {
        let mut state = self.lock();
        state.history.push(notification.clone());
        state.current = Some((notification, Instant::now()));
    }
}
