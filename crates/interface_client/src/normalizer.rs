//! Error/result normalizer
//!
//! Every store operation runs through [`Normalizer::run`]. A failure never
//! propagates to the caller: it becomes exactly one error notification
//! (subject to the repeat-failure window) and the caller sees `None`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use core_kernel::PortError;

use crate::notification::{Notification, NotificationSink};

/// Suppresses an identical failure message repeated within a window
///
/// A zero window lets every failure through.
#[derive(Debug, Default)]
pub struct RepeatFailureFilter {
    window: Duration,
    last_seen: HashMap<String, Instant>,
}

impl RepeatFailureFilter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    /// Records the message and reports whether it should be shown
    pub fn admit(&mut self, message: &str, now: Instant) -> bool {
        if self.window.is_zero() {
            return true;
        }
        let window = self.window;
        self.last_seen.retain(|_, seen| now.duration_since(*seen) < window);
        match self.last_seen.get(message) {
            Some(_) => false,
            None => {
                self.last_seen.insert(message.to_string(), now);
                true
            }
        }
    }
}

/// Turns operation failures into notifications
#[derive(Clone)]
pub struct Normalizer {
    sink: Arc<dyn NotificationSink>,
    repeats: Arc<Mutex<RepeatFailureFilter>>,
}

impl Normalizer {
    /// Notifies on every failure
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            repeats: Arc::new(Mutex::new(RepeatFailureFilter::default())),
        }
    }

    /// Notifies once per distinct failure message within `window`
    pub fn with_repeat_window(self, window: Duration) -> Self {
        Self {
            repeats: Arc::new(Mutex::new(RepeatFailureFilter::new(window))),
            ..self
        }
    }

    /// Runs `operation`, returning its value or `None` after notifying
    pub async fn run<T, F>(&self, action: &str, operation: F) -> Option<T>
    where
        F: Future<Output = Result<T, PortError>>,
    {
        match operation.await {
            Ok(value) => Some(value),
            Err(error) => {
                let message = failure_message(action, &error);
                warn!(
                    action = %action,
                    error = %error,
                    transient = error.is_transient(),
                    "Operation failed"
                );
                self.notify_failure(message);
                None
            }
        }
    }

    /// Publishes an error notification, honouring the repeat window
    pub fn notify_failure(&self, message: impl Into<String>) {
        let message = message.into();
        let admitted = self
            .repeats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .admit(&message, Instant::now());
        if admitted {
            self.sink.notify(Notification::error(message));
        } else {
            debug!(message = %message, "Suppressed repeated failure notification");
        }
    }

    pub fn notify(&self, notification: Notification) {
        self.sink.notify(notification);
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        self.sink.notify(Notification::success(message));
    }
}

/// `"<action> failed: <detail>"`, or `"<action> failed"` without a detail
pub fn failure_message(action: &str, error: &PortError) -> String {
    match failure_detail(error) {
        Some(detail) => format!("{} failed: {}", action, detail),
        None => format!("{} failed", action),
    }
}

/// The displayable part of an error, if it carries one
fn failure_detail(error: &PortError) -> Option<String> {
    let detail = match error {
        PortError::Validation { message, .. }
        | PortError::Conflict { message }
        | PortError::Unauthorized { message }
        | PortError::Connection { message, .. }
        | PortError::Transformation { message }
        | PortError::Internal { message, .. } => message.trim().to_string(),
        other => other.to_string(),
    };
    (!detail.is_empty()).then_some(detail)
}
