//! Post-evaluation notification requests.
//!
//! The engine only decides *when* to ask; delivery and dedup belong to whoever drains
//! the outbox.

use compguard_types::PolicyViolation;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;

/// Which standing violations get a notification request after reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyScope {
    /// Every violation on record, on every run.
    #[default]
    All,
    /// Only violations recorded by this run.
    New,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationRequest {
    pub violation: PolicyViolation,
    /// Recorded by the run that emitted the request.
    pub is_new: bool,
}

/// Receives notification requests. Must never block the evaluating thread.
pub trait NotificationSink: Send + Sync {
    fn request_notification_evaluation(&self, request: NotificationRequest);
}

/// Channel-backed sink. Sending never blocks; a closed channel drops requests.
#[derive(Clone, Debug)]
pub struct NotificationOutbox {
    tx: Sender<NotificationRequest>,
}

impl NotificationOutbox {
    pub fn channel() -> (Self, Receiver<NotificationRequest>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for NotificationOutbox {
    fn request_notification_evaluation(&self, request: NotificationRequest) {
        if let Err(err) = self.tx.send(request) {
            debug!(
                condition = %err.0.violation.condition,
                "notification outbox closed; request dropped"
            );
        }
    }
}

/// Sink for callers that have no notification collaborator.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardNotifications;

impl NotificationSink for DiscardNotifications {
    fn request_notification_evaluation(&self, _request: NotificationRequest) {}
}
