//! Push notifications and the in-process hub that fans them out
//!
//! Notifications arrive as free-form `{ topic, content }` pairs. Consumers
//! classify them into a closed [`SchedulerEvent`] before acting.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Topic fragment carried by attendance-change notifications
pub const ATTENDANCE_TOPIC_MARKER: &str = "scheduler_attendance";

/// Content fragment carried by attendance-change notifications
pub const CHANGED_MARKER: &str = "changed";

/// Default buffer capacity for the broadcast channel
const DEFAULT_CAPACITY: usize = 256;

/// A raw push notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub topic: String,
    pub content: String,
}

impl Notification {
    pub fn new(topic: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            content: content.into(),
        }
    }
}

/// What a notification means to the scheduler views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// Some slot's attendance changed server-side
    AttendanceChanged,
    Other,
}

impl SchedulerEvent {
    /// Matches by substring: the gateway has no structured schema for these.
    pub fn classify(notification: &Notification) -> Self {
        if notification.topic.contains(ATTENDANCE_TOPIC_MARKER)
            && notification.content.contains(CHANGED_MARKER)
        {
            SchedulerEvent::AttendanceChanged
        } else {
            SchedulerEvent::Other
        }
    }
}

/// In-process fan-out of push notifications.
///
/// Cloning the hub yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<Notification>,
}

impl NotificationHub {
    /// When the buffer is full, slow subscribers skip the oldest messages.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers, returning how many there were
    pub fn publish(&self, notification: Notification) -> usize {
        // Zero receivers is not an error: nobody is listening yet
        self.sender.send(notification).unwrap_or(0)
    }

    /// A raw receiver for async consumers
    pub fn receiver(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Invoke `on_message` for every notification until unsubscribed.
    ///
    /// Must be called within a tokio runtime.
    pub fn subscribe<F>(&self, mut on_message: F) -> Subscription
    where
        F: FnMut(Notification) + Send + 'static,
    {
        let id = Uuid::new_v4();
        let mut rx = self.sender.subscribe();

        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(notification) => on_message(notification),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(subscription = %id, skipped, "Subscriber lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        debug!(subscription = %id, "Subscribed to notifications");
        Subscription { id, task }
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Handle returned by [`NotificationHub::subscribe`]; dropping it also unsubscribes
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn unsubscribe(self) {
        debug!(subscription = %self.id, "Unsubscribed from notifications");
        // Drop aborts the listener
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
