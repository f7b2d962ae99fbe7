//! Push gateway protocol message types
//!
//! All messages are JSON-serialized and length-prefixed on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::notify::Notification;

/// Messages exchanged with the push gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushMessage {
    /// Client asks for notifications on `topics`
    Subscribe {
        account_id: Uuid,
        token: String,
        topics: Vec<String>,
    },

    /// Gateway accepted the subscription
    Subscribed,

    /// Gateway refused the subscription
    Rejected { reason: String },

    /// A notification for the subscribed account
    Notification(Notification),

    /// Keepalive from either side
    Ping,

    /// Reply to a ping
    Pong,

    /// Gateway is shutting down
    Shutdown,
}

impl PushMessage {
    /// Serialize message to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize message from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
