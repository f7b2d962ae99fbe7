//! Sonatina Network Library
//!
//! Reaches the school backend and its push feed.
//!
//! # Architecture
//!
//! - **API**: [`SchedulerApi`] contract, implemented over HTTP by [`RestClient`]
//! - **Notifications**: [`NotificationHub`] fans push messages out in-process
//! - **Push**: [`PushClient`] feeds the hub from the gateway (length-prefixed JSON)
//!
//! # Usage
//!
//! ```ignore
//! let api = RestClient::new("https://school.example", DEFAULT_TIMEOUT)?;
//! let slots = api.fetch_slots(&auth, week.start_date, week.end_date, &filters).await?;
//!
//! let hub = NotificationHub::default();
//! let push = PushClient::connect(addr, &auth, topics, hub.clone()).await?;
//! let subscription = hub.subscribe(|n| println!("{}", n.topic));
//! ```

pub mod api;
pub mod error;
mod frame;
pub mod http;
pub mod notify;
pub mod protocol;
pub mod push;

pub use api::{AuthContext, SchedulerApi, SlotFilters};
pub use error::{Error, Result};
pub use http::{RestClient, DEFAULT_TIMEOUT};
pub use notify::{Notification, NotificationHub, SchedulerEvent, Subscription};
pub use protocol::PushMessage;
pub use push::{ConnectionState, PushClient, HANDSHAKE_TIMEOUT};
