//! TCP client for the push gateway
//!
//! Holds one subscription for the signed-in account and republishes every
//! notification it receives on a [`NotificationHub`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::api::AuthContext;
use crate::error::{Error, Result};
use crate::frame::{read_frame, write_frame};
use crate::notify::NotificationHub;
use crate::protocol::PushMessage;

/// How long the gateway has to answer a subscribe
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

enum PushCommand {
    Disconnect,
}

/// Client handle for the push feed
pub struct PushClient {
    state: Arc<RwLock<ConnectionState>>,
    cmd_tx: mpsc::Sender<PushCommand>,
}

impl PushClient {
    /// Connect, subscribe to `topics` and start forwarding into `hub`
    pub async fn connect(
        addr: SocketAddr,
        auth: &AuthContext,
        topics: Vec<String>,
        hub: NotificationHub,
    ) -> Result<Self> {
        Self::connect_with_timeout(addr, auth, topics, hub, HANDSHAKE_TIMEOUT).await
    }

    /// [`connect`](Self::connect) with an explicit bound on the handshake
    pub async fn connect_with_timeout(
        addr: SocketAddr,
        auth: &AuthContext,
        topics: Vec<String>,
        hub: NotificationHub,
        handshake_timeout: Duration,
    ) -> Result<Self> {
        info!(addr = %addr, account_id = %auth.account_id, "Connecting to push gateway");

        let stream = TcpStream::connect(addr).await?;
        let (mut reader, mut writer) = tokio::io::split(stream);

        let subscribe = PushMessage::Subscribe {
            account_id: auth.account_id,
            token: auth.token.clone(),
            topics,
        };
        write_frame(&mut writer, &subscribe).await?;

        let reply = tokio::time::timeout(handshake_timeout, read_frame(&mut reader))
            .await
            .map_err(|_| {
                warn!(addr = %addr, "Push gateway did not answer subscribe");
                Error::Timeout(format!("no subscribe reply within {:?}", handshake_timeout))
            })??;

        match reply {
            PushMessage::Subscribed => {
                info!("Subscribed to push notifications");
            }
            PushMessage::Rejected { reason } => {
                warn!(reason = %reason, "Push subscription rejected");
                return Err(Error::Rejected(reason));
            }
            other => {
                return Err(Error::Protocol(format!(
                    "Unexpected handshake reply: {:?}",
                    other
                )));
            }
        }

        let state = Arc::new(RwLock::new(ConnectionState::Connected));
        let (cmd_tx, cmd_rx) = mpsc::channel(8);

        tokio::spawn(connection_task(reader, writer, state.clone(), hub, cmd_rx));

        Ok(PushClient { state, cmd_tx })
    }

    /// Close the feed; the hub stays usable.
    ///
    /// Fails with [`Error::NotConnected`] once the feed has already ended.
    pub async fn disconnect(&self) -> Result<()> {
        self.cmd_tx
            .send(PushCommand::Disconnect)
            .await
            .map_err(|_| Error::NotConnected)
    }

    pub async fn connection_state(&self) -> ConnectionState {
        *self.state.read().await
    }
}

/// Forward notifications until the gateway or the caller ends the feed
async fn connection_task(
    mut reader: ReadHalf<TcpStream>,
    mut writer: WriteHalf<TcpStream>,
    state: Arc<RwLock<ConnectionState>>,
    hub: NotificationHub,
    mut cmd_rx: mpsc::Receiver<PushCommand>,
) {
    loop {
        tokio::select! {
            result = read_frame(&mut reader) => {
                match result {
                    Ok(PushMessage::Notification(notification)) => {
                        debug!(topic = %notification.topic, "Received notification");
                        hub.publish(notification);
                    }
                    Ok(PushMessage::Ping) => {
                        if let Err(e) = write_frame(&mut writer, &PushMessage::Pong).await {
                            warn!(error = %e, "Failed to answer ping");
                            break;
                        }
                    }
                    Ok(PushMessage::Shutdown) => {
                        info!("Push gateway shutting down");
                        break;
                    }
                    Ok(other) => {
                        debug!(message = ?other, "Ignoring unexpected message");
                    }
                    Err(Error::ConnectionClosed) => {
                        debug!("Push gateway closed connection");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Read error");
                        break;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(PushCommand::Disconnect) | None => {
                        debug!("Disconnect requested");
                        break;
                    }
                }
            }
        }
    }

    drop(cmd_rx);
    *state.write().await = ConnectionState::Disconnected;
    info!("Disconnected from push gateway");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notification;
    use tokio::net::TcpListener;
    use uuid::Uuid;

    async fn gateway() -> (TcpListener, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[tokio::test]
    async fn test_notifications_reach_hub() {
        let (listener, addr) = gateway().await;
        let auth = AuthContext::new(Uuid::new_v4(), "tok");
        let account_id = auth.account_id;

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            match read_frame(&mut socket).await.unwrap() {
                PushMessage::Subscribe {
                    account_id: id,
                    topics,
                    ..
                } => {
                    assert_eq!(id, account_id);
                    assert_eq!(topics, vec!["scheduler_attendance".to_string()]);
                }
                other => panic!("Expected Subscribe, got {:?}", other),
            }
            write_frame(&mut socket, &PushMessage::Subscribed).await.unwrap();
            write_frame(&mut socket, &PushMessage::Ping).await.unwrap();
            assert!(matches!(
                read_frame(&mut socket).await.unwrap(),
                PushMessage::Pong
            ));
            let n = Notification::new("scheduler_attendance/7", "status changed");
            write_frame(&mut socket, &PushMessage::Notification(n)).await.unwrap();
            write_frame(&mut socket, &PushMessage::Shutdown).await.unwrap();
        });

        let hub = NotificationHub::default();
        let mut rx = hub.receiver();
        let client = PushClient::connect(
            addr,
            &auth,
            vec!["scheduler_attendance".to_string()],
            hub.clone(),
        )
        .await
        .unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.content, "status changed");

        server.await.unwrap();
        // Shutdown ends the feed
        for _ in 0..50 {
            if client.connection_state().await == ConnectionState::Disconnected {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(client.connection_state().await, ConnectionState::Disconnected);
        assert!(matches!(client.disconnect().await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_disconnect_ends_feed() {
        let (listener, addr) = gateway().await;

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = read_frame(&mut socket).await.unwrap();
            write_frame(&mut socket, &PushMessage::Subscribed).await.unwrap();
            // Client hangs up
            assert!(matches!(
                read_frame(&mut socket).await,
                Err(Error::ConnectionClosed)
            ));
        });

        let auth = AuthContext::new(Uuid::new_v4(), "tok");
        let client = PushClient::connect(addr, &auth, vec![], NotificationHub::default())
            .await
            .unwrap();
        assert_eq!(client.connection_state().await, ConnectionState::Connected);

        client.disconnect().await.unwrap();
        server.await.unwrap();
        assert_eq!(client.connection_state().await, ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_subscriber_registered_first_sees_immediate_notification() {
        let (listener, addr) = gateway().await;

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = read_frame(&mut socket).await.unwrap();
            write_frame(&mut socket, &PushMessage::Subscribed).await.unwrap();
            let n = Notification::new("scheduler_attendance", "changed right away");
            write_frame(&mut socket, &PushMessage::Notification(n)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            drop(socket);
        });

        let hub = NotificationHub::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let _subscription = hub.subscribe(move |n| {
            let _ = tx.send(n);
        });

        let auth = AuthContext::new(Uuid::new_v4(), "tok");
        let client = PushClient::connect(addr, &auth, vec![], hub.clone())
            .await
            .unwrap();

        let received = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.content, "changed right away");
        client.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_silent_gateway_times_out() {
        let (listener, addr) = gateway().await;

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = read_frame(&mut socket).await.unwrap();
            // Never answer, keep the socket open
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            drop(socket);
        });

        let auth = AuthContext::new(Uuid::new_v4(), "tok");
        let result = PushClient::connect_with_timeout(
            addr,
            &auth,
            vec![],
            NotificationHub::default(),
            std::time::Duration::from_millis(100),
        )
        .await;
        assert!(matches!(result, Err(Error::Timeout(_))));
    }

    #[tokio::test]
    async fn test_rejected_subscription() {
        let (listener, addr) = gateway().await;

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = read_frame(&mut socket).await.unwrap();
            write_frame(
                &mut socket,
                &PushMessage::Rejected {
                    reason: "bad token".to_string(),
                },
            )
            .await
            .unwrap();
        });

        let auth = AuthContext::new(Uuid::new_v4(), "nope");
        let result = PushClient::connect(addr, &auth, vec![], NotificationHub::default()).await;
        match result {
            Err(Error::Rejected(reason)) => assert_eq!(reason, "bad token"),
            Err(e) => panic!("Expected rejection, got {}", e),
            Ok(_) => panic!("Expected rejection"),
        }
    }
}
