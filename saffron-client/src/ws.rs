//! Push channel listener — WebSocket with reconnect
//!
//! 1. Connect to the backend push endpoint
//! 2. Identify the user with a hello message
//! 3. Forward parsed push messages to subscribers via broadcast
//! 4. Reconnect with exponential backoff on disconnect (1s doubling to a
//!    30s cap), giving up after 5 consecutive failures
//! 5. A manual reconnect resets the attempt counter and forces a fresh
//!    connection; exhausted listeners stay offline until it arrives

use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use shared::message::{ClientHello, PushEventType, PushMessage};
use std::sync::Arc;
use tokio::sync::{Notify, broadcast};
use tokio::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::{ClientConfig, ClientResult};

/// First reconnect delay
const INITIAL_BACKOFF_SECS: u64 = 1;
/// Reconnect delay cap
const MAX_BACKOFF_SECS: u64 = 30;
/// Consecutive failures before the listener goes offline
const MAX_ATTEMPTS: u32 = 5;
/// Broadcast buffer for slow subscribers
const EVENT_BUFFER: usize = 256;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Decode a push payload into the concrete update type its event carries.
/// A payload that does not match the expected shape surfaces as
/// [`crate::ClientError::Serialization`].
pub fn decode_payload<T: DeserializeOwned>(msg: &PushMessage) -> ClientResult<T> {
    Ok(msg.parse_payload()?)
}

/// Handle to a running [`PushListener`]
#[derive(Debug, Clone)]
pub struct PushListenerHandle {
    events: broadcast::Sender<PushMessage>,
    reconnect: Arc<Notify>,
    shutdown: CancellationToken,
}

impl PushListenerHandle {
    /// Subscribe to incoming push messages
    pub fn subscribe(&self) -> broadcast::Receiver<PushMessage> {
        self.events.subscribe()
    }

    /// Reset the attempt counter and force a fresh connection
    pub fn reconnect(&self) {
        self.reconnect.notify_one();
    }

    /// Stop the listener
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Background push channel worker
pub struct PushListener {
    url: String,
    user_id: String,
    events: broadcast::Sender<PushMessage>,
    reconnect: Arc<Notify>,
    shutdown: CancellationToken,
}

enum SessionEnd {
    Disconnected,
    ForceReconnect,
    Shutdown,
}

impl PushListener {
    /// Spawn the listener for the given user and return its handle
    pub fn spawn(config: &ClientConfig, user_id: impl Into<String>) -> PushListenerHandle {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let reconnect = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();

        let listener = Self {
            url: config.push_url.clone(),
            user_id: user_id.into(),
            events: events.clone(),
            reconnect: reconnect.clone(),
            shutdown: shutdown.clone(),
        };

        let handle = PushListenerHandle {
            events,
            reconnect,
            shutdown,
        };

        tokio::spawn(listener.run());
        handle
    }

    /// Main run loop — connect, handle messages, reconnect on failure
    async fn run(mut self) {
        tracing::info!(url = %self.url, "push listener started");
        let mut attempts = 0u32;
        let mut backoff = Duration::from_secs(INITIAL_BACKOFF_SECS);

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            match tokio_tungstenite::connect_async(self.url.as_str()).await {
                Ok((ws, _response)) => {
                    attempts = 0;
                    backoff = Duration::from_secs(INITIAL_BACKOFF_SECS);
                    match self.run_session(ws).await {
                        SessionEnd::Shutdown => break,
                        SessionEnd::ForceReconnect => continue,
                        SessionEnd::Disconnected => {}
                    }
                }
                Err(e) => {
                    attempts += 1;
                    tracing::warn!(
                        attempt = attempts,
                        max = MAX_ATTEMPTS,
                        "push connection failed: {e}"
                    );
                    if attempts >= MAX_ATTEMPTS {
                        tracing::error!(
                            "push channel offline after {attempts} attempts, waiting for manual reconnect"
                        );
                        tokio::select! {
                            _ = self.shutdown.cancelled() => break,
                            _ = self.reconnect.notified() => {
                                attempts = 0;
                                backoff = Duration::from_secs(INITIAL_BACKOFF_SECS);
                            }
                        }
                        continue;
                    }
                }
            }

            // Wait before the next attempt; a manual reconnect skips the
            // delay and resets the backoff.
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = self.reconnect.notified() => {
                    attempts = 0;
                    backoff = Duration::from_secs(INITIAL_BACKOFF_SECS);
                    continue;
                }
                _ = tokio::time::sleep(backoff) => {}
            }
            backoff = (backoff * 2).min(Duration::from_secs(MAX_BACKOFF_SECS));
        }

        tracing::info!("push listener stopped");
    }

    /// Run a single session until disconnect, forced reconnect or shutdown
    async fn run_session(&mut self, mut ws: WsStream) -> SessionEnd {
        let hello = ClientHello::new(self.user_id.clone());
        let hello_json = match serde_json::to_string(&hello) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("failed to serialize hello: {e}");
                return SessionEnd::Disconnected;
            }
        };
        if let Err(e) = ws.send(Message::text(hello_json)).await {
            tracing::warn!("failed to send hello: {e}");
            return SessionEnd::Disconnected;
        }

        tracing::info!(user_id = %self.user_id, "push channel connected");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = ws.close(None).await;
                    return SessionEnd::Shutdown;
                }
                _ = self.reconnect.notified() => {
                    let _ = ws.close(None).await;
                    return SessionEnd::ForceReconnect;
                }
                frame = ws.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => self.handle_text(text.as_str()),
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::warn!("push channel disconnected");
                            return SessionEnd::Disconnected;
                        }
                        Some(Ok(_)) => {} // ping/pong/binary
                        Some(Err(e)) => {
                            tracing::warn!("push channel error: {e}");
                            return SessionEnd::Disconnected;
                        }
                    }
                }
            }
        }
    }

    fn handle_text(&self, text: &str) {
        let msg: PushMessage = match serde_json::from_str(text) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!("dropping unparseable push frame: {e}");
                return;
            }
        };

        if msg.event_type == PushEventType::Unknown {
            tracing::debug!("ignoring unrecognized push event");
            return;
        }

        // No subscribers is fine; the message is simply dropped
        let _ = self.events.send(msg);
    }
}
