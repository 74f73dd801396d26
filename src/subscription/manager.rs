use crate::hub::{BroadcastHub, Subscription};
use crate::snapshot::SnapshotQuery;
use crate::subscription::protocol::{ClientMessage, ServerMessage};
use anyhow::Context;
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Drives a single WebSocket subscriber from connect to disconnect
pub struct ConnectionManager {
    hub: Arc<BroadcastHub>,
    snapshot: SnapshotQuery,
}

impl ConnectionManager {
    pub fn new(hub: Arc<BroadcastHub>, snapshot: SnapshotQuery) -> Self {
        Self { hub, snapshot }
    }

    /// Handle WebSocket connection lifecycle
    ///
    /// Registers with the hub before sending the initial snapshot, so no
    /// update published in between is lost. Always unsubscribes on exit.
    pub async fn handle(self, mut socket: WebSocket) {
        let mut subscription = self.hub.subscribe();
        let subscriber_id = subscription.id;

        info!(subscriber_id = %subscriber_id, "WebSocket connection established");

        if let Err(e) = self.send_snapshot(&mut socket).await {
            error!(subscriber_id = %subscriber_id, error = %e, "Failed to send initial snapshot");
        } else {
            self.run(&mut socket, &mut subscription).await;
        }

        self.hub.unsubscribe(subscriber_id);
        info!(subscriber_id = %subscriber_id, "WebSocket connection closed");
    }

    async fn run(&self, socket: &mut WebSocket, subscription: &mut Subscription) {
        loop {
            tokio::select! {
                // Handle incoming client messages
                incoming = socket.recv() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => {
                            if let Err(e) = self.handle_client_message(socket, &text).await {
                                error!(error = %e, "Error handling client message");
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("WebSocket client disconnected");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Ignore binary, pong messages
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                // Forward hub events
                event = subscription.recv() => {
                    match event {
                        Some(event) => {
                            if let Err(e) = send_message(socket, &ServerMessage::from(event)).await {
                                error!(error = %e, "Failed to send location update");
                                break;
                            }
                        }
                        None => {
                            debug!("Hub dropped subscriber channel");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Handle client message (snapshot request / ping)
    async fn handle_client_message(
        &self,
        socket: &mut WebSocket,
        text: &str,
    ) -> anyhow::Result<()> {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::SnapshotRequest) => self.send_snapshot(socket).await,
            Ok(ClientMessage::Ping) => send_message(socket, &ServerMessage::Pong).await,
            Err(e) => {
                warn!(error = %e, "Malformed client message");
                send_message(
                    socket,
                    &ServerMessage::Error {
                        error: format!("invalid message: {}", e),
                    },
                )
                .await
            }
        }
    }

    async fn send_snapshot(&self, socket: &mut WebSocket) -> anyhow::Result<()> {
        let records = self.snapshot.snapshot();
        debug!(records = records.len(), "Sending snapshot");
        send_message(socket, &ServerMessage::Snapshot { records }).await
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> anyhow::Result<()> {
    let json = serde_json::to_string(msg)?;
    socket
        .send(Message::Text(json))
        .await
        .context("WebSocket send failed")?;
    Ok(())
}
