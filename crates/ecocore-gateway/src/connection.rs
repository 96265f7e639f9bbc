use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use ecocore_telemetry::TelemetryStore;
use ecocore_types::events::GatewayEvent;

use crate::dispatcher::Dispatcher;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Handle a single dashboard WebSocket connection.
///
/// The feed is push-only: the client gets the current snapshot the moment it
/// connects, then every broadcast tick after that. Inbound text frames are
/// ignored; no client-to-server telemetry events exist.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher, store: Arc<TelemetryStore>) {
    let (mut sender, mut receiver) = socket.split();

    // Send the full current snapshot immediately upon connection
    let initial = GatewayEvent::InitialData(store.snapshot());
    if sender
        .send(Message::Text(serde_json::to_string(&initial).unwrap().into()))
        .await
        .is_err()
    {
        return;
    }

    let online = dispatcher.client_connected();
    info!("dashboard client connected ({} online)", online);

    let mut broadcast_rx = dispatcher.subscribe();

    // Shared flag for heartbeat
    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received.clone();

    // Forward broadcasts -> client, with heartbeat
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                result = broadcast_rx.recv() => {
                    let event = match result {
                        Ok(event) => event,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Broadcast receiver lagged by {} events", n);
                            continue;
                        }
                        Err(_) => break,
                    };

                    let text = serde_json::to_string(&event).unwrap();
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Drain client frames: pongs feed the heartbeat, everything else is noise
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Pong(_) => {
                    pong_flag_recv.store(true, Ordering::Release);
                }
                Message::Text(text) => {
                    debug!(
                        "ignoring client frame: {}",
                        &text[..text.len().min(200)]
                    );
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    let online = dispatcher.client_disconnected();
    info!("dashboard client disconnected ({} online)", online);
}
