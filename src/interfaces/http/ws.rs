/// Realtime Channel - WebSocket subscriptions
///
/// One socket serves any number of listing subscriptions. Client frames
/// carry an `op` tag (`subscribe` / `unsubscribe`); the server pushes
/// `bid_update` events plus acknowledgement frames and `error` frames for
/// malformed input. Delivery is best-effort: a closed socket is pruned at
/// the next publish and nothing is redelivered.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::AppState;
use crate::infrastructure::realtime::BidHub;
use crate::shared::protocol::{ClientMessage, ServerMessage};

pub async fn ws_handler(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| handle_socket(socket, state.hub.clone()))
}

/// One listing subscription owned by a connection.
///
/// Dropping the cancel sender stops the forwarder, which deregisters from
/// the hub on its way out.
struct ActiveSubscription {
    cancel: oneshot::Sender<()>,
}

async fn handle_socket(socket: WebSocket, hub: Arc<BidHub>) {
    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let mut subscriptions: HashMap<u64, ActiveSubscription> = HashMap::new();

    loop {
        tokio::select! {
            outbound = out_rx.recv() => {
                let Some(message) = outbound else { break };
                let Ok(text) = serde_json::to_string(&message) else { continue };
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_frame(&text, &hub, &out_tx, &mut subscriptions);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Ping/pong is answered by axum itself.
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    debug!(
        subscriptions = subscriptions.len(),
        "realtime connection closed"
    );
    // Dropping the map drops every cancel sender; each forwarder then
    // deregisters its hub subscription.
}

fn handle_client_frame(
    text: &str,
    hub: &Arc<BidHub>,
    out_tx: &mpsc::UnboundedSender<ServerMessage>,
    subscriptions: &mut HashMap<u64, ActiveSubscription>,
) {
    let frame = match serde_json::from_str::<ClientMessage>(text) {
        Ok(frame) => frame,
        Err(error) => {
            let _ = out_tx.send(ServerMessage::Error {
                message: format!("unrecognized frame: {error}"),
            });
            return;
        }
    };

    match frame {
        ClientMessage::Subscribe { listing_id } => {
            // Re-subscribing replaces the previous registration.
            if let Some(previous) = subscriptions.remove(&listing_id) {
                let _ = previous.cancel.send(());
            }
            let active = spawn_forwarder(hub.clone(), listing_id, out_tx.clone());
            subscriptions.insert(listing_id, active);
            let _ = out_tx.send(ServerMessage::Subscribed { listing_id });
        }
        ClientMessage::Unsubscribe { listing_id } => {
            // Idempotent: unknown ids are acknowledged all the same.
            if let Some(active) = subscriptions.remove(&listing_id) {
                let _ = active.cancel.send(());
            }
            let _ = out_tx.send(ServerMessage::Unsubscribed { listing_id });
        }
    }
}

/// Bridges one hub subscription onto the connection's outbound queue.
fn spawn_forwarder(
    hub: Arc<BidHub>,
    listing_id: u64,
    out_tx: mpsc::UnboundedSender<ServerMessage>,
) -> ActiveSubscription {
    let mut subscription = hub.subscribe(listing_id);
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                // Fires on explicit cancel and when the sender is dropped.
                _ = &mut cancel_rx => break,
                update = subscription.recv() => {
                    match update {
                        Some(update) => {
                            if out_tx.send(ServerMessage::BidUpdate(update)).is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }
        hub.unsubscribe(&subscription);
    });

    ActiveSubscription { cancel: cancel_tx }
}
