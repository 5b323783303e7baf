//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and runs one view session per
//! connection. Each session owns its control state; the context it reads is
//! shared and immutable.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::dashboard::ControlState;

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection view state
pub struct Session {
    pub id: String,
    pub controls: ControlState,
}

impl Session {
    pub fn new(state: &AppState) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            controls: state.context.default_state().clone(),
        }
    }

    /// Apply a client message and produce the reply, if any
    pub fn handle(&mut self, state: &AppState, message: ClientMessage) -> Option<ServerMessage> {
        let ctx = &state.context;
        let result = match message {
            ClientMessage::Ping => return Some(ServerMessage::Pong),
            ClientMessage::Init => state.dispatch.initial(ctx, &self.controls),
            ClientMessage::SetControl { control, value } => {
                // Applied to a copy so a failed update leaves the session intact
                let mut next = self.controls.clone();
                let outputs = next
                    .apply(control, &value, ctx.catalog())
                    .and_then(|_| state.dispatch.dispatch(ctx, &next, control));
                if outputs.is_ok() {
                    self.controls = next;
                }
                outputs
            }
        };

        match result {
            Ok(outputs) => Some(ServerMessage::Update { outputs }),
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "View update failed");
                Some(ServerMessage::error(e.to_string()))
            }
        }
    }
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let _guard = state.open_session();
    let mut session = Session::new(&state);

    tracing::info!(session_id = %session.id, "View session opened");

    let connected = ServerMessage::Connected {
        session_id: session.id.clone(),
    };
    if !send(&mut sender, &connected).await {
        return;
    }

    while let Some(result) = receiver.next().await {
        let message = match result {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(session_id = %session.id, error = %e, "WebSocket receive error");
                break;
            }
        };

        let reply = match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => session.handle(&state, client_msg),
                Err(e) => {
                    tracing::debug!(
                        session_id = %session.id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    Some(ServerMessage::error(format!("Invalid message format: {}", e)))
                }
            },
            Message::Binary(_) => Some(ServerMessage::error("Binary messages not supported")),
            // Axum answers pings itself
            Message::Ping(_) | Message::Pong(_) => None,
            Message::Close(_) => {
                tracing::debug!(session_id = %session.id, "Client requested close");
                break;
            }
        };

        if let Some(reply) = reply {
            if !send(&mut sender, &reply).await {
                break;
            }
        }
    }

    tracing::info!(session_id = %session.id, "View session closed");
}

/// Returns false once the socket can no longer be written
async fn send<S>(sender: &mut S, message: &ServerMessage) -> bool
where
    S: SinkExt<Message> + Unpin,
{
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            return true;
        }
    };
    sender.send(Message::Text(text)).await.is_ok()
}
