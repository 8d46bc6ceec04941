use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::room::{RaceError, RoomService};
use crate::shared::AppState;
use crate::websockets::{
    connection_manager::ConnectionManager,
    messages::{JoinGamePayload, MessageType, PlayerTypedPayload, WebSocketMessage},
};

use super::socket::{Connection, MessageHandler};

/// Turns client frames into room operations and reports rejections back to the sender
pub struct WebsocketReceiveHandler {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl WebsocketReceiveHandler {
    pub fn new(room_service: Arc<RoomService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    async fn dispatch(&self, handle: &str, message: WebSocketMessage) -> Result<(), RaceError> {
        match message.message_type {
            MessageType::JoinGame => {
                let payload: JoinGamePayload =
                    serde_json::from_value(message.payload).unwrap_or_default();
                self.room_service
                    .join_game(handle, &payload.room_id, &payload.name)
                    .await
            }
            MessageType::StartGame => self.room_service.start_game(handle).await,
            MessageType::PlayerTyped => {
                let payload: PlayerTypedPayload =
                    serde_json::from_value(message.payload).unwrap_or_default();
                self.room_service.player_typed(handle, &payload.typed).await
            }
            MessageType::Leave => {
                self.room_service.leave(handle).await;
                Ok(())
            }
            other => {
                debug!(message_type = ?other, "Client sent a server-only message type");
                Err(RaceError::MalformedMessage(format!(
                    "unexpected message type {:?}",
                    other
                )))
            }
        }
    }

    async fn report_error(&self, handle: &str, error: &RaceError) {
        let message = WebSocketMessage::error(error.to_string());
        match serde_json::to_string(&message) {
            Ok(json) => self.connection_manager.send_to_player(handle, &json).await,
            Err(e) => warn!(handle = %handle, error = %e, "Failed to serialize error message"),
        }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, handle: &str, message: String) {
        debug!(handle = %handle, message = %message, "Received message");

        let result = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => self.dispatch(handle, ws_message).await,
            Err(e) => {
                warn!(handle = %handle, error = %e, "Failed to parse WebSocket message");
                Err(RaceError::MalformedMessage(e.to_string()))
            }
        };

        if let Err(e) = result {
            info!(handle = %handle, error = %e, "Request rejected");
            self.report_error(handle, &e).await;
        }
    }

    async fn handle_disconnect(&self, handle: &str) {
        info!(handle = %handle, "Connection lost, leaving room");
        self.room_service.leave(handle).await;
    }
}

/// WebSocket endpoint. Every upgraded connection gets a fresh participant handle.
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    let handle = Uuid::new_v4().to_string();
    info!(handle = %handle, "WebSocket connection requested");

    ws.on_upgrade(move |socket| handle_websocket_connection(socket, handle, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    handle: String,
    app_state: AppState,
) {
    info!(handle = %handle, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(handle.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(WebsocketReceiveHandler::new(
        app_state.room_service.clone(),
        app_state.connection_manager.clone(),
    ));

    let connection = Connection::new(
        handle.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect; leaving the room happens inside
    match connection.run().await {
        Ok(()) => info!(handle = %handle, "WebSocket connection closed cleanly"),
        Err(e) => warn!(handle = %handle, error = ?e, "WebSocket connection error"),
    }

    app_state
        .connection_manager
        .remove_connection(&handle)
        .await;
}
