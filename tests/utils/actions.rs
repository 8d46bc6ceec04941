#![allow(dead_code)]

use typerace::{
    room::RoomSnapshot,
    websockets::{MessageHandler, WebSocketMessage},
};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Deliver a client frame exactly as the socket loop would
    pub async fn send_message(&self, handle: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.input_handler.handle_message(handle, message_json).await;
    }

    /// Deliver a raw text frame
    pub async fn send_raw(&self, handle: &str, frame: &str) {
        self.input_handler
            .handle_message(handle, frame.to_string())
            .await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    /// Current state of a registered room
    pub async fn room(&self, room_id: &str) -> Option<RoomSnapshot> {
        match self.room_service.registry().lookup(room_id).await {
            Some(room) => Some(room.snapshot().await),
            None => None,
        }
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_join(&self, handle: &str, room_id: &str, name: &str) {
        self.send_message(
            handle,
            WebSocketMessage::join_game(room_id.to_string(), name.to_string()),
        )
        .await;
    }

    pub async fn send_start_game(&self, handle: &str) {
        self.send_message(handle, WebSocketMessage::start_game()).await;
    }

    pub async fn send_typed(&self, handle: &str, typed: &str) {
        self.send_message(handle, WebSocketMessage::player_typed(typed.to_string()))
            .await;
    }

    pub async fn send_leave(&self, handle: &str) {
        self.send_message(handle, WebSocketMessage::leave()).await;
    }

    /// Simulate the socket going away without a LEAVE frame
    pub async fn disconnect(&self, handle: &str) {
        self.input_handler.handle_disconnect(handle).await;
    }
}
