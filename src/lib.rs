// Library crate for the typing race server
// This file exposes the public API for integration tests

pub mod config;
pub mod race;
pub mod room;
pub mod shared;
pub mod websockets;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use room::{InMemoryRoomRegistry, RaceError, Room, RoomRegistry, RoomService};
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, InMemoryConnectionManager, MessageHandler, MessageType, WebSocketMessage,
    WebsocketReceiveHandler,
};

/// Builds the HTTP router with every route the server exposes
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/ws", get(websockets::websocket_handler))
        .route("/rooms", get(room::list_rooms))
        .route("/rooms/:room_id", get(room::get_room))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
