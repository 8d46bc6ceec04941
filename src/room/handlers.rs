use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::models::RoomSnapshot;
use crate::shared::{AppError, AppState};

/// HTTP handler for inspecting a live room
///
/// GET /rooms/:room_id
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSnapshot>, AppError> {
    let room = state
        .room_service
        .registry()
        .lookup(&room_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_id)))?;

    Ok(Json(room.snapshot().await))
}

/// HTTP handler for listing all live rooms
///
/// GET /rooms
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSnapshot>> {
    let rooms = state.room_service.registry().list_rooms().await;

    let mut snapshots = Vec::with_capacity(rooms.len());
    for room in rooms {
        snapshots.push(room.snapshot().await);
    }
    snapshots.sort_by(|a, b| a.id.cmp(&b.id));

    info!(room_count = snapshots.len(), "Rooms listed");
    Json(snapshots)
}
