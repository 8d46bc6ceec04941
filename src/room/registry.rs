use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::session::Room;
use crate::{race::TextSupplier, websockets::ConnectionManager};

/// Process-wide map from room id to live room
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Returns the room registered under `room_id`, creating an empty one if absent
    async fn resolve_or_create(&self, room_id: &str) -> Arc<Room>;

    async fn lookup(&self, room_id: &str) -> Option<Arc<Room>>;

    /// Drops the mapping for `room_id`. Idempotent.
    async fn remove(&self, room_id: &str);

    /// Drops the mapping only if it still points at `room`, so a room that was
    /// already replaced under the same id is left alone
    async fn remove_room(&self, room: &Arc<Room>) -> bool;

    async fn list_rooms(&self) -> Vec<Arc<Room>>;
}

/// In-memory registry; rooms are built with the shared outbound and text collaborators
pub struct InMemoryRoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Room>>>,
    connections: Arc<dyn ConnectionManager>,
    text_supplier: Arc<dyn TextSupplier>,
}

impl InMemoryRoomRegistry {
    pub fn new(
        connections: Arc<dyn ConnectionManager>,
        text_supplier: Arc<dyn TextSupplier>,
    ) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            connections,
            text_supplier,
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    #[instrument(skip(self))]
    async fn resolve_or_create(&self, room_id: &str) -> Arc<Room> {
        if let Some(room) = self.rooms.read().await.get(room_id) {
            return room.clone();
        }

        // Re-check under the write lock; another join may have created it meanwhile
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id.to_string())
            .or_insert_with(|| {
                info!(room_id = %room_id, "Creating room");
                Arc::new(Room::new(
                    room_id.to_string(),
                    self.connections.clone(),
                    self.text_supplier.clone(),
                ))
            })
            .clone()
    }

    async fn lookup(&self, room_id: &str) -> Option<Arc<Room>> {
        self.rooms.read().await.get(room_id).cloned()
    }

    #[instrument(skip(self))]
    async fn remove(&self, room_id: &str) {
        if self.rooms.write().await.remove(room_id).is_some() {
            info!(room_id = %room_id, "Room removed from registry");
        }
    }

    #[instrument(skip(self, room), fields(room_id = %room.id()))]
    async fn remove_room(&self, room: &Arc<Room>) -> bool {
        let mut rooms = self.rooms.write().await;
        match rooms.get(room.id()) {
            Some(current) if Arc::ptr_eq(current, room) => {
                rooms.remove(room.id());
                info!("Room removed from registry");
                true
            }
            _ => {
                debug!("Room already replaced or removed");
                false
            }
        }
    }

    async fn list_rooms(&self) -> Vec<Arc<Room>> {
        self.rooms.read().await.values().cloned().collect()
    }
}
