use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::{
    errors::RaceError,
    registry::RoomRegistry,
    session::{LeaveOutcome, Room},
};

/// Routes per-connection requests to the room that connection joined
pub struct RoomService {
    registry: Arc<dyn RoomRegistry>,
    // handle -> room id
    memberships: RwLock<HashMap<String, String>>,
}

impl RoomService {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self {
            registry,
            memberships: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<dyn RoomRegistry> {
        &self.registry
    }

    /// Room id the handle currently belongs to
    pub async fn room_of(&self, handle: &str) -> Option<String> {
        self.memberships.read().await.get(handle).cloned()
    }

    /// Joins `room_id`, creating the room on first reference.
    ///
    /// A connection can be in one room at a time; once the new room accepts
    /// the join, the previous room is left. A rejected join changes nothing.
    #[instrument(skip(self))]
    pub async fn join_game(&self, handle: &str, room_id: &str, name: &str) -> Result<(), RaceError> {
        if room_id.is_empty() {
            return Err(RaceError::InvalidRoomId);
        }
        if name.is_empty() {
            return Err(RaceError::MissingName);
        }

        let previous = self
            .room_of(handle)
            .await
            .filter(|current| current != room_id);

        // One retry covers a join that lands on a room which emptied concurrently
        for _ in 0..2 {
            let room = self.registry.resolve_or_create(room_id).await;
            match room.join(handle, name).await {
                Ok(()) => {
                    if let Some(previous) = previous {
                        info!(handle = %handle, from = %previous, to = %room_id, "Switched rooms");
                        self.leave_room(handle, &previous).await;
                    }
                    self.memberships
                        .write()
                        .await
                        .insert(handle.to_string(), room_id.to_string());
                    return Ok(());
                }
                Err(RaceError::RoomNotFound) => {
                    debug!(room_id = %room_id, "Resolved a closed room, evicting and retrying");
                    self.registry.remove_room(&room).await;
                }
                Err(e) => return Err(e),
            }
        }

        warn!(room_id = %room_id, handle = %handle, "Could not join room after retry");
        Err(RaceError::RoomNotFound)
    }

    #[instrument(skip(self))]
    pub async fn start_game(&self, handle: &str) -> Result<(), RaceError> {
        let room = self.current_room(handle).await?;
        room.start_round(handle).await
    }

    #[instrument(skip(self, typed))]
    pub async fn player_typed(&self, handle: &str, typed: &str) -> Result<(), RaceError> {
        let room = self.current_room(handle).await?;
        room.record_typed(handle, typed).await
    }

    /// Leaves whatever room the handle is in. Used for explicit leave and
    /// connection loss alike; never fails.
    #[instrument(skip(self))]
    pub async fn leave(&self, handle: &str) {
        let Some(room_id) = self.memberships.write().await.remove(handle) else {
            debug!(handle = %handle, "Leave from connection that is not in a room");
            return;
        };

        self.leave_room(handle, &room_id).await;
    }

    async fn leave_room(&self, handle: &str, room_id: &str) {
        let Some(room) = self.registry.lookup(room_id).await else {
            debug!(room_id = %room_id, "Room already gone on leave");
            return;
        };

        if room.leave(handle).await == LeaveOutcome::RoomEmptied {
            self.registry.remove_room(&room).await;
        }
    }

    async fn current_room(&self, handle: &str) -> Result<Arc<Room>, RaceError> {
        let room_id = self
            .room_of(handle)
            .await
            .ok_or(RaceError::RoomNotFound)?;
        self.registry
            .lookup(&room_id)
            .await
            .ok_or(RaceError::RoomNotFound)
    }
}
