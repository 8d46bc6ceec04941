use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::{
    errors::RaceError,
    models::{Participant, RoomSnapshot, RoundStatus},
};
use crate::{
    race::{score_typed, TextSupplier},
    websockets::{ConnectionManager, WebSocketMessage},
};

/// How long a round runs once its text has been handed out
pub const ROUND_DURATION: Duration = Duration::from_secs(60);

/// What a departure did to the room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Handle was not a participant
    NotInRoom,
    /// Handle removed, others remain
    Left,
    /// Last participant gone; the room is closed and must leave the registry
    RoomEmptied,
}

struct RoomState {
    status: RoundStatus,
    host: Option<String>,
    participants: Vec<Participant>,
    reference_text: String,
    /// Bumped on every start so stale timers and fetches can be told apart
    round: u64,
    round_timer: Option<JoinHandle<()>>,
    closed: bool,
}

impl RoomState {
    fn handles(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.handle.clone()).collect()
    }

    fn position(&self, handle: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.handle == handle)
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.round_timer.take() {
            timer.abort();
        }
    }
}

/// One race session. All state sits behind a single async mutex and every
/// broadcast is sent while it is held, so members see notifications in the
/// order the room processed them.
pub struct Room {
    id: String,
    state: Mutex<RoomState>,
    connections: Arc<dyn ConnectionManager>,
    text_supplier: Arc<dyn TextSupplier>,
}

impl Room {
    pub fn new(
        id: String,
        connections: Arc<dyn ConnectionManager>,
        text_supplier: Arc<dyn TextSupplier>,
    ) -> Self {
        Self {
            id,
            state: Mutex::new(RoomState {
                status: RoundStatus::NotStarted,
                host: None,
                participants: Vec::new(),
                reference_text: String::new(),
                round: 0,
                round_timer: None,
                closed: false,
            }),
            connections,
            text_supplier,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn snapshot(&self) -> RoomSnapshot {
        let state = self.state.lock().await;
        RoomSnapshot {
            id: self.id.clone(),
            status: state.status,
            host: state.host.clone(),
            participants: state.participants.clone(),
            reference_text: state.reference_text.clone(),
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    /// Adds a participant and welcomes it.
    ///
    /// The first participant of a room becomes host. Joining again with a handle
    /// that is already present only re-sends the welcome.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub async fn join(&self, handle: &str, name: &str) -> Result<(), RaceError> {
        let mut state = self.state.lock().await;

        if state.closed {
            return Err(RaceError::RoomNotFound);
        }
        if state.position(handle).is_some() {
            debug!(handle = %handle, "Participant already in room, re-sending welcome");
            self.welcome(&state, handle).await;
            return Ok(());
        }
        if state.status == RoundStatus::InProgress {
            return Err(RaceError::GameInProgress);
        }

        if state.host.is_none() {
            state.host = Some(handle.to_string());
        }

        let participant = Participant::new(handle.to_string(), name.to_string());
        state.participants.push(participant.clone());

        info!(
            handle = %handle,
            name = %name,
            participant_count = state.participants.len(),
            "Participant joined room"
        );

        self.broadcast(&state, &WebSocketMessage::participant_joined(participant))
            .await;
        self.welcome(&state, handle).await;

        Ok(())
    }

    /// Removes a participant; explicit leave and connection loss both end up here.
    ///
    /// A departing host hands the privilege to the earliest remaining joiner.
    /// When nobody is left the room closes and its timer is cancelled.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub async fn leave(&self, handle: &str) -> LeaveOutcome {
        let mut state = self.state.lock().await;

        let Some(position) = state.position(handle) else {
            debug!(handle = %handle, "Leave for handle that is not in room");
            return LeaveOutcome::NotInRoom;
        };
        state.participants.remove(position);

        if state.participants.is_empty() {
            state.host = None;
            state.closed = true;
            state.cancel_timer();
            info!(handle = %handle, "Last participant left, closing room");
            return LeaveOutcome::RoomEmptied;
        }

        if state.host.as_deref() == Some(handle) {
            let new_host = state.participants[0].handle.clone();
            info!(old_host = %handle, new_host = %new_host, "Host left, promoting next participant");
            state.host = Some(new_host.clone());
            self.broadcast(&state, &WebSocketMessage::new_host(new_host))
                .await;
        }

        info!(
            handle = %handle,
            participant_count = state.participants.len(),
            "Participant left room"
        );
        self.broadcast(&state, &WebSocketMessage::participant_left(handle.to_string()))
            .await;

        LeaveOutcome::Left
    }

    /// Starts a round on behalf of the host.
    ///
    /// Scores are reset and broadcast before the text is requested. The room
    /// counts as in progress while the text is being fetched, but typing is only
    /// scored once the text has arrived.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub async fn start_round(self: &Arc<Self>, requester: &str) -> Result<(), RaceError> {
        let round = {
            let mut state = self.state.lock().await;

            if state.closed {
                return Err(RaceError::RoomNotFound);
            }
            if state.status == RoundStatus::InProgress {
                return Err(RaceError::AlreadyInProgress);
            }
            if state.host.as_deref() != Some(requester) {
                return Err(RaceError::NotHost);
            }

            for participant in state.participants.iter_mut() {
                participant.score = 0;
            }
            self.broadcast(
                &state,
                &WebSocketMessage::participants(state.participants.clone()),
            )
            .await;

            state.status = RoundStatus::InProgress;
            state.reference_text.clear();
            state.round += 1;
            state.round
        };

        info!(round, "Round starting, fetching reference text");
        let fetched = self.text_supplier.fetch_reference_text().await;

        let mut state = self.state.lock().await;
        if state.closed || state.round != round {
            debug!(round, "Room changed while fetching text, dropping round start");
            return Ok(());
        }

        let text = match fetched {
            Ok(text) => text,
            Err(e) => {
                warn!(round, error = %e, "Reference text unavailable, reverting round");
                state.status = RoundStatus::NotStarted;
                let error = RaceError::TextUnavailable(e.to_string());
                // Requester hears about it through the returned error
                if let Some(host) = state.host.clone().filter(|host| host != requester) {
                    self.unicast(&host, &WebSocketMessage::error(error.to_string()))
                        .await;
                }
                return Err(error);
            }
        };

        state.reference_text = text.clone();
        self.broadcast(&state, &WebSocketMessage::round_started(text))
            .await;

        state.cancel_timer();
        state.round_timer = Some(Self::schedule_round_end(Arc::downgrade(self), round));

        info!(round, duration_secs = ROUND_DURATION.as_secs(), "Round started");
        Ok(())
    }

    fn schedule_round_end(room: Weak<Room>, round: u64) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(ROUND_DURATION).await;
            match room.upgrade() {
                Some(room) => room.finish_round(round).await,
                None => debug!(round, "Round timer fired for dropped room"),
            }
        })
    }

    /// Ends `round` if it is still the running one; otherwise does nothing.
    pub async fn finish_round(&self, round: u64) {
        let mut state = self.state.lock().await;

        if state.closed || state.round != round || state.status != RoundStatus::InProgress {
            debug!(room_id = %self.id, round, "Ignoring stale round end");
            return;
        }

        state.status = RoundStatus::Finished;
        // The timer task is the caller here, so detach rather than abort
        state.round_timer = None;

        info!(room_id = %self.id, round, "Round finished");
        self.broadcast(&state, &WebSocketMessage::round_finished())
            .await;
        // Final standings, including everyone still connected after the round
        self.broadcast(
            &state,
            &WebSocketMessage::participants(state.participants.clone()),
        )
        .await;
    }

    /// Rescores a participant's latest transmission from scratch
    #[instrument(skip(self, typed), fields(room_id = %self.id))]
    pub async fn record_typed(&self, handle: &str, typed: &str) -> Result<(), RaceError> {
        let mut state = self.state.lock().await;

        if state.closed {
            return Err(RaceError::RoomNotFound);
        }
        if state.status != RoundStatus::InProgress || state.reference_text.is_empty() {
            return Err(RaceError::RoundNotActive);
        }

        let score = score_typed(&state.reference_text, typed);
        let Some(position) = state.position(handle) else {
            debug!(handle = %handle, "Typed text from non-participant ignored");
            return Ok(());
        };
        state.participants[position].score = score;

        debug!(handle = %handle, score, "Score updated");
        self.broadcast(
            &state,
            &WebSocketMessage::score_update(handle.to_string(), score),
        )
        .await;

        Ok(())
    }

    /// Closes the room regardless of who is still in it
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.closed = true;
        state.cancel_timer();
    }

    async fn welcome(&self, state: &RoomState, handle: &str) {
        self.unicast(
            handle,
            &WebSocketMessage::participants(state.participants.clone()),
        )
        .await;
        if let Some(host) = &state.host {
            self.unicast(handle, &WebSocketMessage::new_host(host.clone()))
                .await;
        }
    }

    async fn broadcast(&self, state: &RoomState, message: &WebSocketMessage) {
        if let Some(json) = self.encode(message) {
            self.connections
                .send_to_players(&state.handles(), &json)
                .await;
        }
    }

    async fn unicast(&self, handle: &str, message: &WebSocketMessage) {
        if let Some(json) = self.encode(message) {
            self.connections.send_to_player(handle, &json).await;
        }
    }

    fn encode(&self, message: &WebSocketMessage) -> Option<String> {
        match serde_json::to_string(message) {
            Ok(json) => Some(json),
            Err(e) => {
                error!(
                    room_id = %self.id,
                    message_type = ?message.message_type,
                    error = %e,
                    "Failed to serialize message"
                );
                None
            }
        }
    }
}

impl Drop for Room {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().round_timer.take() {
            timer.abort();
        }
    }
}
