use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::room::models::Participant;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    JoinGame,
    StartGame,
    PlayerTyped,
    Leave,

    // Server -> Client
    Error,
    Participants,
    ParticipantJoined,
    ParticipantLeft,
    ScoreUpdate,
    RoundStarted,
    RoundFinished,
    NewHost,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    pub player_uuid: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinGamePayload {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerTypedPayload {
    #[serde(default)]
    pub typed: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantsPayload {
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantLeftPayload {
    pub handle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreUpdatePayload {
    pub handle: String,
    pub score: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStartedPayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundFinishedPayload {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHostPayload {
    pub handle: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                player_uuid: None,
            }),
        }
    }

    fn with_payload<T: Serialize>(message_type: MessageType, payload: T) -> Self {
        // Payload structs only hold strings and integers, so this cannot fail
        let value = serde_json::to_value(payload).unwrap_or_default();
        Self::new(message_type, value)
    }

    /// Create a JOIN_GAME message
    pub fn join_game(room_id: String, name: String) -> Self {
        Self::with_payload(MessageType::JoinGame, JoinGamePayload { room_id, name })
    }

    /// Create a START_GAME message
    pub fn start_game() -> Self {
        Self::new(MessageType::StartGame, serde_json::json!({}))
    }

    /// Create a PLAYER_TYPED message
    pub fn player_typed(typed: String) -> Self {
        Self::with_payload(MessageType::PlayerTyped, PlayerTypedPayload { typed })
    }

    /// Create a LEAVE message
    pub fn leave() -> Self {
        Self::new(MessageType::Leave, serde_json::json!({}))
    }

    /// Create an ERROR message
    pub fn error(message: String) -> Self {
        Self::with_payload(MessageType::Error, ErrorPayload { message })
    }

    /// Create a PARTICIPANTS message
    pub fn participants(participants: Vec<Participant>) -> Self {
        Self::with_payload(
            MessageType::Participants,
            ParticipantsPayload { participants },
        )
    }

    /// Create a PARTICIPANT_JOINED message carrying the public participant record
    pub fn participant_joined(participant: Participant) -> Self {
        Self::with_payload(MessageType::ParticipantJoined, participant)
    }

    /// Create a PARTICIPANT_LEFT message
    pub fn participant_left(handle: String) -> Self {
        Self::with_payload(
            MessageType::ParticipantLeft,
            ParticipantLeftPayload { handle },
        )
    }

    /// Create a SCORE_UPDATE message
    pub fn score_update(handle: String, score: usize) -> Self {
        Self::with_payload(
            MessageType::ScoreUpdate,
            ScoreUpdatePayload { handle, score },
        )
    }

    /// Create a ROUND_STARTED message
    pub fn round_started(text: String) -> Self {
        Self::with_payload(MessageType::RoundStarted, RoundStartedPayload { text })
    }

    /// Create a ROUND_FINISHED message
    pub fn round_finished() -> Self {
        Self::with_payload(MessageType::RoundFinished, RoundFinishedPayload {})
    }

    /// Create a NEW_HOST message
    pub fn new_host(handle: String) -> Self {
        Self::with_payload(MessageType::NewHost, NewHostPayload { handle })
    }
}
