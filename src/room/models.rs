use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle of the current round. `Finished` is not terminal: the host can
/// start another round from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RoundStatus {
    NotStarted,
    InProgress,
    Finished,
}

/// Public record of a joined connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub handle: String,
    pub name: String,
    pub score: usize,
}

impl Participant {
    pub fn new(handle: String, name: String) -> Self {
        Self {
            handle,
            name,
            score: 0,
        }
    }
}

/// Point-in-time copy of a room's state, for HTTP lookups and tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: String,
    pub status: RoundStatus,
    pub host: Option<String>,
    pub participants: Vec<Participant>,
    pub reference_text: String,
}

impl RoomSnapshot {
    pub fn has_participant(&self, handle: &str) -> bool {
        self.participants.iter().any(|p| p.handle == handle)
    }

    pub fn score_of(&self, handle: &str) -> Option<usize> {
        self.participants
            .iter()
            .find(|p| p.handle == handle)
            .map(|p| p.score)
    }
}
