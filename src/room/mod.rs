// Public API
pub use errors::RaceError;
pub use handlers::{get_room, list_rooms};
pub use models::{Participant, RoomSnapshot, RoundStatus};
pub use registry::{InMemoryRoomRegistry, RoomRegistry};
pub use service::RoomService;
pub use session::{LeaveOutcome, Room, ROUND_DURATION};

// Internal modules
mod errors;
mod handlers;
pub mod models;
mod registry;
mod service;
mod session;
