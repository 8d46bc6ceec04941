use thiserror::Error;

/// Rejections reported back to the participant that caused them.
///
/// The `Display` text is what ends up in the ERROR frame.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RaceError {
    #[error("Invalid room ID")]
    InvalidRoomId,

    #[error("Please provide name")]
    MissingName,

    #[error("Game has already started, please wait for it to end before joining")]
    GameInProgress,

    #[error("The game has already started")]
    AlreadyInProgress,

    #[error("You are not the host of the game. Only hosts are allowed to start the game.")]
    NotHost,

    #[error("The game has not started yet")]
    RoundNotActive,

    #[error("Game not found")]
    RoomNotFound,

    #[error("Could not get a text for the round: {0}")]
    TextUnavailable(String),

    #[error("Malformed message: {0}")]
    MalformedMessage(String),
}
