//! Error codes surfaced at the action boundary.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE.

use core::fmt;

/// Centralized error codes for peloton actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authorization
    /// Actor does not hold the host role
    InsufficientRole,
    /// Actor does not own the rider
    NotRiderOwner,

    // Validation
    /// Join code is not 6 symbols of the join alphabet
    InvalidJoinCode,
    /// Team selection is not exactly 2 distinct colors
    InvalidColorSelection,
    /// A move already exists for the rider this round
    DuplicateMove,
    /// Draw attempted while a hand is held
    HandNotEmpty,
    /// Choice attempted without a hand
    NoHand,
    /// Card position outside the hand
    CardIndexOutOfRange,
    /// Not every rider has a selected card
    IncompleteSelection,
    /// Action not allowed in the current round phase
    PhaseMismatch,
    /// Riders already exist for the game
    RosterExists,
    /// Fewer than two players joined
    NotEnoughPlayers,
    /// General validation error
    ValidationError,

    // Not found
    GameNotFound,
    PlayerNotFound,
    RiderNotFound,
    NotFound,

    // Capacity and conflicts
    /// Game already has two players
    GameFull,
    /// Join code collided with an existing game
    JoinCodeConflict,
    /// Record was modified concurrently
    OptimisticLock,
    /// Generic conflict
    Conflict,

    // System errors
    /// Record store failure
    StoreError,
    /// Record store unreachable
    StoreUnavailable,
    /// Stored data violates an invariant
    DataCorruption,
    /// Configuration error
    ConfigError,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::NotRiderOwner => "NOT_RIDER_OWNER",

            Self::InvalidJoinCode => "INVALID_JOIN_CODE",
            Self::InvalidColorSelection => "INVALID_COLOR_SELECTION",
            Self::DuplicateMove => "DUPLICATE_MOVE",
            Self::HandNotEmpty => "HAND_NOT_EMPTY",
            Self::NoHand => "NO_HAND",
            Self::CardIndexOutOfRange => "CARD_INDEX_OUT_OF_RANGE",
            Self::IncompleteSelection => "INCOMPLETE_SELECTION",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::RosterExists => "ROSTER_EXISTS",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::RiderNotFound => "RIDER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::GameFull => "GAME_FULL",
            Self::JoinCodeConflict => "JOIN_CODE_CONFLICT",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::StoreError => "STORE_ERROR",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
