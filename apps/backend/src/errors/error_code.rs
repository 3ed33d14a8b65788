//! Error codes for the card-room backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the card-room backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// No chip denominations exist yet
    NoChipsRegistered,
    /// Credit limit exceeded under strict policy
    CreditLimitExceeded,

    // Resource Not Found
    /// Denomination not found
    DenominationNotFound,
    /// Table not found
    TableNotFound,
    /// Table session not found
    SessionNotFound,
    /// Player seat not found
    SeatNotFound,
    /// Shift not found
    ShiftNotFound,
    /// Player credit account not found
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Not enough chips at the source location
    InsufficientChips,
    /// A shift is already open
    ShiftAlreadyOpen,
    /// No shift is open
    NoActiveShift,
    /// Stale shift handle
    ShiftMismatch,
    /// Session is closed
    SessionNotActive,
    /// Table already has an active session
    TableOccupied,
    /// Table is marked inactive
    TableInactive,
    /// Seat already cashed out
    SeatAlreadyClosed,
    /// Player already holds an open seat in the session
    PlayerAlreadySeated,
    /// Session still has seated players
    OpenSeatsRemaining,
    /// Closing blocked by reconciliation problems
    CannotClose,
    /// Face value already registered
    DuplicateDenomination,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Journal writer is gone
    JournalUnavailable,
    /// Journal replay found inconsistent data
    DataCorruption,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NoChipsRegistered => "NO_CHIPS_REGISTERED",
            Self::CreditLimitExceeded => "CREDIT_LIMIT_EXCEEDED",

            Self::DenominationNotFound => "DENOMINATION_NOT_FOUND",
            Self::TableNotFound => "TABLE_NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::SeatNotFound => "SEAT_NOT_FOUND",
            Self::ShiftNotFound => "SHIFT_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::InsufficientChips => "INSUFFICIENT_CHIPS",
            Self::ShiftAlreadyOpen => "SHIFT_ALREADY_OPEN",
            Self::NoActiveShift => "NO_ACTIVE_SHIFT",
            Self::ShiftMismatch => "SHIFT_MISMATCH",
            Self::SessionNotActive => "SESSION_NOT_ACTIVE",
            Self::TableOccupied => "TABLE_OCCUPIED",
            Self::TableInactive => "TABLE_INACTIVE",
            Self::SeatAlreadyClosed => "SEAT_ALREADY_CLOSED",
            Self::PlayerAlreadySeated => "PLAYER_ALREADY_SEATED",
            Self::OpenSeatsRemaining => "OPEN_SEATS_REMAINING",
            Self::CannotClose => "CANNOT_CLOSE",
            Self::DuplicateDenomination => "DUPLICATE_DENOMINATION",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::JournalUnavailable => "JOURNAL_UNAVAILABLE",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
