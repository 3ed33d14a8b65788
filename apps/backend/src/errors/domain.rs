//! Domain-level error type used across the engine, services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! through the `From<DomainError> for AppError` implementation.

use thiserror::Error;

use crate::domain::{
    DenominationId, Location, Money, PlayerId, SeatId, SessionId, ShiftId, TableId,
};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    DbUnavailable,
    JournalUnavailable,
    DataCorruption,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Denomination,
    Table,
    Session,
    Seat,
    Shift,
    Player,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error(
        "insufficient chips: denomination {denomination_id} ({face_value}) has {available} at {location}, {requested} requested"
    )]
    InsufficientChips {
        denomination_id: DenominationId,
        face_value: Money,
        location: Location,
        requested: u64,
        available: u64,
    },
    #[error("shift {0} is already open")]
    ShiftAlreadyOpen(ShiftId),
    #[error("no active shift")]
    NoActiveShift,
    #[error("shift {given} is not the open shift (open shift is {open})")]
    ShiftMismatch { open: ShiftId, given: ShiftId },
    #[error("no chip denominations registered")]
    NoChipsRegistered,
    #[error("table session {0} is not active")]
    SessionNotActive(SessionId),
    #[error("table {table_id} already has active session {session_id}")]
    TableOccupied {
        table_id: TableId,
        session_id: SessionId,
    },
    #[error("table {0} is inactive")]
    TableInactive(TableId),
    #[error("seat {0} is already closed")]
    SeatAlreadyClosed(SeatId),
    #[error("player {player_id} is already seated in session {session_id}")]
    PlayerAlreadySeated {
        player_id: PlayerId,
        session_id: SessionId,
    },
    #[error("session {session_id} still has {open_seats} open seat(s)")]
    OpenSeatsRemaining {
        session_id: SessionId,
        open_seats: usize,
    },
    #[error("shift cannot be closed: {}", problems.join("; "))]
    CannotClose { problems: Vec<String> },
    #[error("a denomination with face value {0} already exists")]
    DuplicateDenomination(Money),
    #[error("player {player_id} would owe {balance_after}, above the credit limit of {limit}")]
    CreditLimitExceeded {
        player_id: PlayerId,
        limit: Money,
        balance_after: Money,
    },
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("infra {0:?}: {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                DomainError::infra(InfraErrorKind::DbUnavailable, e.to_string())
            }
            other => DomainError::infra(InfraErrorKind::Other("db".to_string()), other.to_string()),
        }
    }
}
