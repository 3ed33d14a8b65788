//! Chip movement engine: the only path by which ledger quantities change.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{
    DenominationId, Denomination, Ledger, Location, Money, MovementId, PersonId, SeatId,
    SessionId, ShiftId,
};
use crate::errors::domain::DomainError;

/// One (denomination, quantity) pair of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipLine {
    pub denomination_id: DenominationId,
    pub quantity: u64,
}

impl ChipLine {
    pub fn new(denomination_id: DenominationId, quantity: u64) -> Self {
        Self {
            denomination_id,
            quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementReason {
    OpeningTransfer,
    BuyIn,
    Rebuy,
    CashOut,
    RakeCollection,
    StandardWithdrawal,
    ManualWithdrawal,
}

impl MovementReason {
    pub const ALL: [MovementReason; 7] = [
        MovementReason::OpeningTransfer,
        MovementReason::BuyIn,
        MovementReason::Rebuy,
        MovementReason::CashOut,
        MovementReason::RakeCollection,
        MovementReason::StandardWithdrawal,
        MovementReason::ManualWithdrawal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MovementReason::OpeningTransfer => "OPENING_TRANSFER",
            MovementReason::BuyIn => "BUY_IN",
            MovementReason::Rebuy => "REBUY",
            MovementReason::CashOut => "CASH_OUT",
            MovementReason::RakeCollection => "RAKE_COLLECTION",
            MovementReason::StandardWithdrawal => "STANDARD_WITHDRAWAL",
            MovementReason::ManualWithdrawal => "MANUAL_WITHDRAWAL",
        }
    }
}

/// Optional links from a movement back to the table activity that caused it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementLinkage {
    pub session_id: Option<SessionId>,
    pub seat_id: Option<SeatId>,
    pub dealer_id: Option<PersonId>,
}

impl MovementLinkage {
    pub fn session(session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
            ..Self::default()
        }
    }

    pub fn seat(session_id: SessionId, seat_id: SeatId) -> Self {
        Self {
            session_id: Some(session_id),
            seat_id: Some(seat_id),
            dealer_id: None,
        }
    }
}

/// Immutable record of one committed transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipMovement {
    pub id: MovementId,
    pub shift_id: Option<ShiftId>,
    pub source: Location,
    pub destination: Location,
    pub lines: Vec<ChipLine>,
    pub total: Money,
    pub reason: MovementReason,
    pub linkage: MovementLinkage,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

impl ChipMovement {
    /// Signed value this movement adds to `location`.
    pub fn net_value_at(&self, location: Location) -> Money {
        if self.destination == location {
            self.total
        } else if self.source == location {
            -self.total
        } else {
            Money::ZERO
        }
    }
}

/// Everything needed to plan a transfer except the id and the clock.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub shift_id: Option<ShiftId>,
    pub source: Location,
    pub destination: Location,
    pub lines: Vec<ChipLine>,
    pub reason: MovementReason,
    pub linkage: MovementLinkage,
    pub note: Option<String>,
}

impl TransferRequest {
    pub fn new(
        source: Location,
        destination: Location,
        lines: Vec<ChipLine>,
        reason: MovementReason,
    ) -> Self {
        Self {
            shift_id: None,
            source,
            destination,
            lines,
            reason,
            linkage: MovementLinkage::default(),
            note: None,
        }
    }

    pub fn in_shift(mut self, shift_id: Option<ShiftId>) -> Self {
        self.shift_id = shift_id;
        self
    }

    pub fn linked(mut self, linkage: MovementLinkage) -> Self {
        self.linkage = linkage;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

/// Owns the ledger and the append-only movement log.
#[derive(Debug, Clone)]
pub struct MovementEngine {
    ledger: Ledger,
    log: Vec<ChipMovement>,
    next_id: MovementId,
}

impl Default for MovementEngine {
    fn default() -> Self {
        Self {
            ledger: Ledger::new(),
            log: Vec::new(),
            next_id: 1,
        }
    }
}

impl MovementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn log(&self) -> &[ChipMovement] {
        &self.log
    }

    pub fn movements_for_shift(&self, shift_id: ShiftId) -> impl Iterator<Item = &ChipMovement> {
        self.log
            .iter()
            .filter(move |m| m.shift_id == Some(shift_id))
    }

    pub(crate) fn register(&mut self, denomination: Denomination) -> Result<(), DomainError> {
        self.ledger.register(denomination)
    }

    /// Validate a transfer against the current ledger and build its record
    /// without changing anything.
    pub fn plan(
        &self,
        request: TransferRequest,
        at: OffsetDateTime,
    ) -> Result<ChipMovement, DomainError> {
        self.ledger
            .check_delta(request.source, request.destination, &request.lines)?;
        let total = self.ledger.price(&request.lines)?;

        Ok(ChipMovement {
            id: self.next_id,
            shift_id: request.shift_id,
            source: request.source,
            destination: request.destination,
            lines: request.lines,
            total,
            reason: request.reason,
            linkage: request.linkage,
            note: request.note,
            at,
        })
    }

    /// Apply a planned (or replayed) movement and append it to the log.
    pub(crate) fn commit(&mut self, movement: &ChipMovement) -> Result<(), DomainError> {
        if movement.id < self.next_id {
            return Err(DomainError::validation(format!(
                "movement {} is out of sequence (next is {})",
                movement.id, self.next_id
            )));
        }
        let priced = self.ledger.price(&movement.lines)?;
        if priced != movement.total {
            return Err(DomainError::validation(format!(
                "movement {} total {} does not match its lines ({priced})",
                movement.id, movement.total
            )));
        }

        self.ledger
            .apply_delta(movement.source, movement.destination, &movement.lines)?;
        self.next_id = movement.id + 1;
        self.log.push(movement.clone());
        Ok(())
    }

    /// Plan and commit in one step.
    pub fn transfer(
        &mut self,
        request: TransferRequest,
        at: OffsetDateTime,
    ) -> Result<ChipMovement, DomainError> {
        let movement = self.plan(request, at)?;
        self.commit(&movement)?;
        Ok(movement)
    }

    /// Greedy composition of `amount` from the largest denominations held at
    /// `location`. Fails when the stock cannot make the exact amount.
    pub fn compose(&self, location: Location, amount: Money) -> Result<Vec<ChipLine>, DomainError> {
        if amount <= Money::ZERO {
            return Err(DomainError::validation(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let mut by_face: Vec<&Denomination> = self.ledger.iter().collect();
        by_face.sort_by(|a, b| b.face_value.cmp(&a.face_value));

        let mut remaining = amount;
        let mut lines = Vec::new();
        for denomination in by_face {
            let available = denomination.qty(location);
            if available == 0 || denomination.face_value > remaining {
                continue;
            }
            let wanted = remaining
                .checked_div(denomination.face_value)
                .and_then(|w| w.trunc().to_u64())
                .unwrap_or(u64::MAX)
                .min(available);
            if wanted == 0 {
                continue;
            }
            remaining -= denomination.face_value * Money::from(wanted);
            lines.push(ChipLine::new(denomination.id, wanted));
            if remaining.is_zero() {
                return Ok(lines);
            }
        }

        // Report the smallest denomination as the one that ran short.
        let smallest = self
            .ledger
            .iter()
            .min_by(|a, b| a.face_value.cmp(&b.face_value))
            .ok_or(DomainError::NoChipsRegistered)?;
        let needed = remaining
            .checked_div(smallest.face_value)
            .and_then(|n| n.ceil().to_u64())
            .unwrap_or(u64::MAX);
        Err(DomainError::InsufficientChips {
            denomination_id: smallest.id,
            face_value: smallest.face_value,
            location,
            requested: needed,
            available: smallest.qty(location),
        })
    }
}
