//! Journal entries: the fully resolved facts produced by each successful
//! operation. `Room::apply` is the only consumer.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::shift::{CloseRecord, FinancialEvent, RakeCollection};
use super::{
    ChipMovement, DenominationId, Money, PaymentMethod, PersonId, PlayerId, PlayerSeat, SeatId,
    SessionId, Shift, ShiftId, Table, TableSession,
};

/// Registration facts for one denomination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenominationRecord {
    pub id: DenominationId,
    pub face_value: Money,
    pub color: Option<String>,
    pub initial_vault: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum JournalEntry {
    DenominationRegistered {
        denomination: DenominationRecord,
    },
    StandardSetSeeded {
        denominations: Vec<DenominationRecord>,
    },
    TableRegistered {
        table: Table,
    },
    TableUpdated {
        table: Table,
    },
    CreditLimitSet {
        player_id: PlayerId,
        limit: Money,
    },
    ShiftOpened {
        shift: Shift,
        movement: Option<ChipMovement>,
    },
    WithdrawalRecorded {
        movement: ChipMovement,
    },
    SessionOpened {
        session: TableSession,
    },
    DealerAssigned {
        session_id: SessionId,
        dealer_id: PersonId,
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
    PlayerSeated {
        seat: PlayerSeat,
        movement: ChipMovement,
        warnings: Vec<String>,
    },
    RebuyRecorded {
        seat_id: SeatId,
        payment_method: PaymentMethod,
        movement: ChipMovement,
        warnings: Vec<String>,
    },
    CashedOut {
        seat_id: SeatId,
        collection_method: PaymentMethod,
        movement: Option<ChipMovement>,
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
    SessionClosed {
        session_id: SessionId,
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
    RakeRecorded {
        rake: RakeCollection,
        movement: ChipMovement,
    },
    FinancialEventRecorded {
        event: FinancialEvent,
    },
    ShiftClosed {
        shift_id: ShiftId,
        record: CloseRecord,
    },
}

impl JournalEntry {
    /// Stable discriminator stored alongside the payload.
    pub fn kind(&self) -> &'static str {
        match self {
            JournalEntry::DenominationRegistered { .. } => "denomination_registered",
            JournalEntry::StandardSetSeeded { .. } => "standard_set_seeded",
            JournalEntry::TableRegistered { .. } => "table_registered",
            JournalEntry::TableUpdated { .. } => "table_updated",
            JournalEntry::CreditLimitSet { .. } => "credit_limit_set",
            JournalEntry::ShiftOpened { .. } => "shift_opened",
            JournalEntry::WithdrawalRecorded { .. } => "withdrawal_recorded",
            JournalEntry::SessionOpened { .. } => "session_opened",
            JournalEntry::DealerAssigned { .. } => "dealer_assigned",
            JournalEntry::PlayerSeated { .. } => "player_seated",
            JournalEntry::RebuyRecorded { .. } => "rebuy_recorded",
            JournalEntry::CashedOut { .. } => "cashed_out",
            JournalEntry::SessionClosed { .. } => "session_closed",
            JournalEntry::RakeRecorded { .. } => "rake_recorded",
            JournalEntry::FinancialEventRecorded { .. } => "financial_event_recorded",
            JournalEntry::ShiftClosed { .. } => "shift_closed",
        }
    }

    /// Movement carried by this entry, if any.
    pub fn movement(&self) -> Option<&ChipMovement> {
        match self {
            JournalEntry::ShiftOpened { movement, .. } | JournalEntry::CashedOut { movement, .. } => {
                movement.as_ref()
            }
            JournalEntry::WithdrawalRecorded { movement }
            | JournalEntry::PlayerSeated { movement, .. }
            | JournalEntry::RebuyRecorded { movement, .. }
            | JournalEntry::RakeRecorded { movement, .. } => Some(movement),
            _ => None,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            JournalEntry::PlayerSeated { warnings, .. }
            | JournalEntry::RebuyRecorded { warnings, .. } => warnings,
            _ => &[],
        }
    }
}
