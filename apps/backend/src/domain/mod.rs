//! Domain layer: chip ledger, table sessions, shifts and reconciliation.
//!
//! Everything in here is synchronous and free of I/O. The service layer owns
//! locking and persistence; the domain only decides and applies.

pub mod journal_entry;
pub mod ledger;
pub mod location;
pub mod movement;
pub mod policy;
pub mod reconciliation;
pub mod room;
pub mod shift;
pub mod tables;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests_movement;
#[cfg(test)]
mod tests_props_conservation;
#[cfg(test)]
mod tests_reconciliation;
#[cfg(test)]
mod tests_tables;

use rust_decimal::Decimal;

/// Monetary amounts: face values, totals, rates.
pub type Money = Decimal;

/// Upper bound (10^18) for the inventory value and for any single amount the
/// room records: financial events, credit limits.
pub const MAX_AMOUNT: Money = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

pub type DenominationId = i64;
pub type MovementId = i64;
pub type TableId = i64;
pub type SessionId = i64;
pub type SeatId = i64;
pub type ShiftId = i64;
/// Opaque key into the player directory.
pub type PlayerId = i64;
/// Opaque key into the personnel directory (cashiers, dealers).
pub type PersonId = i64;

// Re-exports for ergonomics
pub use journal_entry::{DenominationRecord, JournalEntry};
pub use ledger::{Denomination, Ledger};
pub use location::Location;
pub use movement::{
    ChipLine, ChipMovement, MovementEngine, MovementLinkage, MovementReason, TransferRequest,
};
pub use policy::RoomPolicy;
pub use reconciliation::ClosingPreview;
pub use room::{OpenShift, Room, SeatRequest, TableUpdate};
pub use shift::{
    CloseRecord, FinancialEvent, FinancialEventKind, RakeCollection, Shift, ShiftState,
    ShiftTotals,
};
pub use tables::{
    CreditAccount, DealerAssignment, PaymentMethod, PlayerSeat, SessionState, Table, TableSession,
};
