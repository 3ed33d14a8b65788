//! The room aggregate: ledger, tables, sessions, seats, shifts and credit.
//!
//! Every operation is split in two halves. A *decide* method (in `chip_ops`,
//! `shift_ops` and `table_ops`) validates the request against the current
//! state and returns the [`JournalEntry`] describing what happened, without
//! mutating anything. [`Room::apply`] then folds that entry into the state.
//! Replay runs `apply` alone over the stored journal.

mod chip_ops;
mod queries;
mod shift_ops;
mod table_ops;

pub use queries::{
    ActiveSessionView, ActiveShiftView, CashAlert, DealerView, DenominationView, InventoryView,
    OpenPreview, SeatView, SessionDetail, ShiftStatistics,
};
pub use shift_ops::OpenShift;
pub use table_ops::{SeatRequest, TableUpdate};

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::journal_entry::DenominationRecord;
use super::shift::RakeCollection;
use super::tables::CreditAccount;
use super::{
    ChipMovement, Denomination, JournalEntry, Ledger, MovementEngine, PaymentMethod, PlayerId,
    PlayerSeat, RoomPolicy, SeatId, SessionId, Shift, ShiftId, ShiftState, Table, TableId,
    TableSession,
};
use crate::domain::Money;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Highest id handed out so far, per entity kind.
#[derive(Debug, Clone, Copy, Default)]
struct LastIds {
    denomination: i64,
    table: i64,
    session: i64,
    seat: i64,
    shift: i64,
}

fn bump(slot: &mut i64, id: i64) {
    *slot = (*slot).max(id);
}

#[derive(Debug, Clone, Default)]
pub struct Room {
    policy: RoomPolicy,
    engine: MovementEngine,
    tables: BTreeMap<TableId, Table>,
    sessions: BTreeMap<SessionId, TableSession>,
    seats: BTreeMap<SeatId, PlayerSeat>,
    shifts: BTreeMap<ShiftId, Shift>,
    open_shift: Option<ShiftId>,
    credit: BTreeMap<PlayerId, CreditAccount>,
    rakes: Vec<RakeCollection>,
    last_ids: LastIds,
}

impl Room {
    pub fn new(policy: RoomPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Rebuild a room by applying `entries` in order to an empty state.
    pub fn replay<'a>(
        policy: RoomPolicy,
        entries: impl IntoIterator<Item = &'a JournalEntry>,
    ) -> Result<Self, DomainError> {
        let mut room = Self::new(policy);
        for entry in entries {
            room.apply(entry)?;
        }
        Ok(room)
    }

    pub fn policy(&self) -> &RoomPolicy {
        &self.policy
    }

    pub fn ledger(&self) -> &Ledger {
        self.engine.ledger()
    }

    pub fn movements(&self) -> &[ChipMovement] {
        self.engine.log()
    }

    pub fn open_shift_id(&self) -> Option<ShiftId> {
        self.open_shift
    }

    /// The open shift, without a handle check.
    pub fn active_shift(&self) -> Result<&Shift, DomainError> {
        self.open_shift
            .and_then(|id| self.shifts.get(&id))
            .ok_or(DomainError::NoActiveShift)
    }

    pub fn shift(&self, id: ShiftId) -> Option<&Shift> {
        self.shifts.get(&id)
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn session(&self, id: SessionId) -> Option<&TableSession> {
        self.sessions.get(&id)
    }

    pub fn seat(&self, id: SeatId) -> Option<&PlayerSeat> {
        self.seats.get(&id)
    }

    pub fn credit_account(&self, player_id: PlayerId) -> Option<&CreditAccount> {
        self.credit.get(&player_id)
    }

    pub fn rakes(&self) -> &[RakeCollection] {
        &self.rakes
    }

    pub fn active_sessions(&self) -> impl Iterator<Item = &TableSession> {
        self.sessions.values().filter(|s| s.is_active())
    }

    pub fn open_seats(&self) -> impl Iterator<Item = &PlayerSeat> {
        self.seats.values().filter(|s| s.is_open())
    }

    /// Validate a shift handle against the open shift.
    pub fn require_open_shift(&self, given: ShiftId) -> Result<&Shift, DomainError> {
        let open = self.active_shift()?;
        if open.id != given {
            return Err(DomainError::ShiftMismatch {
                open: open.id,
                given,
            });
        }
        Ok(open)
    }

    fn require_table(&self, id: TableId) -> Result<&Table, DomainError> {
        self.tables
            .get(&id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Table, format!("table {id}")))
    }

    fn require_session(&self, id: SessionId) -> Result<&TableSession, DomainError> {
        self.sessions.get(&id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Session, format!("session {id}"))
        })
    }

    fn require_active_session(&self, id: SessionId) -> Result<&TableSession, DomainError> {
        let session = self.require_session(id)?;
        if !session.is_active() {
            return Err(DomainError::SessionNotActive(id));
        }
        Ok(session)
    }

    fn require_open_seat(&self, id: SeatId) -> Result<&PlayerSeat, DomainError> {
        let seat = self
            .seats
            .get(&id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Seat, format!("seat {id}")))?;
        if !seat.is_open() {
            return Err(DomainError::SeatAlreadyClosed(id));
        }
        Ok(seat)
    }

    fn active_session_for_table(&self, table_id: TableId) -> Option<&TableSession> {
        self.sessions
            .values()
            .find(|s| s.table_id == table_id && s.is_active())
    }

    /// Warnings for a credit charge; an error instead when the policy is strict.
    fn credit_check(
        &self,
        player_id: PlayerId,
        method: PaymentMethod,
        amount: Money,
    ) -> Result<Vec<String>, DomainError> {
        if method != PaymentMethod::Credito {
            return Ok(Vec::new());
        }
        let (limit, balance) = self
            .credit
            .get(&player_id)
            .map(|a| (a.limit, a.balance))
            .unwrap_or((Money::ZERO, Money::ZERO));
        let balance_after = balance + amount;
        if balance_after <= limit {
            return Ok(Vec::new());
        }

        let exceeded = DomainError::CreditLimitExceeded {
            player_id,
            limit,
            balance_after,
        };
        if self.policy.credit_strict {
            return Err(exceeded);
        }
        Ok(vec![exceeded.to_string()])
    }

    fn charge_credit(&mut self, player_id: PlayerId, method: PaymentMethod, amount: Money) {
        if method == PaymentMethod::Credito {
            self.credit
                .entry(player_id)
                .or_insert_with(|| CreditAccount::new(player_id))
                .charge(amount);
        }
    }

    fn check_standard_set(&self, records: &[DenominationRecord]) -> Result<(), DomainError> {
        if !self.ledger().is_empty() {
            return Err(DomainError::validation(
                "standard set can only be seeded into an empty inventory",
            ));
        }
        let mut seen = HashSet::new();
        let mut ids = HashSet::new();
        for record in records {
            if !ids.insert(record.id) {
                return Err(DomainError::validation(format!(
                    "denomination id {} already in use",
                    record.id
                )));
            }
            if record.face_value <= Money::ZERO {
                return Err(DomainError::validation(format!(
                    "face value must be positive, got {}",
                    record.face_value
                )));
            }
            if !seen.insert(record.face_value) {
                return Err(DomainError::DuplicateDenomination(record.face_value));
            }
        }
        Ok(())
    }

    fn register_denomination_record(&mut self, record: &DenominationRecord) -> Result<(), DomainError> {
        self.engine.register(Denomination::new(
            record.id,
            record.face_value,
            record.color.clone(),
            record.initial_vault,
        ))?;
        bump(&mut self.last_ids.denomination, record.id);
        Ok(())
    }

    /// Fold one entry into the state.
    ///
    /// All lookups and the ledger commit happen before any other field is
    /// written, so a rejected entry leaves the room unchanged.
    pub fn apply(&mut self, entry: &JournalEntry) -> Result<(), DomainError> {
        debug!(kind = entry.kind(), "apply journal entry");
        match entry {
            JournalEntry::DenominationRegistered { denomination } => {
                self.register_denomination_record(denomination)?;
            }
            JournalEntry::StandardSetSeeded { denominations } => {
                self.check_standard_set(denominations)?;
                for record in denominations {
                    self.register_denomination_record(record)?;
                }
            }
            JournalEntry::TableRegistered { table } => {
                if self.tables.contains_key(&table.id) {
                    return Err(DomainError::validation(format!(
                        "table id {} already in use",
                        table.id
                    )));
                }
                if self.tables.values().any(|t| t.number == table.number) {
                    return Err(DomainError::validation(format!(
                        "table number {} already exists",
                        table.number
                    )));
                }
                bump(&mut self.last_ids.table, table.id);
                self.tables.insert(table.id, table.clone());
            }
            JournalEntry::TableUpdated { table } => {
                self.require_table(table.id)?;
                self.tables.insert(table.id, table.clone());
            }
            JournalEntry::CreditLimitSet { player_id, limit } => {
                self.credit
                    .entry(*player_id)
                    .or_insert_with(|| CreditAccount::new(*player_id))
                    .limit = *limit;
            }
            JournalEntry::ShiftOpened { shift, movement } => {
                if let Some(open) = self.open_shift {
                    return Err(DomainError::ShiftAlreadyOpen(open));
                }
                if let Some(movement) = movement {
                    self.engine.commit(movement)?;
                }
                bump(&mut self.last_ids.shift, shift.id);
                self.open_shift = Some(shift.id);
                self.shifts.insert(shift.id, shift.clone());
            }
            JournalEntry::WithdrawalRecorded { movement } => {
                self.engine.commit(movement)?;
            }
            JournalEntry::SessionOpened { session } => {
                self.require_open_shift(session.shift_id)?;
                self.require_table(session.table_id)?;
                if let Some(active) = self.active_session_for_table(session.table_id) {
                    return Err(DomainError::TableOccupied {
                        table_id: session.table_id,
                        session_id: active.id,
                    });
                }
                bump(&mut self.last_ids.session, session.id);
                self.sessions.insert(session.id, session.clone());
            }
            JournalEntry::DealerAssigned {
                session_id,
                dealer_id,
                at,
            } => {
                self.require_active_session(*session_id)?;
                if let Some(session) = self.sessions.get_mut(session_id) {
                    session.assign_dealer(*dealer_id, *at);
                }
            }
            JournalEntry::PlayerSeated { seat, movement, .. } => {
                self.require_active_session(seat.session_id)?;
                if self.seats.contains_key(&seat.id) {
                    return Err(DomainError::validation(format!(
                        "seat id {} already in use",
                        seat.id
                    )));
                }
                self.engine.commit(movement)?;
                bump(&mut self.last_ids.seat, seat.id);
                self.charge_credit(seat.player_id, seat.payment_method, seat.buy_in_total);
                if let Some(session) = self.sessions.get_mut(&seat.session_id) {
                    session.seat_ids.push(seat.id);
                }
                self.seats.insert(seat.id, seat.clone());
            }
            JournalEntry::RebuyRecorded {
                seat_id,
                payment_method,
                movement,
                ..
            } => {
                let player_id = self.require_open_seat(*seat_id)?.player_id;
                self.engine.commit(movement)?;
                self.charge_credit(player_id, *payment_method, movement.total);
                if let Some(seat) = self.seats.get_mut(seat_id) {
                    seat.buy_in_total += movement.total;
                }
            }
            JournalEntry::CashedOut {
                seat_id,
                collection_method,
                movement,
                at,
            } => {
                self.require_open_seat(*seat_id)?;
                if let Some(movement) = movement {
                    self.engine.commit(movement)?;
                }
                if let Some(seat) = self.seats.get_mut(seat_id) {
                    seat.cash_out = Some(movement.as_ref().map_or(Money::ZERO, |m| m.total));
                    seat.collection_method = Some(*collection_method);
                    seat.exited_at = Some(*at);
                }
            }
            JournalEntry::SessionClosed { session_id, at } => {
                self.require_active_session(*session_id)?;
                if let Some(session) = self.sessions.get_mut(session_id) {
                    session.close(*at);
                }
            }
            JournalEntry::RakeRecorded { rake, movement } => {
                self.require_open_shift(rake.shift_id)?;
                self.require_session(rake.session_id)?;
                self.engine.commit(movement)?;
                if let Some(session) = self.sessions.get_mut(&rake.session_id) {
                    session.rake += rake.amount;
                }
                if let Some(shift) = self.shifts.get_mut(&rake.shift_id) {
                    shift.totals.rake += rake.amount;
                }
                self.rakes.push(rake.clone());
            }
            JournalEntry::FinancialEventRecorded { event } => {
                self.require_open_shift(event.shift_id)?;
                if let Some(shift) = self.shifts.get_mut(&event.shift_id) {
                    shift.totals.record(event.kind, event.amount);
                }
                if let (true, Some(player_id)) = (event.kind.is_collection(), event.player_id) {
                    if let Some(account) = self.credit.get_mut(&player_id) {
                        account.settle(event.amount);
                    }
                }
            }
            JournalEntry::ShiftClosed { shift_id, record } => {
                self.require_open_shift(*shift_id)?;
                if let Some(shift) = self.shifts.get_mut(shift_id) {
                    shift.state = ShiftState::Closed;
                    shift.close = Some(record.clone());
                }
                self.open_shift = None;
            }
        }
        Ok(())
    }
}
