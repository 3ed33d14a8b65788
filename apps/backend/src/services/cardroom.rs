//! Card-room service: serializes every mutating operation on the room.
//!
//! Each call takes the room lock, asks the room to decide, hands the
//! resulting entry to the journal, applies it and releases the lock. The
//! journal append is a non-blocking send, so no I/O happens under the lock.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use super::journal::{Journal, MemoryJournal};
use crate::domain::room::{
    ActiveSessionView, ActiveShiftView, CashAlert, DealerView, InventoryView, OpenPreview,
    SessionDetail, ShiftStatistics,
};
use crate::domain::{
    ChipLine, ChipMovement, ClosingPreview, CreditAccount, Denomination, FinancialEventKind,
    JournalEntry, Money, OpenShift, PaymentMethod, PersonId, PlayerId, PlayerSeat,
    RakeCollection, Room, RoomPolicy, SeatId, SeatRequest, SessionId, Shift, ShiftId,
    ShiftTotals, Table, TableId, TableSession, TableUpdate,
};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

const EVENT_CAPACITY: usize = 256;

/// Result of a seat operation (buy-in, rebuy, cash-out).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatOutcome {
    #[serde(rename = "jugador")]
    pub seat: PlayerSeat,
    #[serde(rename = "movimiento")]
    pub movement: Option<ChipMovement>,
    #[serde(rename = "advertencias")]
    pub warnings: Vec<String>,
}

pub struct CardroomService {
    room: Mutex<Room>,
    journal: Arc<dyn Journal>,
    events: broadcast::Sender<JournalEntry>,
}

fn unexpected(entry: &JournalEntry) -> DomainError {
    DomainError::infra(
        InfraErrorKind::Other("projection".to_string()),
        format!("unexpected journal entry {}", entry.kind()),
    )
}

fn missing(kind: NotFoundKind, what: String) -> DomainError {
    DomainError::not_found(kind, what)
}

impl CardroomService {
    pub fn new(room: Room, journal: Arc<dyn Journal>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            room: Mutex::new(room),
            journal,
            events,
        }
    }

    /// Empty room backed by a [`MemoryJournal`].
    pub fn in_memory(policy: RoomPolicy) -> Self {
        Self::new(Room::new(policy), Arc::new(MemoryJournal::new()))
    }

    /// Journal entries as they are applied. Lagging receivers miss entries.
    pub fn subscribe(&self) -> broadcast::Receiver<JournalEntry> {
        self.events.subscribe()
    }

    pub fn journal_backend(&self) -> &'static str {
        self.journal.backend()
    }

    /// False once the journal stopped accepting entries; every mutation then
    /// fails with `JournalUnavailable`.
    pub fn journal_available(&self) -> bool {
        self.journal.is_available()
    }

    fn execute<T>(
        &self,
        op: &'static str,
        decide: impl FnOnce(&Room, OffsetDateTime) -> Result<JournalEntry, DomainError>,
        project: impl FnOnce(&Room, &JournalEntry) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut room = self.room.lock();
        let entry = decide(&room, OffsetDateTime::now_utc())?;

        if let Err(e) = self.journal.append(&entry) {
            error!(op, kind = entry.kind(), error = %e, "journal append failed");
            return Err(e);
        }
        if let Err(e) = room.apply(&entry) {
            error!(op, kind = entry.kind(), error = %e, "journaled entry failed to apply");
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("{op}: {e}"),
            ));
        }
        let outcome = project(&room, &entry);
        drop(room);

        match entry.movement() {
            Some(m) => info!(
                op,
                kind = entry.kind(),
                movement_id = m.id,
                shift_id = ?m.shift_id,
                session_id = ?m.linkage.session_id,
                seat_id = ?m.linkage.seat_id,
                total = %m.total,
                "operation applied"
            ),
            None => info!(op, kind = entry.kind(), "operation applied"),
        }
        for warning in entry.warnings() {
            warn!(op, warning = %warning, "operation applied with warning");
        }
        if self.events.receiver_count() > 0 {
            // only fails when every receiver has gone away in the meantime
            let _ = self.events.send(entry);
        }
        outcome
    }

    fn read<T>(&self, f: impl FnOnce(&Room) -> T) -> T {
        f(&self.room.lock())
    }

    // ----- chips -----

    pub fn register_denomination(
        &self,
        face_value: Money,
        color: Option<String>,
        initial_vault: u64,
    ) -> Result<Denomination, DomainError> {
        self.execute(
            "register_denomination",
            |room, _| room.register_denomination(face_value, color, initial_vault),
            |room, entry| match entry {
                JournalEntry::DenominationRegistered { denomination } => room
                    .ledger()
                    .get(denomination.id)
                    .cloned()
                    .ok_or_else(|| unexpected(entry)),
                _ => Err(unexpected(entry)),
            },
        )
    }

    pub fn seed_standard_set(&self) -> Result<InventoryView, DomainError> {
        self.execute(
            "seed_standard_set",
            |room, _| room.seed_standard_set(),
            |room, _| Ok(room.inventory()),
        )
    }

    pub fn manual_withdrawal(
        &self,
        lines: Vec<ChipLine>,
        note: Option<String>,
    ) -> Result<ChipMovement, DomainError> {
        self.execute(
            "manual_withdrawal",
            |room, at| room.manual_withdrawal(lines, note, at),
            |_, entry| entry.movement().cloned().ok_or_else(|| unexpected(entry)),
        )
    }

    pub fn standard_withdrawal(&self) -> Result<ChipMovement, DomainError> {
        self.execute(
            "standard_withdrawal",
            |room, at| room.standard_withdrawal(at),
            |_, entry| entry.movement().cloned().ok_or_else(|| unexpected(entry)),
        )
    }

    // ----- tables and credit -----

    pub fn register_table(
        &self,
        number: u32,
        name: String,
        capacity: u32,
    ) -> Result<Table, DomainError> {
        self.execute(
            "register_table",
            |room, _| room.register_table(number, name, capacity),
            |_, entry| match entry {
                JournalEntry::TableRegistered { table } => Ok(table.clone()),
                _ => Err(unexpected(entry)),
            },
        )
    }

    pub fn update_table(&self, table_id: TableId, update: TableUpdate) -> Result<Table, DomainError> {
        self.execute(
            "update_table",
            |room, _| room.update_table(table_id, update),
            |_, entry| match entry {
                JournalEntry::TableUpdated { table } => Ok(table.clone()),
                _ => Err(unexpected(entry)),
            },
        )
    }

    pub fn set_credit_limit(
        &self,
        player_id: PlayerId,
        limit: Money,
    ) -> Result<CreditAccount, DomainError> {
        self.execute(
            "set_credit_limit",
            |room, _| room.set_credit_limit(player_id, limit),
            |room, _| {
                room.credit_account(player_id)
                    .cloned()
                    .ok_or_else(|| missing(NotFoundKind::Player, format!("player {player_id}")))
            },
        )
    }

    // ----- shift -----

    pub fn open_shift(&self, request: OpenShift) -> Result<Shift, DomainError> {
        self.execute(
            "open_shift",
            |room, at| room.open_shift(request, at),
            |_, entry| match entry {
                JournalEntry::ShiftOpened { shift, .. } => Ok(shift.clone()),
                _ => Err(unexpected(entry)),
            },
        )
    }

    pub fn record_financial_event(
        &self,
        shift_id: ShiftId,
        kind: FinancialEventKind,
        amount: Money,
        player_id: Option<PlayerId>,
        notes: Option<String>,
    ) -> Result<ShiftTotals, DomainError> {
        self.execute(
            "record_financial_event",
            |room, at| room.record_financial_event(shift_id, kind, amount, player_id, notes, at),
            |room, _| {
                room.shift(shift_id)
                    .map(|s| s.totals.clone())
                    .ok_or_else(|| missing(NotFoundKind::Shift, format!("shift {shift_id}")))
            },
        )
    }

    pub fn record_rake(
        &self,
        shift_id: ShiftId,
        session_id: SessionId,
        dealer_id: Option<PersonId>,
        lines: Vec<ChipLine>,
        notes: Option<String>,
    ) -> Result<RakeCollection, DomainError> {
        self.execute(
            "record_rake",
            |room, at| room.record_rake(shift_id, session_id, dealer_id, lines, notes, at),
            |_, entry| match entry {
                JournalEntry::RakeRecorded { rake, .. } => Ok(rake.clone()),
                _ => Err(unexpected(entry)),
            },
        )
    }

    pub fn close_shift(
        &self,
        shift_id: ShiftId,
        force: bool,
        notes: Option<String>,
        counted_currency: Option<Money>,
    ) -> Result<Shift, DomainError> {
        let shift = self.execute(
            "close_shift",
            |room, at| room.close_shift(shift_id, force, notes, counted_currency, at),
            |room, _| {
                room.shift(shift_id)
                    .cloned()
                    .ok_or_else(|| missing(NotFoundKind::Shift, format!("shift {shift_id}")))
            },
        )?;
        if let Some(record) = shift.close.as_ref().filter(|r| r.forced) {
            warn!(
                shift_id,
                problems = ?record.bypassed_problems,
                "shift force-closed with unresolved problems"
            );
        }
        Ok(shift)
    }

    // ----- table sessions -----

    pub fn open_session(
        &self,
        shift_id: ShiftId,
        table_id: TableId,
        stakes: String,
    ) -> Result<TableSession, DomainError> {
        self.execute(
            "open_session",
            |room, at| room.open_session(shift_id, table_id, stakes, at),
            |_, entry| match entry {
                JournalEntry::SessionOpened { session } => Ok(session.clone()),
                _ => Err(unexpected(entry)),
            },
        )
    }

    pub fn assign_dealer(
        &self,
        shift_id: ShiftId,
        session_id: SessionId,
        dealer_id: PersonId,
    ) -> Result<TableSession, DomainError> {
        self.execute(
            "assign_dealer",
            |room, at| room.assign_dealer(shift_id, session_id, dealer_id, at),
            |room, _| session_of(room, session_id),
        )
    }

    pub fn seat_player(
        &self,
        shift_id: ShiftId,
        request: SeatRequest,
    ) -> Result<SeatOutcome, DomainError> {
        self.execute(
            "seat_player",
            |room, at| room.seat_player(shift_id, request, at),
            |room, entry| match entry {
                JournalEntry::PlayerSeated { seat, .. } => seat_outcome(room, seat.id, entry),
                _ => Err(unexpected(entry)),
            },
        )
    }

    pub fn rebuy(
        &self,
        shift_id: ShiftId,
        seat_id: SeatId,
        lines: Vec<ChipLine>,
        payment_method: PaymentMethod,
    ) -> Result<SeatOutcome, DomainError> {
        self.execute(
            "rebuy",
            |room, at| room.rebuy(shift_id, seat_id, lines, payment_method, at),
            |room, entry| seat_outcome(room, seat_id, entry),
        )
    }

    pub fn cash_out(
        &self,
        shift_id: ShiftId,
        seat_id: SeatId,
        lines: Vec<ChipLine>,
        collection_method: PaymentMethod,
    ) -> Result<SeatOutcome, DomainError> {
        self.execute(
            "cash_out",
            |room, at| room.cash_out(shift_id, seat_id, lines, collection_method, at),
            |room, entry| seat_outcome(room, seat_id, entry),
        )
    }

    pub fn close_session(
        &self,
        shift_id: ShiftId,
        session_id: SessionId,
    ) -> Result<TableSession, DomainError> {
        self.execute(
            "close_session",
            |room, at| room.close_session(shift_id, session_id, at),
            |room, _| session_of(room, session_id),
        )
    }

    // ----- queries -----

    /// Handle of the open shift, for routes addressed at "the active shift".
    pub fn active_shift_id(&self) -> Result<ShiftId, DomainError> {
        self.read(|room| room.open_shift_id().ok_or(DomainError::NoActiveShift))
    }

    pub fn preview_close(&self, counted_currency: Option<Money>) -> Result<ClosingPreview, DomainError> {
        self.read(|room| room.preview_close(counted_currency))
    }

    pub fn preview_open(&self) -> OpenPreview {
        self.read(Room::preview_open)
    }

    pub fn active_shift(&self) -> ActiveShiftView {
        self.read(Room::active_shift_view)
    }

    pub fn closed_shifts(&self) -> Vec<Shift> {
        self.read(|room| room.closed_shifts().into_iter().cloned().collect())
    }

    pub fn statistics(&self, shift_id: ShiftId) -> Result<ShiftStatistics, DomainError> {
        self.read(|room| room.statistics(shift_id))
    }

    pub fn active_rakes(&self) -> Result<Vec<RakeCollection>, DomainError> {
        self.read(Room::active_rakes)
    }

    pub fn dealers(&self) -> Result<Vec<DealerView>, DomainError> {
        self.read(Room::dealers)
    }

    pub fn inventory(&self) -> InventoryView {
        self.read(Room::inventory)
    }

    pub fn cash_alert(&self) -> CashAlert {
        self.read(Room::cash_alert)
    }

    pub fn tables(&self) -> Vec<Table> {
        self.read(|room| room.tables().cloned().collect())
    }

    pub fn active_sessions(&self) -> Vec<ActiveSessionView> {
        self.read(Room::active_session_views)
    }

    pub fn session_detail(&self, session_id: SessionId) -> Result<SessionDetail, DomainError> {
        self.read(|room| room.session_detail(session_id))
    }

    pub fn seat(&self, seat_id: SeatId) -> Result<PlayerSeat, DomainError> {
        self.read(|room| room.seat(seat_id).cloned())
            .ok_or_else(|| missing(NotFoundKind::Seat, format!("seat {seat_id}")))
    }
}

fn session_of(room: &Room, session_id: SessionId) -> Result<TableSession, DomainError> {
    room.session(session_id)
        .cloned()
        .ok_or_else(|| missing(NotFoundKind::Session, format!("session {session_id}")))
}

fn seat_outcome(
    room: &Room,
    seat_id: SeatId,
    entry: &JournalEntry,
) -> Result<SeatOutcome, DomainError> {
    let seat = room
        .seat(seat_id)
        .cloned()
        .ok_or_else(|| missing(NotFoundKind::Seat, format!("seat {seat_id}")))?;
    Ok(SeatOutcome {
        seat,
        movement: entry.movement().cloned(),
        warnings: entry.warnings().to_vec(),
    })
}
