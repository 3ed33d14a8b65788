//! Test-only room harness: runs decide + apply and keeps the journal.

use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::domain::{
    ChipLine, DenominationId, JournalEntry, Money, OpenShift, PaymentMethod, Room, RoomPolicy,
    SeatId, SeatRequest, SessionId, ShiftId, TableId,
};
use crate::errors::domain::DomainError;

pub struct Harness {
    pub room: Room,
    pub journal: Vec<JournalEntry>,
    clock: OffsetDateTime,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(RoomPolicy::default())
    }

    pub fn with_policy(policy: RoomPolicy) -> Self {
        Self {
            room: Room::new(policy),
            journal: Vec::new(),
            clock: datetime!(2026-01-10 20:00 UTC),
        }
    }

    /// Advances the fake clock by one minute per call.
    pub fn now(&mut self) -> OffsetDateTime {
        self.clock += Duration::minutes(1);
        self.clock
    }

    pub fn run(
        &mut self,
        decide: impl FnOnce(&Room, OffsetDateTime) -> Result<JournalEntry, DomainError>,
    ) -> Result<JournalEntry, DomainError> {
        let at = self.now();
        let entry = decide(&self.room, at)?;
        self.room.apply(&entry)?;
        self.journal.push(entry.clone());
        Ok(entry)
    }

    pub fn ok(
        &mut self,
        decide: impl FnOnce(&Room, OffsetDateTime) -> Result<JournalEntry, DomainError>,
    ) -> JournalEntry {
        self.run(decide).expect("operation should succeed")
    }

    pub fn register(&mut self, face: i64, vault: u64) -> DenominationId {
        match self.ok(|r, _| r.register_denomination(Money::from(face), None, vault)) {
            JournalEntry::DenominationRegistered { denomination } => denomination.id,
            other => panic!("unexpected entry {other:?}"),
        }
    }

    pub fn table(&mut self, number: u32) -> TableId {
        match self.ok(|r, _| r.register_table(number, format!("Mesa {number}"), 9)) {
            JournalEntry::TableRegistered { table } => table.id,
            other => panic!("unexpected entry {other:?}"),
        }
    }

    pub fn open_shift(&mut self, opening_lines: Vec<ChipLine>) -> ShiftId {
        let request = OpenShift {
            cashier_ids: vec![7],
            dealer_ids: vec![21, 22],
            opening_lines,
            ..OpenShift::default()
        };
        match self.ok(|r, at| r.open_shift(request, at)) {
            JournalEntry::ShiftOpened { shift, .. } => shift.id,
            other => panic!("unexpected entry {other:?}"),
        }
    }

    pub fn open_session(&mut self, shift_id: ShiftId, table_id: TableId) -> SessionId {
        match self.ok(|r, at| r.open_session(shift_id, table_id, "5/10".to_string(), at)) {
            JournalEntry::SessionOpened { session } => session.id,
            other => panic!("unexpected entry {other:?}"),
        }
    }

    pub fn seat(
        &mut self,
        shift_id: ShiftId,
        session_id: SessionId,
        player_id: i64,
        lines: Vec<ChipLine>,
        payment_method: PaymentMethod,
    ) -> SeatId {
        let request = SeatRequest {
            session_id,
            player_id,
            seat_number: None,
            lines,
            payment_method,
        };
        match self.ok(|r, at| r.seat_player(shift_id, request, at)) {
            JournalEntry::PlayerSeated { seat, .. } => seat.id,
            other => panic!("unexpected entry {other:?}"),
        }
    }
}

/// Room with a single $5 denomination: 1000 in the vault, a shift opened with
/// 100 chips ($500) in the register and one active session on table 1.
pub struct FiveDollarRoom {
    pub h: Harness,
    pub five: DenominationId,
    pub shift: ShiftId,
    pub table: TableId,
    pub session: SessionId,
}

impl FiveDollarRoom {
    pub fn new() -> Self {
        Self::with_policy(RoomPolicy::default())
    }

    pub fn with_policy(policy: RoomPolicy) -> Self {
        let mut h = Harness::with_policy(policy);
        let five = h.register(5, 1000);
        let table = h.table(1);
        let shift = h.open_shift(vec![ChipLine::new(five, 100)]);
        let session = h.open_session(shift, table);
        Self {
            h,
            five,
            shift,
            table,
            session,
        }
    }

    pub fn fives(&self, quantity: u64) -> Vec<ChipLine> {
        vec![ChipLine::new(self.five, quantity)]
    }

    /// Seat `player_id` in the fixture session with a buy-in of `quantity` fives.
    pub fn seat(&mut self, player_id: i64, quantity: u64, method: PaymentMethod) -> SeatId {
        let lines = self.fives(quantity);
        self.h
            .seat(self.shift, self.session, player_id, lines, method)
    }
}
