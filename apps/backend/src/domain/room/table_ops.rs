use time::OffsetDateTime;

use super::Room;
use crate::domain::movement::TransferRequest;
use crate::domain::{
    ChipLine, JournalEntry, Location, Money, MovementLinkage, MovementReason, PaymentMethod,
    PersonId, PlayerId, PlayerSeat, SeatId, SessionId, ShiftId, Table, TableId, TableSession,
    MAX_AMOUNT,
};
use crate::errors::domain::DomainError;

/// Arguments for seating a player.
#[derive(Debug, Clone)]
pub struct SeatRequest {
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub seat_number: Option<u32>,
    pub lines: Vec<ChipLine>,
    pub payment_method: PaymentMethod,
}

/// Partial table update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TableUpdate {
    pub name: Option<String>,
    pub capacity: Option<u32>,
    pub active: Option<bool>,
}

fn check_capacity(capacity: u32) -> Result<(), DomainError> {
    if capacity == 0 {
        return Err(DomainError::validation("capacity must be at least 1"));
    }
    Ok(())
}

impl Room {
    pub fn register_table(
        &self,
        number: u32,
        name: String,
        capacity: u32,
    ) -> Result<JournalEntry, DomainError> {
        check_capacity(capacity)?;
        if self.tables.values().any(|t| t.number == number) {
            return Err(DomainError::validation(format!(
                "table number {number} already exists"
            )));
        }

        Ok(JournalEntry::TableRegistered {
            table: Table {
                id: self.last_ids.table + 1,
                number,
                name,
                capacity,
                active: true,
            },
        })
    }

    pub fn update_table(
        &self,
        table_id: TableId,
        update: TableUpdate,
    ) -> Result<JournalEntry, DomainError> {
        let mut table = self.require_table(table_id)?.clone();
        if let Some(capacity) = update.capacity {
            check_capacity(capacity)?;
            table.capacity = capacity;
        }
        if let Some(name) = update.name {
            table.name = name;
        }
        if let Some(active) = update.active {
            if !active {
                if let Some(session) = self.active_session_for_table(table_id) {
                    return Err(DomainError::TableOccupied {
                        table_id,
                        session_id: session.id,
                    });
                }
            }
            table.active = active;
        }
        Ok(JournalEntry::TableUpdated { table })
    }

    pub fn set_credit_limit(
        &self,
        player_id: PlayerId,
        limit: Money,
    ) -> Result<JournalEntry, DomainError> {
        if limit < Money::ZERO {
            return Err(DomainError::validation(format!(
                "credit limit cannot be negative, got {limit}"
            )));
        }
        if limit > MAX_AMOUNT {
            return Err(DomainError::validation(format!(
                "credit limit {limit} exceeds the maximum of {MAX_AMOUNT}"
            )));
        }
        Ok(JournalEntry::CreditLimitSet { player_id, limit })
    }

    pub fn open_session(
        &self,
        shift_id: ShiftId,
        table_id: TableId,
        stakes: String,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.require_open_shift(shift_id)?;
        let table = self.require_table(table_id)?;
        if !table.active {
            return Err(DomainError::TableInactive(table_id));
        }
        if let Some(active) = self.active_session_for_table(table_id) {
            return Err(DomainError::TableOccupied {
                table_id,
                session_id: active.id,
            });
        }

        let session = TableSession::new(self.last_ids.session + 1, table_id, shift_id, stakes, at);
        Ok(JournalEntry::SessionOpened { session })
    }

    pub fn assign_dealer(
        &self,
        shift_id: ShiftId,
        session_id: SessionId,
        dealer_id: PersonId,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.require_open_shift(shift_id)?;
        self.require_active_session(session_id)?;
        Ok(JournalEntry::DealerAssigned {
            session_id,
            dealer_id,
            at,
        })
    }

    /// Cash → circulation buy-in for a new seat.
    pub fn seat_player(
        &self,
        shift_id: ShiftId,
        request: SeatRequest,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.require_open_shift(shift_id)?;
        let session = self.require_active_session(request.session_id)?;
        let already_seated = session
            .seat_ids
            .iter()
            .filter_map(|id| self.seats.get(id))
            .any(|s| s.player_id == request.player_id && s.is_open());
        if already_seated {
            return Err(DomainError::PlayerAlreadySeated {
                player_id: request.player_id,
                session_id: request.session_id,
            });
        }

        let seat_id = self.last_ids.seat + 1;
        let transfer = TransferRequest::new(
            Location::Cash,
            Location::Circulation,
            request.lines,
            MovementReason::BuyIn,
        )
        .in_shift(Some(shift_id))
        .linked(MovementLinkage::seat(request.session_id, seat_id));
        let movement = self.engine.plan(transfer, at)?;
        let warnings =
            self.credit_check(request.player_id, request.payment_method, movement.total)?;

        let seat = PlayerSeat {
            id: seat_id,
            session_id: request.session_id,
            player_id: request.player_id,
            seat_number: request.seat_number,
            entered_at: at,
            exited_at: None,
            buy_in_total: movement.total,
            cash_out: None,
            payment_method: request.payment_method,
            collection_method: None,
        };
        Ok(JournalEntry::PlayerSeated {
            seat,
            movement,
            warnings,
        })
    }

    pub fn rebuy(
        &self,
        shift_id: ShiftId,
        seat_id: SeatId,
        lines: Vec<ChipLine>,
        payment_method: PaymentMethod,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.require_open_shift(shift_id)?;
        let seat = self.require_open_seat(seat_id)?;
        self.require_active_session(seat.session_id)?;

        let transfer = TransferRequest::new(
            Location::Cash,
            Location::Circulation,
            lines,
            MovementReason::Rebuy,
        )
        .in_shift(Some(shift_id))
        .linked(MovementLinkage::seat(seat.session_id, seat_id));
        let movement = self.engine.plan(transfer, at)?;
        let warnings = self.credit_check(seat.player_id, payment_method, movement.total)?;

        Ok(JournalEntry::RebuyRecorded {
            seat_id,
            payment_method,
            movement,
            warnings,
        })
    }

    /// Circulation → cash return of the chips the player leaves with. An empty
    /// line set records a zero cash-out without a movement.
    pub fn cash_out(
        &self,
        shift_id: ShiftId,
        seat_id: SeatId,
        lines: Vec<ChipLine>,
        collection_method: PaymentMethod,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.require_open_shift(shift_id)?;
        let seat = self.require_open_seat(seat_id)?;

        let movement = if lines.is_empty() {
            None
        } else {
            let transfer = TransferRequest::new(
                Location::Circulation,
                Location::Cash,
                lines,
                MovementReason::CashOut,
            )
            .in_shift(Some(shift_id))
            .linked(MovementLinkage::seat(seat.session_id, seat_id));
            Some(self.engine.plan(transfer, at)?)
        };

        Ok(JournalEntry::CashedOut {
            seat_id,
            collection_method,
            movement,
            at,
        })
    }

    pub fn close_session(
        &self,
        shift_id: ShiftId,
        session_id: SessionId,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.require_open_shift(shift_id)?;
        let session = self.require_active_session(session_id)?;
        let open_seats = session
            .seat_ids
            .iter()
            .filter_map(|id| self.seats.get(id))
            .filter(|s| s.is_open())
            .count();
        if open_seats > 0 {
            return Err(DomainError::OpenSeatsRemaining {
                session_id,
                open_seats,
            });
        }
        Ok(JournalEntry::SessionClosed { session_id, at })
    }
}
