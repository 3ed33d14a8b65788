//! Tables, their sessions, seated players and player credit accounts.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Money, PersonId, PlayerId, SeatId, SessionId, ShiftId, TableId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub number: u32,
    pub name: String,
    pub capacity: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Active,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealerAssignment {
    pub dealer_id: PersonId,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSession {
    pub id: SessionId,
    pub table_id: TableId,
    pub shift_id: ShiftId,
    pub stakes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    pub state: SessionState,
    pub dealers: Vec<DealerAssignment>,
    pub rake: Money,
    /// Seats in arrival order.
    pub seat_ids: Vec<SeatId>,
}

impl TableSession {
    pub fn new(
        id: SessionId,
        table_id: TableId,
        shift_id: ShiftId,
        stakes: String,
        started_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            table_id,
            shift_id,
            stakes,
            started_at,
            ended_at: None,
            state: SessionState::Active,
            dealers: Vec::new(),
            rake: Money::ZERO,
            seat_ids: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn current_dealer(&self) -> Option<PersonId> {
        self.dealers
            .last()
            .filter(|d| d.ended_at.is_none())
            .map(|d| d.dealer_id)
    }

    /// Ends the open assignment (if any) and starts `dealer_id`.
    pub(crate) fn assign_dealer(&mut self, dealer_id: PersonId, at: OffsetDateTime) {
        self.end_dealer(at);
        self.dealers.push(DealerAssignment {
            dealer_id,
            started_at: at,
            ended_at: None,
        });
    }

    fn end_dealer(&mut self, at: OffsetDateTime) {
        if let Some(open) = self.dealers.last_mut().filter(|d| d.ended_at.is_none()) {
            open.ended_at = Some(at);
        }
    }

    pub(crate) fn close(&mut self, at: OffsetDateTime) {
        self.end_dealer(at);
        self.ended_at = Some(at);
        self.state = SessionState::Closed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Efectivo,
    Tarjeta,
    Credito,
    Transferencia,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeat {
    pub id: SeatId,
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub seat_number: Option<u32>,
    #[serde(with = "time::serde::rfc3339")]
    pub entered_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub exited_at: Option<OffsetDateTime>,
    pub buy_in_total: Money,
    pub cash_out: Option<Money>,
    pub payment_method: PaymentMethod,
    pub collection_method: Option<PaymentMethod>,
}

impl PlayerSeat {
    pub fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }

    /// `cash_out − buy_in_total`, once the player has left.
    pub fn result(&self) -> Option<Money> {
        self.cash_out.map(|out| out - self.buy_in_total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAccount {
    pub player_id: PlayerId,
    pub limit: Money,
    pub balance: Money,
}

impl CreditAccount {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            limit: Money::ZERO,
            balance: Money::ZERO,
        }
    }

    pub fn available(&self) -> Money {
        self.limit - self.balance
    }

    pub(crate) fn charge(&mut self, amount: Money) {
        self.balance += amount;
    }

    /// Lowers the balance, never below zero. Returns the amount applied.
    pub(crate) fn settle(&mut self, amount: Money) -> Money {
        let applied = amount.min(self.balance);
        self.balance -= applied;
        applied
    }
}
