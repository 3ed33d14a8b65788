//! Shift lifecycle state: the open/closed record, its running totals and the
//! permanent close record.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::{ClosingPreview, Money, PersonId, PlayerId, SessionId, ShiftId, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftState {
    Open,
    Closed,
}

/// Money events reported by the sales, credit, expense and tips subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialEventKind {
    CashSale,
    CardSale,
    CashCollection,
    CardCollection,
    Expense,
    TipRecorded,
    TipPaid,
}

impl FinancialEventKind {
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            FinancialEventKind::CashCollection | FinancialEventKind::CardCollection
        )
    }
}

/// Running aggregates of an open shift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftTotals {
    pub cash_sales: Money,
    pub card_sales: Money,
    pub cash_collections: Money,
    pub card_collections: Money,
    pub rake: Money,
    pub tips: Money,
    pub tips_paid: Money,
    pub expenses: Money,
}

impl ShiftTotals {
    pub fn record(&mut self, kind: FinancialEventKind, amount: Money) {
        let slot = match kind {
            FinancialEventKind::CashSale => &mut self.cash_sales,
            FinancialEventKind::CardSale => &mut self.card_sales,
            FinancialEventKind::CashCollection => &mut self.cash_collections,
            FinancialEventKind::CardCollection => &mut self.card_collections,
            FinancialEventKind::Expense => &mut self.expenses,
            FinancialEventKind::TipRecorded => &mut self.tips,
            FinancialEventKind::TipPaid => &mut self.tips_paid,
        };
        *slot += amount;
    }

    /// Currency the register should hold from recorded cash events alone.
    pub fn currency_balance(&self) -> Money {
        self.cash_sales + self.cash_collections - self.expenses - self.tips_paid
    }
}

/// One rake pickup from a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RakeCollection {
    pub shift_id: ShiftId,
    pub session_id: SessionId,
    pub table_id: TableId,
    pub dealer_id: Option<PersonId>,
    pub amount: Money,
    pub movement_id: i64,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

/// Permanent record written when a shift closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub closed_at: OffsetDateTime,
    pub forced: bool,
    /// Blocking problems that a forced close overrode.
    pub bypassed_problems: Vec<String>,
    pub notes: Option<String>,
    pub preview: ClosingPreview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub business_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub opened_at: OffsetDateTime,
    pub state: ShiftState,
    pub opening_cash: Money,
    pub cashier_ids: Vec<PersonId>,
    pub dealer_ids: Vec<PersonId>,
    pub notes: Option<String>,
    pub totals: ShiftTotals,
    pub close: Option<CloseRecord>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.state == ShiftState::Open
    }
}

/// A financial event as reported to the shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialEvent {
    pub shift_id: ShiftId,
    pub kind: FinancialEventKind,
    pub amount: Money,
    pub player_id: Option<PlayerId>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}
