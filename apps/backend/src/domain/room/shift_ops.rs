use time::{Date, OffsetDateTime};

use super::Room;
use crate::domain::movement::TransferRequest;
use crate::domain::reconciliation::{self, ReconciliationInput};
use crate::domain::shift::{CloseRecord, FinancialEvent, RakeCollection};
use crate::domain::{
    ChipLine, ClosingPreview, FinancialEventKind, JournalEntry, Location, Money, MovementLinkage,
    MovementReason, PersonId, PlayerId, SessionId, Shift, ShiftId, ShiftState, ShiftTotals,
    MAX_AMOUNT,
};
use crate::errors::domain::DomainError;

/// Arguments for opening a shift.
#[derive(Debug, Clone, Default)]
pub struct OpenShift {
    pub cashier_ids: Vec<PersonId>,
    pub dealer_ids: Vec<PersonId>,
    /// Chips moved from the vault to the register to start the shift.
    pub opening_lines: Vec<ChipLine>,
    pub notes: Option<String>,
    /// Defaults to the calendar date of the opening instant.
    pub business_date: Option<Date>,
}

impl Room {
    pub fn open_shift(
        &self,
        request: OpenShift,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        if let Some(open) = self.open_shift {
            return Err(DomainError::ShiftAlreadyOpen(open));
        }
        if self.ledger().is_empty() {
            return Err(DomainError::NoChipsRegistered);
        }

        let shift_id = self.last_ids.shift + 1;
        let movement = if request.opening_lines.is_empty() {
            None
        } else {
            let transfer = TransferRequest::new(
                Location::Vault,
                Location::Cash,
                request.opening_lines,
                MovementReason::OpeningTransfer,
            )
            .in_shift(Some(shift_id))
            .with_note(request.notes.clone());
            Some(self.engine.plan(transfer, at)?)
        };

        let opening_cash =
            self.ledger().value(Location::Cash) + movement.as_ref().map_or(Money::ZERO, |m| m.total);

        let shift = Shift {
            id: shift_id,
            business_date: request.business_date.unwrap_or_else(|| at.date()),
            opened_at: at,
            state: ShiftState::Open,
            opening_cash,
            cashier_ids: request.cashier_ids,
            dealer_ids: request.dealer_ids,
            notes: request.notes,
            totals: ShiftTotals::default(),
            close: None,
        };
        Ok(JournalEntry::ShiftOpened { shift, movement })
    }

    pub fn record_financial_event(
        &self,
        shift_id: ShiftId,
        kind: FinancialEventKind,
        amount: Money,
        player_id: Option<PlayerId>,
        notes: Option<String>,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.require_open_shift(shift_id)?;
        if amount <= Money::ZERO {
            return Err(DomainError::validation(format!(
                "amount must be positive, got {amount}"
            )));
        }
        if amount > MAX_AMOUNT {
            return Err(DomainError::validation(format!(
                "amount {amount} exceeds the maximum of {MAX_AMOUNT}"
            )));
        }
        if player_id.is_some() && !kind.is_collection() {
            return Err(DomainError::validation(
                "only credit collections name a player",
            ));
        }

        Ok(JournalEntry::FinancialEventRecorded {
            event: FinancialEvent {
                shift_id,
                kind,
                amount,
                player_id,
                notes,
                at,
            },
        })
    }

    /// Circulation → vault pickup from an active session. The dealer defaults
    /// to whoever is currently dealing.
    pub fn record_rake(
        &self,
        shift_id: ShiftId,
        session_id: SessionId,
        dealer_id: Option<PersonId>,
        lines: Vec<ChipLine>,
        notes: Option<String>,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.require_open_shift(shift_id)?;
        let session = self.require_active_session(session_id)?;
        let dealer_id = dealer_id.or_else(|| session.current_dealer());

        let transfer = TransferRequest::new(
            Location::Circulation,
            Location::Vault,
            lines,
            MovementReason::RakeCollection,
        )
        .in_shift(Some(shift_id))
        .linked(MovementLinkage {
            session_id: Some(session_id),
            seat_id: None,
            dealer_id,
        })
        .with_note(notes.clone());
        let movement = self.engine.plan(transfer, at)?;

        let rake = RakeCollection {
            shift_id,
            session_id,
            table_id: session.table_id,
            dealer_id,
            amount: movement.total,
            movement_id: movement.id,
            notes,
            at,
        };
        Ok(JournalEntry::RakeRecorded { rake, movement })
    }

    /// Closing reconciliation for the open shift. Never mutates.
    pub fn preview_close(
        &self,
        counted_currency: Option<Money>,
    ) -> Result<ClosingPreview, DomainError> {
        let shift = self.active_shift()?;
        Ok(self.preview_for(shift, counted_currency))
    }

    fn preview_for(&self, shift: &Shift, counted_currency: Option<Money>) -> ClosingPreview {
        reconciliation::preview(&ReconciliationInput {
            shift,
            ledger: self.ledger(),
            active_sessions: self.active_sessions().count(),
            open_seats: self.open_seats().count(),
            movements: self.movements(),
            policy: &self.policy,
            counted_currency,
        })
    }

    /// Close the open shift. Blocking problems fail the close unless `force`
    /// is set, in which case they are kept in the close record.
    pub fn close_shift(
        &self,
        shift_id: ShiftId,
        force: bool,
        notes: Option<String>,
        counted_currency: Option<Money>,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        let shift = self.require_open_shift(shift_id)?;
        let preview = self.preview_for(shift, counted_currency);

        if !preview.can_close && !force {
            return Err(DomainError::CannotClose {
                problems: preview.problems,
            });
        }

        let record = CloseRecord {
            closed_at: at,
            forced: force && !preview.can_close,
            bypassed_problems: preview.problems.clone(),
            notes,
            preview,
        };
        Ok(JournalEntry::ShiftClosed { shift_id, record })
    }
}
