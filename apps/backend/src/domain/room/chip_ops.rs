use time::OffsetDateTime;

use super::Room;
use crate::domain::journal_entry::DenominationRecord;
use crate::domain::ledger::STANDARD_SET;
use crate::domain::movement::TransferRequest;
use crate::domain::{ChipLine, JournalEntry, Location, Money, MovementReason};
use crate::errors::domain::DomainError;

impl Room {
    /// Register a new face value with its initial vault stock.
    pub fn register_denomination(
        &self,
        face_value: Money,
        color: Option<String>,
        initial_vault: u64,
    ) -> Result<JournalEntry, DomainError> {
        self.ledger().check_registration(face_value, initial_vault)?;

        let record = DenominationRecord {
            id: self.last_ids.denomination + 1,
            face_value,
            color,
            initial_vault,
        };
        Ok(JournalEntry::DenominationRegistered {
            denomination: record,
        })
    }

    /// Register the standard chip set into an empty inventory.
    pub fn seed_standard_set(&self) -> Result<JournalEntry, DomainError> {
        let first_id = self.last_ids.denomination + 1;
        let denominations: Vec<DenominationRecord> = STANDARD_SET
            .iter()
            .zip(first_id..)
            .map(|(&(face, color, stock), id)| DenominationRecord {
                id,
                face_value: Money::from(face),
                color: Some(color.to_string()),
                initial_vault: stock,
            })
            .collect();
        self.check_standard_set(&denominations)?;

        Ok(JournalEntry::StandardSetSeeded { denominations })
    }

    /// Vault → cash transfer of explicit lines. Linked to the open shift, if any.
    pub fn manual_withdrawal(
        &self,
        lines: Vec<ChipLine>,
        note: Option<String>,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        self.withdrawal(lines, MovementReason::ManualWithdrawal, note, at)
    }

    /// Vault → cash transfer of the configured standard amount, composed from
    /// the largest denominations first.
    pub fn standard_withdrawal(&self, at: OffsetDateTime) -> Result<JournalEntry, DomainError> {
        if self.ledger().is_empty() {
            return Err(DomainError::NoChipsRegistered);
        }
        let lines = self
            .engine
            .compose(Location::Vault, self.policy.standard_withdrawal)?;
        self.withdrawal(lines, MovementReason::StandardWithdrawal, None, at)
    }

    fn withdrawal(
        &self,
        lines: Vec<ChipLine>,
        reason: MovementReason,
        note: Option<String>,
        at: OffsetDateTime,
    ) -> Result<JournalEntry, DomainError> {
        let request = TransferRequest::new(Location::Vault, Location::Cash, lines, reason)
            .in_shift(self.open_shift)
            .with_note(note);
        let movement = self.engine.plan(request, at)?;

        Ok(JournalEntry::WithdrawalRecorded { movement })
    }
}
