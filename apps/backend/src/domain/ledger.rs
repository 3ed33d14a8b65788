//! Denomination ledger: per face value, how many chips sit in each location.
//!
//! Quantities only change through [`Ledger::apply_delta`], which the movement
//! engine calls. A delta is validated in full before the first write, so a
//! rejected transfer never leaves a partially applied ledger behind.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::{ChipLine, DenominationId, Location, Money, MAX_AMOUNT};
use crate::errors::domain::{DomainError, NotFoundKind};

/// One chip face value and its stock per location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Denomination {
    pub id: DenominationId,
    pub face_value: Money,
    /// Display color; never interpreted by the engine.
    pub color: Option<String>,
    qty_vault: u64,
    qty_cash: u64,
    qty_circulation: u64,
}

impl Denomination {
    pub(crate) fn new(
        id: DenominationId,
        face_value: Money,
        color: Option<String>,
        initial_vault: u64,
    ) -> Self {
        Self {
            id,
            face_value,
            color,
            qty_vault: initial_vault,
            qty_cash: 0,
            qty_circulation: 0,
        }
    }

    pub fn qty(&self, location: Location) -> u64 {
        match location {
            Location::Vault => self.qty_vault,
            Location::Cash => self.qty_cash,
            Location::Circulation => self.qty_circulation,
        }
    }

    pub fn qty_total(&self) -> u64 {
        self.qty_vault
            .saturating_add(self.qty_cash)
            .saturating_add(self.qty_circulation)
    }

    // Saturating: registration keeps real inventories far below the limits.
    pub fn value_at(&self, location: Location) -> Money {
        self.face_value.saturating_mul(Money::from(self.qty(location)))
    }

    pub fn value_total(&self) -> Money {
        self.face_value.saturating_mul(Money::from(self.qty_total()))
    }

    fn slot_mut(&mut self, location: Location) -> &mut u64 {
        match location {
            Location::Vault => &mut self.qty_vault,
            Location::Cash => &mut self.qty_cash,
            Location::Circulation => &mut self.qty_circulation,
        }
    }
}

/// All registered denominations, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    denominations: BTreeMap<DenominationId, Denomination>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.denominations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.denominations.len()
    }

    pub fn get(&self, id: DenominationId) -> Option<&Denomination> {
        self.denominations.get(&id)
    }

    pub fn require(&self, id: DenominationId) -> Result<&Denomination, DomainError> {
        self.get(id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Denomination, format!("denomination {id}"))
        })
    }

    /// Denominations ordered by id (registration order).
    pub fn iter(&self) -> impl Iterator<Item = &Denomination> {
        self.denominations.values()
    }

    pub fn by_face_value(&self, face_value: Money) -> Option<&Denomination> {
        self.denominations
            .values()
            .find(|d| d.face_value == face_value)
    }

    /// `Σ face_value × qty_at(location)`
    pub fn value(&self, location: Location) -> Money {
        self.denominations
            .values()
            .fold(Money::ZERO, |acc, d| acc.saturating_add(d.value_at(location)))
    }

    pub fn total_value(&self) -> Money {
        self.denominations
            .values()
            .fold(Money::ZERO, |acc, d| acc.saturating_add(d.value_total()))
    }

    pub fn total_units(&self) -> u64 {
        self.denominations
            .values()
            .fold(0, |acc: u64, d| acc.saturating_add(d.qty_total()))
    }

    /// Validate a new face value and its vault stock without registering it.
    ///
    /// Chips only enter the ledger here: the unit count stays within `u64` and
    /// the inventory value within [`MAX_AMOUNT`].
    pub fn check_registration(&self, face_value: Money, initial_vault: u64) -> Result<(), DomainError> {
        if face_value <= Money::ZERO {
            return Err(DomainError::validation(format!(
                "face value must be positive, got {face_value}"
            )));
        }
        if face_value > MAX_AMOUNT {
            return Err(DomainError::validation(format!(
                "face value {face_value} exceeds the maximum of {MAX_AMOUNT}"
            )));
        }
        if self.by_face_value(face_value).is_some() {
            return Err(DomainError::DuplicateDenomination(face_value));
        }
        self.total_units().checked_add(initial_vault).ok_or_else(|| {
            DomainError::validation(format!(
                "{initial_vault} chips would overflow the inventory unit count"
            ))
        })?;
        let added = face_value
            .checked_mul(Money::from(initial_vault))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "{initial_vault} chips of {face_value} overflow the inventory value"
                ))
            })?;
        match self.total_value().checked_add(added) {
            Some(total) if total <= MAX_AMOUNT => Ok(()),
            _ => Err(DomainError::validation(format!(
                "{initial_vault} chips of {face_value} would take the inventory value past {MAX_AMOUNT}"
            ))),
        }
    }

    pub(crate) fn register(&mut self, denomination: Denomination) -> Result<(), DomainError> {
        self.check_registration(denomination.face_value, denomination.qty_total())?;
        if self.denominations.contains_key(&denomination.id) {
            return Err(DomainError::validation(format!(
                "denomination id {} already in use",
                denomination.id
            )));
        }
        self.denominations.insert(denomination.id, denomination);
        Ok(())
    }

    /// Check that `lines` can move from `source` to `destination` right now.
    ///
    /// Lines naming the same denomination are accumulated; the error names the
    /// first line whose running total exceeds the stock at `source`.
    pub fn check_delta(
        &self,
        source: Location,
        destination: Location,
        lines: &[ChipLine],
    ) -> Result<(), DomainError> {
        if source == destination {
            return Err(DomainError::validation(format!(
                "source and destination are both {source}"
            )));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("a transfer needs at least one line"));
        }

        let mut requested: HashMap<DenominationId, u64> = HashMap::with_capacity(lines.len());
        for line in lines {
            if line.quantity == 0 {
                return Err(DomainError::validation(format!(
                    "quantity for denomination {} must be positive",
                    line.denomination_id
                )));
            }
            let denomination = self.require(line.denomination_id)?;
            let running = requested.entry(line.denomination_id).or_insert(0);
            *running = running.checked_add(line.quantity).ok_or_else(|| {
                DomainError::validation("requested quantity overflows")
            })?;

            let available = denomination.qty(source);
            if *running > available {
                return Err(DomainError::InsufficientChips {
                    denomination_id: denomination.id,
                    face_value: denomination.face_value,
                    location: source,
                    requested: *running,
                    available,
                });
            }
            if denomination.qty(destination).checked_add(*running).is_none() {
                return Err(DomainError::validation(format!(
                    "quantity at {destination} would overflow for denomination {}",
                    denomination.id
                )));
            }
        }
        Ok(())
    }

    /// Move every line from `source` to `destination`, or nothing at all.
    pub(crate) fn apply_delta(
        &mut self,
        source: Location,
        destination: Location,
        lines: &[ChipLine],
    ) -> Result<(), DomainError> {
        self.check_delta(source, destination, lines)?;

        for line in lines {
            // check_delta guarantees presence and sufficiency for every line
            if let Some(denomination) = self.denominations.get_mut(&line.denomination_id) {
                *denomination.slot_mut(source) -= line.quantity;
                *denomination.slot_mut(destination) += line.quantity;
            }
        }
        Ok(())
    }

    /// Monetary total of a set of lines at current face values.
    pub fn price(&self, lines: &[ChipLine]) -> Result<Money, DomainError> {
        lines.iter().try_fold(Money::ZERO, |acc, line| {
            let denomination = self.require(line.denomination_id)?;
            denomination
                .face_value
                .checked_mul(Money::from(line.quantity))
                .and_then(|value| acc.checked_add(value))
                .ok_or_else(|| {
                    DomainError::validation(format!(
                        "value of {} chips of denomination {} overflows",
                        line.quantity, line.denomination_id
                    ))
                })
        })
    }
}

/// Standard chip set offered when the inventory is empty: face value, color, vault stock.
pub const STANDARD_SET: [(i64, &str, u64); 6] = [
    (25, "#2E8B57", 400),
    (50, "#1E90FF", 400),
    (100, "#000000", 400),
    (500, "#800080", 200),
    (1000, "#FFD700", 100),
    (5000, "#FF4500", 40),
];
