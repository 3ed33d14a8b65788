use rust_decimal::Decimal;

use super::Money;

/// Knobs that change decisions but never the shape of recorded facts.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomPolicy {
    /// Largest absolute cash difference still considered balanced.
    pub tolerance: Money,
    /// Share of recorded tips counted as house income.
    pub tip_commission_rate: Decimal,
    /// Reject credit buy-ins over the limit instead of warning.
    pub credit_strict: bool,
    pub standard_withdrawal: Money,
    /// Cash-register share of total chip value below which the alert fires.
    pub low_cash_ratio: Decimal,
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            tolerance: Money::ZERO,
            tip_commission_rate: Decimal::new(10, 2),
            credit_strict: false,
            standard_withdrawal: Money::from(50_000),
            low_cash_ratio: Decimal::new(20, 2),
        }
    }
}
