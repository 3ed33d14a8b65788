use rust_decimal::Decimal;

use super::{parse_bool_or, parse_or, ProcessEnv, VarSource};
use crate::domain::RoomPolicy;
use crate::error::AppError;

/// Engine knobs: reconciliation tolerance, commission, credit and withdrawal rules.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub cuadre_tolerance: Decimal,
    pub tip_commission_rate: Decimal,
    pub credit_limit_strict: bool,
    pub standard_withdrawal_amount: Decimal,
    pub low_cash_alert_ratio: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let policy = RoomPolicy::default();
        Self {
            cuadre_tolerance: policy.tolerance,
            tip_commission_rate: policy.tip_commission_rate,
            credit_limit_strict: policy.credit_strict,
            standard_withdrawal_amount: policy.standard_withdrawal,
            low_cash_alert_ratio: policy.low_cash_ratio,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &dyn VarSource) -> Result<Self, AppError> {
        let defaults = Self::default();
        let config = Self {
            cuadre_tolerance: parse_or(source, "CUADRE_TOLERANCE", defaults.cuadre_tolerance)?,
            tip_commission_rate: parse_or(
                source,
                "TIP_COMMISSION_RATE",
                defaults.tip_commission_rate,
            )?,
            credit_limit_strict: parse_bool_or(
                source,
                "CREDIT_LIMIT_STRICT",
                defaults.credit_limit_strict,
            )?,
            standard_withdrawal_amount: parse_or(
                source,
                "STANDARD_WITHDRAWAL_AMOUNT",
                defaults.standard_withdrawal_amount,
            )?,
            low_cash_alert_ratio: parse_or(
                source,
                "LOW_CASH_ALERT_RATIO",
                defaults.low_cash_alert_ratio,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.cuadre_tolerance < Decimal::ZERO {
            return Err(AppError::config(
                "CUADRE_TOLERANCE cannot be negative".to_string(),
            ));
        }
        for (name, rate) in [
            ("TIP_COMMISSION_RATE", self.tip_commission_rate),
            ("LOW_CASH_ALERT_RATIO", self.low_cash_alert_ratio),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(AppError::config(format!(
                    "{name} must be a fraction between 0 and 1, got {rate}"
                )));
            }
        }
        if self.standard_withdrawal_amount <= Decimal::ZERO {
            return Err(AppError::config(
                "STANDARD_WITHDRAWAL_AMOUNT must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> RoomPolicy {
        RoomPolicy {
            tolerance: self.cuadre_tolerance,
            tip_commission_rate: self.tip_commission_rate,
            credit_strict: self.credit_limit_strict,
            standard_withdrawal: self.standard_withdrawal_amount,
            low_cash_ratio: self.low_cash_alert_ratio,
        }
    }
}
