//! Closing reconciliation ("cuadre"): a pure function of the shift totals, the
//! ledger, open table activity and the shift's movement log.

use serde::{Deserialize, Serialize};

use super::{ChipMovement, Ledger, Location, Money, MovementReason, RoomPolicy, Shift};

/// Derived closing figures. Field names follow the dashboard's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingPreview {
    #[serde(rename = "puede_cerrar")]
    pub can_close: bool,
    #[serde(rename = "problemas")]
    pub problems: Vec<String>,
    #[serde(rename = "advertencias")]
    pub warnings: Vec<String>,

    #[serde(rename = "saldo_inicial_caja")]
    pub opening_cash: Money,
    #[serde(rename = "valor_fichas_caja")]
    pub cash_chip_value: Money,
    #[serde(rename = "valor_fichas_circulacion")]
    pub circulation_value: Money,
    #[serde(rename = "flujo_fichas_caja")]
    pub register_chip_flow: Money,

    #[serde(rename = "total_ventas_efectivo")]
    pub cash_sales: Money,
    #[serde(rename = "total_ventas_tarjeta")]
    pub card_sales: Money,
    #[serde(rename = "total_cobros")]
    pub cash_collections: Money,
    #[serde(rename = "total_cobros_tarjeta")]
    pub card_collections: Money,
    #[serde(rename = "total_rake")]
    pub rake: Money,
    #[serde(rename = "total_propinas")]
    pub tips: Money,
    #[serde(rename = "total_propinas_pagadas")]
    pub tips_paid: Money,
    #[serde(rename = "total_gastos")]
    pub expenses: Money,

    #[serde(rename = "efectivo_contado")]
    pub counted_currency: Money,
    /// Whether `counted_currency` was declared. Without a count the recorded
    /// cash events stand in for it and `difference` is zero by construction.
    #[serde(rename = "efectivo_declarado", default)]
    pub count_declared: bool,
    #[serde(rename = "efectivo_esperado")]
    pub expected_cash: Money,
    #[serde(rename = "efectivo_real")]
    pub actual_cash: Money,
    #[serde(rename = "diferencia")]
    pub difference: Money,
    #[serde(rename = "cuadre_ok")]
    pub balanced: bool,

    #[serde(rename = "comision_propinas")]
    pub tip_commission: Money,
    #[serde(rename = "ganancia_bruta")]
    pub gross_profit: Money,
    #[serde(rename = "ganancia_neta")]
    pub net_profit: Money,
}

pub struct ReconciliationInput<'a> {
    pub shift: &'a Shift,
    pub ledger: &'a Ledger,
    pub active_sessions: usize,
    pub open_seats: usize,
    /// Full movement log; only this shift's entries are considered.
    pub movements: &'a [ChipMovement],
    pub policy: &'a RoomPolicy,
    /// Declared currency count; `None` assumes the recorded cash events.
    pub counted_currency: Option<Money>,
}

/// Net chip value moved into the register by the shift, excluding the
/// opening transfer that set `opening_cash`.
pub fn register_chip_flow(shift_id: i64, movements: &[ChipMovement]) -> Money {
    movements
        .iter()
        .filter(|m| m.shift_id == Some(shift_id) && m.reason != MovementReason::OpeningTransfer)
        .map(|m| m.net_value_at(Location::Cash))
        .sum()
}

pub fn preview(input: &ReconciliationInput<'_>) -> ClosingPreview {
    let totals = &input.shift.totals;
    let policy = input.policy;

    let cash_chip_value = input.ledger.value(Location::Cash);
    let circulation_value = input.ledger.value(Location::Circulation);
    let flow = register_chip_flow(input.shift.id, input.movements);

    let currency_balance = totals.currency_balance();
    let counted_currency = input.counted_currency.unwrap_or(currency_balance);

    let expected_cash = input.shift.opening_cash + flow + currency_balance;
    let actual_cash = cash_chip_value + counted_currency;
    let difference = actual_cash - expected_cash;
    let balanced = difference.abs() <= policy.tolerance;

    let tip_commission = totals.tips * policy.tip_commission_rate;
    let gross_profit = totals.rake + tip_commission;
    let net_profit = gross_profit - totals.expenses;

    let mut problems = Vec::new();
    if input.active_sessions > 0 {
        problems.push(format!(
            "{} table session(s) still active",
            input.active_sessions
        ));
    }
    if input.open_seats > 0 {
        problems.push(format!(
            "{} player seat(s) without cash-out",
            input.open_seats
        ));
    }
    if !circulation_value.is_zero() {
        problems.push(format!(
            "chips worth {circulation_value} remain in circulation"
        ));
    }

    let mut warnings = Vec::new();
    if !balanced {
        warnings.push(format!(
            "cash difference of {difference} exceeds the tolerance of {}",
            policy.tolerance
        ));
    }
    if !totals.rake.is_zero() {
        if totals.tips.is_zero() {
            warnings.push("rake was collected but no tips were recorded".to_string());
        }
        if totals.expenses.is_zero() {
            warnings.push("rake was collected but no expenses were recorded".to_string());
        }
    }

    ClosingPreview {
        can_close: problems.is_empty(),
        problems,
        warnings,
        opening_cash: input.shift.opening_cash,
        cash_chip_value,
        circulation_value,
        register_chip_flow: flow,
        cash_sales: totals.cash_sales,
        card_sales: totals.card_sales,
        cash_collections: totals.cash_collections,
        card_collections: totals.card_collections,
        rake: totals.rake,
        tips: totals.tips,
        tips_paid: totals.tips_paid,
        expenses: totals.expenses,
        counted_currency,
        count_declared: input.counted_currency.is_some(),
        expected_cash,
        actual_cash,
        difference,
        balanced,
        tip_commission,
        gross_profit,
        net_profit,
    }
}
