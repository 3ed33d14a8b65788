use rust_decimal::Decimal;

use crate::domain::test_helpers::FiveDollarRoom;
use crate::domain::{FinancialEventKind, Location, Money, PaymentMethod, RoomPolicy};

/// Opening cash $500, buy-in 20×$5, rake 2×$5, cash-out 18×$5.
fn five_hundred_scenario() -> FiveDollarRoom {
    let mut f = FiveDollarRoom::new();
    let (shift, session) = (f.shift, f.session);
    let seat = f.seat(1, 20, PaymentMethod::Efectivo);

    let rake = f.fives(2);
    f.h
        .ok(|r, at| r.record_rake(shift, session, None, rake, None, at));
    let out = f.fives(18);
    f.h
        .ok(|r, at| r.cash_out(shift, seat, out, PaymentMethod::Efectivo, at));
    f.h.ok(|r, at| r.close_session(shift, session, at));
    f
}

#[test]
fn five_hundred_scenario_balances() {
    let f = five_hundred_scenario();
    let room = &f.h.room;

    let seat = room.seat(1).unwrap();
    assert_eq!(seat.result(), Some(Money::from(-10)));
    assert_eq!(room.ledger().value(Location::Circulation), Money::ZERO);
    assert_eq!(room.ledger().value(Location::Cash), Money::from(490));
    assert_eq!(room.ledger().value(Location::Vault), Money::from(4_510));

    let preview = room.preview_close(None).unwrap();
    assert!(preview.can_close);
    assert!(preview.problems.is_empty());
    assert_eq!(preview.opening_cash, Money::from(500));
    assert_eq!(preview.register_chip_flow, Money::from(-10));
    assert_eq!(preview.expected_cash, Money::from(490));
    assert_eq!(preview.actual_cash, Money::from(490));
    assert_eq!(preview.difference, Money::ZERO);
    assert!(preview.balanced);
    assert_eq!(preview.rake, Money::from(10));
    assert_eq!(preview.gross_profit, Money::from(10));
    assert_eq!(preview.net_profit, Money::from(10));
    // rake without tips and without expenses
    assert_eq!(preview.warnings.len(), 2);
}

#[test]
fn preview_is_idempotent() {
    let f = five_hundred_scenario();
    let first = f.h.room.preview_close(None).unwrap();
    let second = f.h.room.preview_close(None).unwrap();
    assert_eq!(first, second);
    assert_eq!(f.h.journal.len(), 8);
}

#[test]
fn break_even_round_trip_nets_to_zero() {
    let mut f = FiveDollarRoom::new();
    let shift = f.shift;
    let cash_before = f.h.room.ledger().value(Location::Cash);
    let seat = f.seat(1, 20, PaymentMethod::Efectivo);
    let out = f.fives(20);
    f.h
        .ok(|r, at| r.cash_out(shift, seat, out, PaymentMethod::Efectivo, at));

    assert_eq!(f.h.room.seat(seat).unwrap().result(), Some(Money::ZERO));
    assert_eq!(f.h.room.ledger().value(Location::Cash), cash_before);
    assert_eq!(f.h.room.ledger().value(Location::Circulation), Money::ZERO);
}

#[test]
fn card_totals_do_not_affect_expected_cash() {
    let mut f = FiveDollarRoom::new();
    let shift = f.shift;
    for (kind, amount) in [
        (FinancialEventKind::CashSale, 200),
        (FinancialEventKind::CardSale, 300),
        (FinancialEventKind::CashCollection, 50),
        (FinancialEventKind::CardCollection, 70),
        (FinancialEventKind::Expense, 20),
        (FinancialEventKind::TipPaid, 5),
    ] {
        f.h.ok(|r, at| {
            r.record_financial_event(shift, kind, Money::from(amount), None, None, at)
        });
    }

    let preview = f.h.room.preview_close(None).unwrap();
    assert_eq!(preview.expected_cash, Money::from(500 + 200 + 50 - 20 - 5));
    assert_eq!(preview.card_sales, Money::from(300));
    assert_eq!(preview.card_collections, Money::from(70));
    assert!(preview.balanced);
}

#[test]
fn counted_currency_shortfall_is_reported_against_tolerance() {
    let policy = RoomPolicy {
        tolerance: Money::from(5),
        ..RoomPolicy::default()
    };
    let mut f = FiveDollarRoom::with_policy(policy);
    let shift = f.shift;
    f.h.ok(|r, at| {
        r.record_financial_event(
            shift,
            FinancialEventKind::CashSale,
            Money::from(100),
            None,
            None,
            at,
        )
    });

    let within = f.h.room.preview_close(Some(Money::from(96))).unwrap();
    assert!(within.count_declared);
    assert_eq!(within.difference, Money::from(-4));
    assert!(within.balanced);
    assert!(within.warnings.is_empty());

    let short = f.h.room.preview_close(Some(Money::from(90))).unwrap();
    assert_eq!(short.counted_currency, Money::from(90));
    assert_eq!(short.difference, Money::from(-10));
    assert!(!short.balanced);
    assert_eq!(short.warnings.len(), 1);
}

#[test]
fn undeclared_count_assumes_recorded_cash_events() {
    let mut f = FiveDollarRoom::new();
    let shift = f.shift;
    f.h.ok(|r, at| {
        r.record_financial_event(
            shift,
            FinancialEventKind::CashSale,
            Money::from(100),
            None,
            None,
            at,
        )
    });

    let preview = f.h.room.preview_close(None).unwrap();
    assert!(!preview.count_declared);
    assert_eq!(preview.counted_currency, Money::from(100));
    assert_eq!(preview.difference, Money::ZERO);
    assert!(preview.balanced);
}

#[test]
fn open_seats_and_circulation_block_closing() {
    let mut f = FiveDollarRoom::new();
    f.seat(1, 4, PaymentMethod::Efectivo);

    let preview = f.h.room.preview_close(None).unwrap();
    assert!(!preview.can_close);
    assert_eq!(preview.problems.len(), 3);
    assert_eq!(preview.circulation_value, Money::from(20));
}

#[test]
fn tip_commission_uses_configured_rate() {
    let policy = RoomPolicy {
        tip_commission_rate: Decimal::new(25, 2),
        ..RoomPolicy::default()
    };
    let mut f = FiveDollarRoom::with_policy(policy);
    let shift = f.shift;
    for (kind, amount) in [
        (FinancialEventKind::TipRecorded, 200),
        (FinancialEventKind::Expense, 30),
    ] {
        f.h.ok(|r, at| {
            r.record_financial_event(shift, kind, Money::from(amount), None, None, at)
        });
    }

    let preview = f.h.room.preview_close(None).unwrap();
    assert_eq!(preview.tip_commission, Money::from(50));
    assert_eq!(preview.gross_profit, Money::from(50));
    assert_eq!(preview.net_profit, Money::from(20));
}

#[test]
fn preview_serializes_with_dashboard_field_names() {
    let f = five_hundred_scenario();
    let json = serde_json::to_value(f.h.room.preview_close(None).unwrap()).unwrap();
    for key in [
        "puede_cerrar",
        "problemas",
        "advertencias",
        "efectivo_esperado",
        "efectivo_real",
        "diferencia",
        "cuadre_ok",
        "efectivo_declarado",
        "ganancia_bruta",
        "ganancia_neta",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["cuadre_ok"], serde_json::Value::Bool(true));
}
