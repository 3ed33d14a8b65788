use time::macros::datetime;

use crate::domain::{
    ChipLine, Denomination, Location, Money, MovementEngine, MovementReason, TransferRequest,
};
use crate::errors::domain::DomainError;

fn engine_with(stock: &[(i64, i64, u64)]) -> MovementEngine {
    let mut engine = MovementEngine::new();
    for &(id, face, vault) in stock {
        engine
            .register(Denomination::new(id, Money::from(face), None, vault))
            .unwrap();
    }
    engine
}

#[test]
fn transfer_appends_one_record_with_monetary_total() {
    let mut engine = engine_with(&[(1, 5, 100), (2, 25, 40)]);
    let at = datetime!(2026-01-10 20:00 UTC);

    let movement = engine
        .transfer(
            TransferRequest::new(
                Location::Vault,
                Location::Cash,
                vec![ChipLine::new(1, 10), ChipLine::new(2, 2)],
                MovementReason::ManualWithdrawal,
            ),
            at,
        )
        .unwrap();

    assert_eq!(movement.id, 1);
    assert_eq!(movement.total, Money::from(100));
    assert_eq!(movement.at, at);
    assert_eq!(engine.log().len(), 1);
    assert_eq!(engine.ledger().value(Location::Cash), Money::from(100));
}

#[test]
fn failed_transfer_appends_nothing() {
    let mut engine = engine_with(&[(1, 5, 3)]);
    let err = engine
        .transfer(
            TransferRequest::new(
                Location::Vault,
                Location::Cash,
                vec![ChipLine::new(1, 4)],
                MovementReason::ManualWithdrawal,
            ),
            datetime!(2026-01-10 20:00 UTC),
        )
        .unwrap_err();

    assert!(matches!(err, DomainError::InsufficientChips { .. }));
    assert!(engine.log().is_empty());
    assert_eq!(engine.ledger().value(Location::Vault), Money::from(15));
}

#[test]
fn planning_does_not_touch_the_ledger() {
    let engine = engine_with(&[(1, 5, 10)]);
    let planned = engine
        .plan(
            TransferRequest::new(
                Location::Vault,
                Location::Cash,
                vec![ChipLine::new(1, 10)],
                MovementReason::OpeningTransfer,
            ),
            datetime!(2026-01-10 20:00 UTC),
        )
        .unwrap();

    assert_eq!(planned.total, Money::from(50));
    assert_eq!(engine.ledger().value(Location::Cash), Money::ZERO);
    assert!(engine.log().is_empty());
}

#[test]
fn commit_rejects_out_of_sequence_movement() {
    let mut engine = engine_with(&[(1, 5, 10)]);
    let planned = engine
        .plan(
            TransferRequest::new(
                Location::Vault,
                Location::Cash,
                vec![ChipLine::new(1, 1)],
                MovementReason::ManualWithdrawal,
            ),
            datetime!(2026-01-10 20:00 UTC),
        )
        .unwrap();
    engine.commit(&planned).unwrap();

    assert!(matches!(
        engine.commit(&planned),
        Err(DomainError::Validation(_))
    ));
    assert_eq!(engine.ledger().get(1).unwrap().qty(Location::Cash), 1);
}

#[test]
fn compose_uses_largest_denominations_first() {
    let engine = engine_with(&[(1, 100, 50), (2, 1000, 3), (3, 5000, 40)]);
    let lines = engine.compose(Location::Vault, Money::from(50_000)).unwrap();
    assert_eq!(lines, vec![ChipLine::new(3, 10)]);

    let lines = engine.compose(Location::Vault, Money::from(8_300)).unwrap();
    assert_eq!(
        lines,
        vec![
            ChipLine::new(3, 1),
            ChipLine::new(2, 3),
            ChipLine::new(1, 3)
        ]
    );
}

#[test]
fn compose_fails_when_amount_cannot_be_made_exactly() {
    let engine = engine_with(&[(1, 25, 1), (2, 100, 2)]);
    let err = engine.compose(Location::Vault, Money::from(260)).unwrap_err();
    assert!(matches!(err, DomainError::InsufficientChips { denomination_id: 1, .. }));
}
