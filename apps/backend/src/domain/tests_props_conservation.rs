//! Property tests for ledger conservation (pure domain, no DB).
//!
//! Contract:
//! - Per denomination, qty_vault + qty_cash + qty_circulation never changes
//!   after registration, whatever sequence of operations runs.
//! - Total chip value is therefore constant too.
//! - A rejected operation leaves every quantity exactly as it was.

use proptest::prelude::*;

use crate::domain::test_helpers::Harness;
use crate::domain::test_prelude;
use crate::domain::{
    ChipLine, JournalEntry, Location, Money, OpenShift, PaymentMethod, SeatId, SeatRequest,
};

/// (denomination id, [vault, cash, circulation])
type Snapshot = Vec<(i64, [u64; 3])>;

#[derive(Debug, Clone)]
enum Op {
    Withdraw(Vec<ChipLine>),
    Seat(i64, Vec<ChipLine>),
    Rebuy(usize, Vec<ChipLine>),
    CashOut(usize, Vec<ChipLine>),
    Rake(Vec<ChipLine>),
}

fn lines_strategy() -> impl Strategy<Value = Vec<ChipLine>> {
    prop::collection::vec((1i64..=3, 0u64..=25), 0..4)
        .prop_map(|pairs| pairs.into_iter().map(|(d, q)| ChipLine::new(d, q)).collect())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        lines_strategy().prop_map(Op::Withdraw),
        (1i64..=6, lines_strategy()).prop_map(|(p, l)| Op::Seat(p, l)),
        (0usize..8, lines_strategy()).prop_map(|(s, l)| Op::Rebuy(s, l)),
        (0usize..8, lines_strategy()).prop_map(|(s, l)| Op::CashOut(s, l)),
        lines_strategy().prop_map(Op::Rake),
    ]
}

fn snapshot(h: &Harness) -> Snapshot {
    h.room
        .ledger()
        .iter()
        .map(|d| {
            (
                d.id,
                [
                    d.qty(Location::Vault),
                    d.qty(Location::Cash),
                    d.qty(Location::Circulation),
                ],
            )
        })
        .collect()
}

/// Room with $1, $5 and $25 chips, an open shift and one active session.
fn seeded() -> (Harness, i64, i64) {
    let mut h = Harness::new();
    for (face, vault) in [(1, 200), (5, 100), (25, 40)] {
        h.register(face, vault);
    }
    let table = h.table(1);
    let request = OpenShift {
        opening_lines: vec![ChipLine::new(1, 50), ChipLine::new(2, 20)],
        ..OpenShift::default()
    };
    let shift = match h.ok(|r, at| r.open_shift(request, at)) {
        JournalEntry::ShiftOpened { shift, .. } => shift.id,
        other => panic!("unexpected entry {other:?}"),
    };
    let session = h.open_session(shift, table);
    (h, shift, session)
}

fn run_op(h: &mut Harness, shift: i64, session: i64, seats: &mut Vec<SeatId>, op: Op) {
    let seat_at = |i: usize, seats: &Vec<SeatId>| seats.get(i % seats.len().max(1)).copied();
    let result = match op {
        Op::Withdraw(lines) => h.run(|r, at| r.manual_withdrawal(lines, None, at)),
        Op::Seat(player_id, lines) => {
            let request = SeatRequest {
                session_id: session,
                player_id,
                seat_number: None,
                lines,
                payment_method: PaymentMethod::Efectivo,
            };
            h.run(|r, at| r.seat_player(shift, request, at))
        }
        Op::Rebuy(i, lines) => match seat_at(i, seats) {
            Some(seat) => h.run(|r, at| r.rebuy(shift, seat, lines, PaymentMethod::Efectivo, at)),
            None => return,
        },
        Op::CashOut(i, lines) => match seat_at(i, seats) {
            Some(seat) => {
                h.run(|r, at| r.cash_out(shift, seat, lines, PaymentMethod::Efectivo, at))
            }
            None => return,
        },
        Op::Rake(lines) => h.run(|r, at| r.record_rake(shift, session, None, lines, None, at)),
    };
    if let Ok(JournalEntry::PlayerSeated { seat, .. }) = result {
        seats.push(seat.id);
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: per-denomination totals and total value are conserved.
    #[test]
    fn prop_units_and_value_are_conserved(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let (mut h, shift, session) = seeded();
        let totals: Vec<u64> = h.room.ledger().iter().map(|d| d.qty_total()).collect();
        let value = h.room.ledger().total_value();
        let mut seats = Vec::new();

        for op in ops {
            run_op(&mut h, shift, session, &mut seats, op);
            let now: Vec<u64> = h.room.ledger().iter().map(|d| d.qty_total()).collect();
            prop_assert_eq!(&now, &totals);
            prop_assert_eq!(h.room.ledger().total_value(), value);
        }
    }

    /// Property: a rejected operation changes no quantity anywhere.
    #[test]
    fn prop_rejected_operations_are_atomic(
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let (mut h, shift, session) = seeded();
        let mut seats = Vec::new();

        for op in ops {
            let before = snapshot(&h);
            let journal_len = h.journal.len();
            run_op(&mut h, shift, session, &mut seats, op);
            if h.journal.len() == journal_len {
                prop_assert_eq!(snapshot(&h), before);
            }
        }
    }

    /// Property: closing figures are consistent with the ledger at every step.
    #[test]
    fn prop_preview_tracks_ledger(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let (mut h, shift, session) = seeded();
        let mut seats = Vec::new();

        for op in ops {
            run_op(&mut h, shift, session, &mut seats, op);
            let preview = h.room.preview_close(None).unwrap();
            prop_assert_eq!(preview.cash_chip_value, h.room.ledger().value(Location::Cash));
            prop_assert_eq!(preview.circulation_value, h.room.ledger().value(Location::Circulation));
            prop_assert_eq!(preview.can_close, preview.problems.is_empty());
            prop_assert_eq!(
                preview.difference,
                preview.actual_cash - preview.expected_cash
            );
            prop_assert!(preview.circulation_value >= Money::ZERO);
            // every register movement after the opening belongs to this shift
            prop_assert!(preview.balanced);
        }
    }
}
