use crate::domain::test_helpers::{FiveDollarRoom, Harness};
use crate::domain::{
    JournalEntry, Location, Money, PaymentMethod, RoomPolicy, SeatRequest, SessionState,
    TableUpdate,
};
use crate::errors::domain::DomainError;

#[test]
fn seat_rebuy_cash_out_tracks_buy_in_and_result() {
    let mut f = FiveDollarRoom::new();
    let shift = f.shift;
    let seat = f.seat(1, 20, PaymentMethod::Efectivo);

    let rebuy = f.fives(10);
    f.h
        .ok(|r, at| r.rebuy(shift, seat, rebuy, PaymentMethod::Efectivo, at));
    assert_eq!(f.h.room.seat(seat).unwrap().buy_in_total, Money::from(150));
    assert_eq!(f.h.room.seat(seat).unwrap().result(), None);

    let out = f.fives(40);
    f.h
        .ok(|r, at| r.cash_out(shift, seat, out, PaymentMethod::Efectivo, at));
    let seat_state = f.h.room.seat(seat).unwrap();
    assert_eq!(seat_state.cash_out, Some(Money::from(200)));
    assert_eq!(seat_state.result(), Some(Money::from(50)));
    assert!(seat_state.exited_at.is_some());
}

#[test]
fn closed_seat_cannot_rebuy_or_cash_out_again() {
    let mut f = FiveDollarRoom::new();
    let shift = f.shift;
    let seat = f.seat(1, 10, PaymentMethod::Efectivo);
    let out = f.fives(10);
    f.h
        .ok(|r, at| r.cash_out(shift, seat, out, PaymentMethod::Efectivo, at));

    let again = f.fives(1);
    let err = f
        .h
        .run(|r, at| r.rebuy(shift, seat, again, PaymentMethod::Efectivo, at))
        .unwrap_err();
    assert_eq!(err, DomainError::SeatAlreadyClosed(seat));

    let err = f
        .h
        .run(|r, at| r.cash_out(shift, seat, Vec::new(), PaymentMethod::Efectivo, at))
        .unwrap_err();
    assert_eq!(err, DomainError::SeatAlreadyClosed(seat));
}

#[test]
fn busted_player_cashes_out_without_movement() {
    let mut f = FiveDollarRoom::new();
    let shift = f.shift;
    let seat = f.seat(1, 10, PaymentMethod::Efectivo);
    let movements_before = f.h.room.movements().len();

    let entry = f
        .h
        .ok(|r, at| r.cash_out(shift, seat, Vec::new(), PaymentMethod::Efectivo, at));
    assert!(entry.movement().is_none());
    assert_eq!(f.h.room.movements().len(), movements_before);
    assert_eq!(f.h.room.seat(seat).unwrap().result(), Some(Money::from(-50)));
}

#[test]
fn player_cannot_hold_two_open_seats_in_one_session() {
    let mut f = FiveDollarRoom::new();
    let (shift, session) = (f.shift, f.session);
    f.seat(1, 10, PaymentMethod::Efectivo);

    let request = SeatRequest {
        session_id: session,
        player_id: 1,
        seat_number: Some(3),
        lines: f.fives(10),
        payment_method: PaymentMethod::Efectivo,
    };
    let err = f.h.run(|r, at| r.seat_player(shift, request, at)).unwrap_err();
    assert_eq!(
        err,
        DomainError::PlayerAlreadySeated {
            player_id: 1,
            session_id: session
        }
    );
}

#[test]
fn buy_in_beyond_register_stock_is_insufficient_chips() {
    let mut f = FiveDollarRoom::new();
    let (shift, session) = (f.shift, f.session);
    let request = SeatRequest {
        session_id: session,
        player_id: 1,
        seat_number: None,
        lines: f.fives(101),
        payment_method: PaymentMethod::Efectivo,
    };
    let err = f.h.run(|r, at| r.seat_player(shift, request, at)).unwrap_err();
    assert!(matches!(
        err,
        DomainError::InsufficientChips {
            location: Location::Cash,
            requested: 101,
            available: 100,
            ..
        }
    ));
    assert_eq!(f.h.room.ledger().value(Location::Cash), Money::from(500));
}

#[test]
fn session_close_requires_every_seat_cashed_out() {
    let mut f = FiveDollarRoom::new();
    let (shift, session) = (f.shift, f.session);
    let seat = f.seat(1, 10, PaymentMethod::Efectivo);

    let err = f
        .h
        .run(|r, at| r.close_session(shift, session, at))
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::OpenSeatsRemaining {
            session_id: session,
            open_seats: 1
        }
    );

    let out = f.fives(10);
    f.h
        .ok(|r, at| r.cash_out(shift, seat, out, PaymentMethod::Efectivo, at));
    f.h.ok(|r, at| r.close_session(shift, session, at));

    let closed = f.h.room.session(session).unwrap();
    assert_eq!(closed.state, SessionState::Closed);
    assert!(closed.ended_at.is_some());

    let err = f
        .h
        .run(|r, at| r.close_session(shift, session, at))
        .unwrap_err();
    assert_eq!(err, DomainError::SessionNotActive(session));
}

#[test]
fn table_with_active_session_is_occupied() {
    let mut f = FiveDollarRoom::new();
    let (shift, table) = (f.shift, f.table);
    let err = f
        .h
        .run(|r, at| r.open_session(shift, table, "10/20".into(), at))
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::TableOccupied {
            table_id: table,
            session_id: f.session
        }
    );

    let err = f
        .h
        .run(|r, _| {
            r.update_table(
                table,
                TableUpdate {
                    active: Some(false),
                    ..TableUpdate::default()
                },
            )
        })
        .unwrap_err();
    assert!(matches!(err, DomainError::TableOccupied { .. }));
}

#[test]
fn inactive_table_cannot_open_a_session() {
    let mut f = FiveDollarRoom::new();
    let shift = f.shift;
    let other = f.h.table(2);
    f.h.ok(|r, _| {
        r.update_table(
            other,
            TableUpdate {
                active: Some(false),
                ..TableUpdate::default()
            },
        )
    });

    let err = f
        .h
        .run(|r, at| r.open_session(shift, other, "5/10".into(), at))
        .unwrap_err();
    assert_eq!(err, DomainError::TableInactive(other));
}

#[test]
fn duplicate_table_number_is_a_validation_error() {
    let mut h = Harness::new();
    h.table(4);
    let err = h
        .run(|r, _| r.register_table(4, "Again".into(), 9))
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[test]
fn dealer_rotation_keeps_exactly_one_open_assignment() {
    let mut f = FiveDollarRoom::new();
    let (shift, session) = (f.shift, f.session);
    f.h.ok(|r, at| r.assign_dealer(shift, session, 21, at));
    f.h.ok(|r, at| r.assign_dealer(shift, session, 22, at));

    let s = f.h.room.session(session).unwrap();
    assert_eq!(s.dealers.len(), 2);
    assert!(s.dealers[0].ended_at.is_some());
    assert!(s.dealers[1].ended_at.is_none());
    assert_eq!(s.current_dealer(), Some(22));

    f.h.ok(|r, at| r.close_session(shift, session, at));
    let s = f.h.room.session(session).unwrap();
    assert!(s.dealers.iter().all(|d| d.ended_at.is_some()));
    assert_eq!(s.current_dealer(), None);
}

#[test]
fn credit_buy_in_over_limit_warns_by_default() {
    let mut f = FiveDollarRoom::new();
    let (shift, session) = (f.shift, f.session);
    f.h.ok(|r, _| r.set_credit_limit(9, Money::from(50)));

    let request = SeatRequest {
        session_id: session,
        player_id: 9,
        seat_number: None,
        lines: f.fives(20),
        payment_method: PaymentMethod::Credito,
    };
    let entry = f.h.ok(|r, at| r.seat_player(shift, request, at));

    assert_eq!(entry.warnings().len(), 1);
    let account = f.h.room.credit_account(9).unwrap();
    assert_eq!(account.balance, Money::from(100));
    assert_eq!(account.available(), Money::from(-50));
}

#[test]
fn credit_buy_in_over_limit_fails_when_strict() {
    let policy = RoomPolicy {
        credit_strict: true,
        ..RoomPolicy::default()
    };
    let mut f = FiveDollarRoom::with_policy(policy);
    let (shift, session) = (f.shift, f.session);

    let request = SeatRequest {
        session_id: session,
        player_id: 9,
        seat_number: None,
        lines: f.fives(1),
        payment_method: PaymentMethod::Credito,
    };
    let err = f.h.run(|r, at| r.seat_player(shift, request, at)).unwrap_err();
    assert_eq!(
        err,
        DomainError::CreditLimitExceeded {
            player_id: 9,
            limit: Money::ZERO,
            balance_after: Money::from(5),
        }
    );
    assert!(f.h.room.credit_account(9).is_none());
    assert_eq!(f.h.room.ledger().value(Location::Circulation), Money::ZERO);
}

#[test]
fn cash_payment_never_touches_credit() {
    let mut f = FiveDollarRoom::new();
    let (shift, session) = (f.shift, f.session);
    let entry = {
        let request = SeatRequest {
            session_id: session,
            player_id: 3,
            seat_number: None,
            lines: f.fives(2),
            payment_method: PaymentMethod::Tarjeta,
        };
        f.h.ok(|r, at| r.seat_player(shift, request, at))
    };
    assert!(matches!(entry, JournalEntry::PlayerSeated { .. }));
    assert!(entry.warnings().is_empty());
    assert!(f.h.room.credit_account(3).is_none());
}
