// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use rust_decimal::Decimal;

use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::ErrorCode;
use crate::AppError;

#[test]
fn maps_validation_to_422() {
    let app: AppError = DomainError::validation("capacity must be positive").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::ShiftAlreadyOpen(3).into();
    assert_eq!(app.code().as_str(), "SHIFT_ALREADY_OPEN");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::OpenSeatsRemaining {
        session_id: 2,
        open_seats: 4,
    }
    .into();
    assert_eq!(app.code().as_str(), "OPEN_SEATS_REMAINING");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::DuplicateDenomination(Decimal::from(25)).into();
    assert_eq!(app.code(), ErrorCode::DuplicateDenomination);
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn strict_credit_failures_are_unprocessable() {
    let app: AppError = DomainError::CreditLimitExceeded {
        player_id: 5,
        limit: Decimal::from(50),
        balance_after: Decimal::from(100),
    }
    .into();
    assert_eq!(app.code(), ErrorCode::CreditLimitExceeded);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_not_found_kinds() {
    let cases = [
        (NotFoundKind::Denomination, ErrorCode::DenominationNotFound),
        (NotFoundKind::Table, ErrorCode::TableNotFound),
        (NotFoundKind::Session, ErrorCode::SessionNotFound),
        (NotFoundKind::Shift, ErrorCode::ShiftNotFound),
        (NotFoundKind::Player, ErrorCode::PlayerNotFound),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::not_found(kind, "missing").into();
        assert_eq!(app.code(), code);
        assert_eq!(app.status().as_u16(), 404);
    }
}

#[test]
fn maps_infra_errors() {
    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "pool closed").into();
    assert_eq!(app.code(), ErrorCode::DbUnavailable);
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError =
        DomainError::infra(InfraErrorKind::JournalUnavailable, "writer stopped").into();
    assert_eq!(app.code(), ErrorCode::JournalUnavailable);
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "seq 4").into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError = DomainError::infra(InfraErrorKind::Other("io".into()), "disk").into();
    assert_eq!(app.code(), ErrorCode::Internal);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn sea_orm_connection_errors_are_unavailable() {
    let de: DomainError = sea_orm::DbErr::Conn(sea_orm::RuntimeErr::Internal(
        "connection refused".into(),
    ))
    .into();
    assert!(matches!(
        de,
        DomainError::Infra(InfraErrorKind::DbUnavailable, _)
    ));
}
