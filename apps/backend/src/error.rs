use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Service unavailable: {detail}")]
    Unavailable { code: ErrorCode, detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::NotFound { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Conflict { code, .. } => *code,
            AppError::Unavailable { code, .. } => *code,
        }
    }

    /// Helper method to extract error detail from any error variant
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::Db { detail } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Internal { detail, .. } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Unavailable { detail, .. } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn invalid(code: ErrorCode, detail: String) -> Self {
        Self::Validation {
            code,
            detail,
            status: StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn internal(code: ErrorCode, detail: String) -> Self {
        Self::Internal { code, detail }
    }

    pub fn bad_request(code: ErrorCode, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn not_found(code: ErrorCode, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn db(detail: String) -> Self {
        Self::Db { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn conflict(code: ErrorCode, detail: String) -> Self {
        Self::Conflict { code, detail }
    }

    pub fn unavailable(code: ErrorCode, detail: String) -> Self {
        Self::Unavailable { code, detail }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let detail = e.to_string();
        match e {
            DomainError::InsufficientChips { .. } => {
                AppError::conflict(ErrorCode::InsufficientChips, detail)
            }
            DomainError::ShiftAlreadyOpen(_) => {
                AppError::conflict(ErrorCode::ShiftAlreadyOpen, detail)
            }
            DomainError::NoActiveShift => AppError::conflict(ErrorCode::NoActiveShift, detail),
            DomainError::ShiftMismatch { .. } => {
                AppError::conflict(ErrorCode::ShiftMismatch, detail)
            }
            DomainError::NoChipsRegistered => {
                AppError::invalid(ErrorCode::NoChipsRegistered, detail)
            }
            DomainError::SessionNotActive(_) => {
                AppError::conflict(ErrorCode::SessionNotActive, detail)
            }
            DomainError::TableOccupied { .. } => {
                AppError::conflict(ErrorCode::TableOccupied, detail)
            }
            DomainError::TableInactive(_) => AppError::conflict(ErrorCode::TableInactive, detail),
            DomainError::SeatAlreadyClosed(_) => {
                AppError::conflict(ErrorCode::SeatAlreadyClosed, detail)
            }
            DomainError::PlayerAlreadySeated { .. } => {
                AppError::conflict(ErrorCode::PlayerAlreadySeated, detail)
            }
            DomainError::OpenSeatsRemaining { .. } => {
                AppError::conflict(ErrorCode::OpenSeatsRemaining, detail)
            }
            DomainError::CannotClose { .. } => AppError::conflict(ErrorCode::CannotClose, detail),
            DomainError::DuplicateDenomination(_) => {
                AppError::conflict(ErrorCode::DuplicateDenomination, detail)
            }
            DomainError::CreditLimitExceeded { .. } => {
                AppError::invalid(ErrorCode::CreditLimitExceeded, detail)
            }
            DomainError::NotFound(kind, _) => {
                let code = match kind {
                    NotFoundKind::Denomination => ErrorCode::DenominationNotFound,
                    NotFoundKind::Table => ErrorCode::TableNotFound,
                    NotFoundKind::Session => ErrorCode::SessionNotFound,
                    NotFoundKind::Seat => ErrorCode::SeatNotFound,
                    NotFoundKind::Shift => ErrorCode::ShiftNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Validation(_) => AppError::invalid(ErrorCode::ValidationError, detail),
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::DbUnavailable => {
                    AppError::unavailable(ErrorCode::DbUnavailable, detail)
                }
                InfraErrorKind::JournalUnavailable => {
                    AppError::unavailable(ErrorCode::JournalUnavailable, detail)
                }
                InfraErrorKind::DataCorruption => {
                    AppError::internal(ErrorCode::DataCorruption, detail)
                }
                _ => AppError::internal(ErrorCode::Internal, detail),
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str().to_string();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://cardroom.local/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id));
        if status == StatusCode::SERVICE_UNAVAILABLE {
            builder.insert_header(("Retry-After", "1"));
        }
        builder.json(problem_details)
    }
}
