//! `/fichas`: denominations, inventory and vault withdrawals.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{chip_lines, ChipLineBody};
use crate::domain::Money;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDenominationRequest {
    pub denominacion: Money,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub cantidad_boveda: u64,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub detalles: Vec<ChipLineBody>,
    #[serde(default)]
    pub motivo: Option<String>,
}

async fn create_denomination(
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateDenominationRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let denomination = app_state.cardroom.register_denomination(
        body.denominacion,
        body.color,
        body.cantidad_boveda,
    )?;
    Ok(HttpResponse::Created().json(denomination))
}

async fn seed(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Created().json(app_state.cardroom.seed_standard_set()?))
}

async fn inventory(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.inventory()))
}

async fn cash_alert(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.cash_alert()))
}

async fn manual_withdrawal(
    app_state: web::Data<AppState>,
    body: ValidatedJson<WithdrawalRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let movement = app_state
        .cardroom
        .manual_withdrawal(chip_lines(body.detalles), body.motivo)?;
    Ok(HttpResponse::Created().json(movement))
}

async fn standard_withdrawal(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Created().json(app_state.cardroom.standard_withdrawal()?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_denomination))
        .route("/seed", web::post().to(seed))
        .route("/inventario", web::get().to(inventory))
        .route("/alerta-caja", web::get().to(cash_alert))
        .route("/boveda/retiro", web::post().to(manual_withdrawal))
        .route("/boveda/retiro-estandar", web::post().to(standard_withdrawal));
}
