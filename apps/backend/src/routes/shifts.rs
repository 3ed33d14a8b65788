//! `/turnos`: shift lifecycle, financial events, rake and the cuadre.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use time::Date;

use super::{chip_lines, ChipLineBody};
use crate::domain::{FinancialEventKind, Money, OpenShift, PersonId, PlayerId, SessionId, ShiftId};
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct OpenShiftRequest {
    #[serde(default)]
    pub cajeros_ids: Vec<PersonId>,
    #[serde(default)]
    pub dealers_ids: Vec<PersonId>,
    #[serde(default)]
    pub fichas_a_caja: Vec<ChipLineBody>,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub fecha_operativa: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct CloseShiftRequest {
    #[serde(default)]
    pub forzar: bool,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub efectivo_contado: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewCloseQuery {
    pub efectivo_contado: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct FinancialEventRequest {
    pub tipo: FinancialEventKind,
    pub monto: Money,
    #[serde(default)]
    pub id_jugador: Option<PlayerId>,
    #[serde(default)]
    pub notas: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RakeRequest {
    pub id_sesion: SessionId,
    #[serde(default)]
    pub id_dealer: Option<PersonId>,
    pub fichas: Vec<ChipLineBody>,
    #[serde(default)]
    pub notas: Option<String>,
}

async fn open_shift(
    app_state: web::Data<AppState>,
    body: ValidatedJson<OpenShiftRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shift = app_state.cardroom.open_shift(OpenShift {
        cashier_ids: body.cajeros_ids,
        dealer_ids: body.dealers_ids,
        opening_lines: chip_lines(body.fichas_a_caja),
        notes: body.notas,
        business_date: body.fecha_operativa,
    })?;
    Ok(HttpResponse::Created().json(shift))
}

async fn close_shift(
    app_state: web::Data<AppState>,
    path: web::Path<ShiftId>,
    body: ValidatedJson<CloseShiftRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shift = app_state.cardroom.close_shift(
        path.into_inner(),
        body.forzar,
        body.notas,
        body.efectivo_contado,
    )?;
    Ok(HttpResponse::Ok().json(shift))
}

async fn active_shift(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.active_shift()))
}

async fn preview_open(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.preview_open()))
}

async fn preview_close(
    app_state: web::Data<AppState>,
    query: web::Query<PreviewCloseQuery>,
) -> Result<HttpResponse, AppError> {
    let preview = app_state.cardroom.preview_close(query.efectivo_contado)?;
    Ok(HttpResponse::Ok().json(preview))
}

async fn statistics(
    app_state: web::Data<AppState>,
    path: web::Path<ShiftId>,
) -> Result<HttpResponse, AppError> {
    let stats = app_state.cardroom.statistics(path.into_inner())?;
    Ok(HttpResponse::Ok().json(stats))
}

async fn closed_shifts(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.closed_shifts()))
}

async fn record_event(
    app_state: web::Data<AppState>,
    body: ValidatedJson<FinancialEventRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shift_id = app_state.cardroom.active_shift_id()?;
    let totals = app_state.cardroom.record_financial_event(
        shift_id,
        body.tipo,
        body.monto,
        body.id_jugador,
        body.notas,
    )?;
    Ok(HttpResponse::Created().json(totals))
}

async fn record_rake(
    app_state: web::Data<AppState>,
    body: ValidatedJson<RakeRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shift_id = app_state.cardroom.active_shift_id()?;
    let rake = app_state.cardroom.record_rake(
        shift_id,
        body.id_sesion,
        body.id_dealer,
        chip_lines(body.fichas),
        body.notas,
    )?;
    Ok(HttpResponse::Created().json(rake))
}

async fn active_rakes(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.active_rakes()?))
}

async fn active_dealers(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.dealers()?))
}

/// Chip inventory as seen from the open shift; 409 without one.
async fn active_chips(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    app_state.cardroom.active_shift_id()?;
    Ok(HttpResponse::Ok().json(app_state.cardroom.inventory()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/abrir", web::post().to(open_shift))
        .route("/activo", web::get().to(active_shift))
        .route("/preview-apertura", web::get().to(preview_open))
        .route("/preview-cierre", web::get().to(preview_close))
        .route("/cerrados", web::get().to(closed_shifts))
        .route("/activo/eventos", web::post().to(record_event))
        .route("/activo/rake", web::post().to(record_rake))
        .route("/activo/rakes", web::get().to(active_rakes))
        .route("/activo/dealers", web::get().to(active_dealers))
        .route("/activo/fichas", web::get().to(active_chips))
        .route("/{id}/cerrar", web::post().to(close_shift))
        .route("/{id}/estadisticas", web::get().to(statistics));
}
