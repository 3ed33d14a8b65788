//! `/mesas`: tables, table sessions and player seats.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{chip_lines, ChipLineBody};
use crate::domain::{PaymentMethod, PersonId, PlayerId, SeatId, SeatRequest, SessionId, TableId, TableUpdate};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::extractors::ValidatedJson;
use crate::state::app_state::AppState;

const DEFAULT_CAPACITY: u32 = 9;

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub numero_mesa: u32,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub capacidad: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTableRequest {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub capacidad: Option<u32>,
    #[serde(default)]
    pub activa: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub id_mesa: TableId,
    #[serde(default)]
    pub stakes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignDealerRequest {
    pub id_dealer: PersonId,
}

#[derive(Debug, Deserialize)]
pub struct SeatPlayerRequest {
    pub id_jugador: PlayerId,
    #[serde(default)]
    pub asiento: Option<u32>,
    pub fichas: Vec<ChipLineBody>,
    pub metodo_pago: PaymentMethod,
}

#[derive(Debug, Deserialize)]
pub struct RebuyRequest {
    pub fichas: Vec<ChipLineBody>,
    pub metodo_pago: PaymentMethod,
}

#[derive(Debug, Deserialize)]
pub struct CashOutRequest {
    #[serde(default)]
    pub fichas: Vec<ChipLineBody>,
    pub metodo_cobro: PaymentMethod,
}

async fn list_tables(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.tables()))
}

async fn create_table(
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateTableRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let name = body
        .nombre
        .unwrap_or_else(|| format!("Mesa {}", body.numero_mesa));
    let table = app_state.cardroom.register_table(
        body.numero_mesa,
        name,
        body.capacidad.unwrap_or(DEFAULT_CAPACITY),
    )?;
    Ok(HttpResponse::Created().json(table))
}

async fn update_table(
    app_state: web::Data<AppState>,
    path: web::Path<TableId>,
    body: ValidatedJson<UpdateTableRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let table = app_state.cardroom.update_table(
        path.into_inner(),
        TableUpdate {
            name: body.nombre,
            capacity: body.capacidad,
            active: body.activa,
        },
    )?;
    Ok(HttpResponse::Ok().json(table))
}

async fn active_sessions(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.cardroom.active_sessions()))
}

async fn session_detail(
    app_state: web::Data<AppState>,
    path: web::Path<SessionId>,
) -> Result<HttpResponse, AppError> {
    let detail = app_state.cardroom.session_detail(path.into_inner())?;
    Ok(HttpResponse::Ok().json(detail))
}

async fn start_session(
    app_state: web::Data<AppState>,
    body: ValidatedJson<StartSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shift_id = app_state.cardroom.active_shift_id()?;
    let session = app_state.cardroom.open_session(
        shift_id,
        body.id_mesa,
        body.stakes.unwrap_or_default(),
    )?;
    Ok(HttpResponse::Created().json(session))
}

async fn close_session(
    app_state: web::Data<AppState>,
    path: web::Path<SessionId>,
) -> Result<HttpResponse, AppError> {
    let shift_id = app_state.cardroom.active_shift_id()?;
    let session = app_state
        .cardroom
        .close_session(shift_id, path.into_inner())?;
    Ok(HttpResponse::Ok().json(session))
}

async fn assign_dealer(
    app_state: web::Data<AppState>,
    path: web::Path<SessionId>,
    body: ValidatedJson<AssignDealerRequest>,
) -> Result<HttpResponse, AppError> {
    let shift_id = app_state.cardroom.active_shift_id()?;
    let session =
        app_state
            .cardroom
            .assign_dealer(shift_id, path.into_inner(), body.id_dealer)?;
    Ok(HttpResponse::Ok().json(session))
}

async fn seat_player(
    app_state: web::Data<AppState>,
    path: web::Path<SessionId>,
    body: ValidatedJson<SeatPlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shift_id = app_state.cardroom.active_shift_id()?;
    let outcome = app_state.cardroom.seat_player(
        shift_id,
        SeatRequest {
            session_id: path.into_inner(),
            player_id: body.id_jugador,
            seat_number: body.asiento,
            lines: chip_lines(body.fichas),
            payment_method: body.metodo_pago,
        },
    )?;
    Ok(HttpResponse::Created().json(outcome))
}

/// Seats are addressed under their session; a seat from another session is
/// reported as not found.
fn seat_in_session(
    app_state: &AppState,
    session_id: SessionId,
    seat_id: SeatId,
) -> Result<(), AppError> {
    let seat = app_state.cardroom.seat(seat_id)?;
    if seat.session_id != session_id {
        return Err(DomainError::not_found(
            NotFoundKind::Seat,
            format!("seat {seat_id} in session {session_id}"),
        )
        .into());
    }
    Ok(())
}

async fn rebuy(
    app_state: web::Data<AppState>,
    path: web::Path<(SessionId, SeatId)>,
    body: ValidatedJson<RebuyRequest>,
) -> Result<HttpResponse, AppError> {
    let (session_id, seat_id) = path.into_inner();
    let body = body.into_inner();
    seat_in_session(&app_state, session_id, seat_id)?;
    let shift_id = app_state.cardroom.active_shift_id()?;
    let outcome = app_state.cardroom.rebuy(
        shift_id,
        seat_id,
        chip_lines(body.fichas),
        body.metodo_pago,
    )?;
    Ok(HttpResponse::Ok().json(outcome))
}

async fn cash_out(
    app_state: web::Data<AppState>,
    path: web::Path<(SessionId, SeatId)>,
    body: ValidatedJson<CashOutRequest>,
) -> Result<HttpResponse, AppError> {
    let (session_id, seat_id) = path.into_inner();
    let body = body.into_inner();
    seat_in_session(&app_state, session_id, seat_id)?;
    let shift_id = app_state.cardroom.active_shift_id()?;
    let outcome = app_state.cardroom.cash_out(
        shift_id,
        seat_id,
        chip_lines(body.fichas),
        body.metodo_cobro,
    )?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_tables))
        .route("", web::post().to(create_table))
        .route("/sesiones/activas", web::get().to(active_sessions))
        .route("/sesiones/iniciar", web::post().to(start_session))
        .route("/sesiones/{id}", web::get().to(session_detail))
        .route("/sesiones/{id}/cerrar", web::post().to(close_session))
        .route("/sesiones/{id}/dealer", web::post().to(assign_dealer))
        .route("/sesiones/{id}/sentar", web::post().to(seat_player))
        .route(
            "/sesiones/{id}/jugador/{seat_id}/recompra",
            web::post().to(rebuy),
        )
        .route(
            "/sesiones/{id}/jugador/{seat_id}/cashout",
            web::post().to(cash_out),
        )
        .route("/{id}", web::put().to(update_table));
}
