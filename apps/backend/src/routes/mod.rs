use actix_web::web;
use serde::Deserialize;

use crate::domain::{ChipLine, DenominationId};
use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod chips;
pub mod health;
pub mod players;
pub mod shifts;
pub mod tables;

/// Configure every route. `main.rs` and the integration tests share this so
/// both exercise the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _| {
        AppError::bad_request(ErrorCode::BadRequest, err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        AppError::bad_request(ErrorCode::BadRequest, err.to_string()).into()
    }));

    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/turnos").configure(shifts::configure_routes));
    cfg.service(web::scope("/mesas").configure(tables::configure_routes));
    cfg.service(web::scope("/fichas").configure(chips::configure_routes));
    cfg.service(web::scope("/jugadores").configure(players::configure_routes));
}

/// `{ "id_ficha": 3, "cantidad": 20 }`
#[derive(Debug, Clone, Deserialize)]
pub struct ChipLineBody {
    pub id_ficha: DenominationId,
    pub cantidad: u64,
}

pub(crate) fn chip_lines(body: Vec<ChipLineBody>) -> Vec<ChipLine> {
    body.into_iter()
        .map(|l| ChipLine::new(l.id_ficha, l.cantidad))
        .collect()
}
