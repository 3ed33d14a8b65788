use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{CreditAccount, Money, PlayerId};
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreditLimitRequest {
    pub limite: Money,
}

#[derive(Debug, Serialize)]
struct CreditAccountResponse {
    #[serde(flatten)]
    account: CreditAccount,
    #[serde(rename = "disponible")]
    available: Money,
}

async fn set_credit_limit(
    app_state: web::Data<AppState>,
    path: web::Path<PlayerId>,
    body: ValidatedJson<CreditLimitRequest>,
) -> Result<HttpResponse, AppError> {
    let account = app_state
        .cardroom
        .set_credit_limit(path.into_inner(), body.limite)?;
    Ok(HttpResponse::Ok().json(CreditAccountResponse {
        available: account.available(),
        account,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{id}/credito", web::post().to(set_credit_limit));
}
