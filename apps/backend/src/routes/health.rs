use actix_web::{web, HttpResponse};
use migration::latest_applied;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    journal: &'static str,
    journal_status: &'static str,
    db: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    migration: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    time: OffsetDateTime,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (db, db_error, migration) = match &app_state.db {
        None => ("not_configured", None, None),
        Some(conn) => match conn.ping().await {
            Ok(()) => {
                let migration = latest_applied(conn)
                    .await
                    .unwrap_or_else(|_| Some("unknown".to_string()));
                ("ok", None, migration)
            }
            Err(e) => ("error", Some(format!("DB ping failed: {e}")), None),
        },
    };

    let journal_up = app_state.cardroom.journal_available();
    let mut response = if journal_up {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    Ok(response.json(HealthResponse {
        status: if journal_up { "ok" } else { "degraded" },
        app_version: env!("CARGO_PKG_VERSION"),
        journal: app_state.cardroom.journal_backend(),
        journal_status: if journal_up { "ok" } else { "unavailable" },
        db,
        db_error,
        migration,
        time: OffsetDateTime::now_utc(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(health));
}
