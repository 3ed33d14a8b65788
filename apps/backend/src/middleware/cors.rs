use std::env;

use actix_cors::Cors;
use actix_web::http::header;

const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// CORS for the cashier dashboard.
///
/// Origins come from `CORS_ALLOWED_ORIGINS` (comma-separated); without a valid
/// entry only the local dashboard dev servers are allowed.
pub fn cors_middleware() -> Cors {
    let configured = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
    let origins = parse_origins(&configured);

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    if origins.is_empty() {
        for origin in DEV_ORIGINS {
            cors = cors.allowed_origin(origin);
        }
    } else {
        for origin in &origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}
