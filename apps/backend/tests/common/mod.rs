#![allow(dead_code)]

// tests/common/mod.rs
use std::str::FromStr;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, Error};
use cardroom::middleware::{RequestTrace, StructuredLogger};
use cardroom::routes;
use cardroom::AppState;
use rust_decimal::Decimal;
use serde_json::Value;

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// The production route table and middleware over `state`.
pub async fn app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}

pub async fn send<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            panic!("non-JSON body ({e}): {}", String::from_utf8_lossy(&body))
        })
    };
    (status, json)
}

pub async fn get<S>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    send(app, test::TestRequest::get().uri(uri).to_request()).await
}

pub async fn post<S>(app: &S, uri: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    send(
        app,
        test::TestRequest::post().uri(uri).set_json(body).to_request(),
    )
    .await
}

pub async fn put<S>(app: &S, uri: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    send(
        app,
        test::TestRequest::put().uri(uri).set_json(body).to_request(),
    )
    .await
}

/// Money fields serialize as decimal strings.
pub fn money(v: &Value) -> Decimal {
    match v {
        Value::String(s) => Decimal::from_str(s).unwrap_or_else(|e| panic!("{s}: {e}")),
        Value::Number(n) => {
            Decimal::from_str(&n.to_string()).unwrap_or_else(|e| panic!("{n}: {e}"))
        }
        other => panic!("not a money value: {other}"),
    }
}

pub fn id(v: &Value) -> i64 {
    v.as_i64().unwrap_or_else(|| panic!("not an id: {v}"))
}

/// A $5 denomination with 1000 chips in the vault, an open shift with 100 of
/// them in the register, table 1 and an active session on it.
pub struct FiveDollarFloor {
    pub five: i64,
    pub shift: i64,
    pub table: i64,
    pub session: i64,
}

pub async fn five_dollar_floor<S>(app: &S) -> FiveDollarFloor
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let (status, denom) = post(
        app,
        "/fichas",
        serde_json::json!({ "denominacion": 5, "color": "#FF0000", "cantidad_boveda": 1000 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{denom}");
    let five = id(&denom["id"]);

    let (status, shift) = post(
        app,
        "/turnos/abrir",
        serde_json::json!({
            "cajeros_ids": [7],
            "dealers_ids": [21],
            "fichas_a_caja": [{ "id_ficha": five, "cantidad": 100 }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{shift}");

    let (status, table) = post(app, "/mesas", serde_json::json!({ "numero_mesa": 1 })).await;
    assert_eq!(status, StatusCode::CREATED, "{table}");

    let (status, session) = post(
        app,
        "/mesas/sesiones/iniciar",
        serde_json::json!({ "id_mesa": id(&table["id"]), "stakes": "1/2" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{session}");

    FiveDollarFloor {
        five,
        shift: id(&shift["id"]),
        table: id(&table["id"]),
        session: id(&session["id"]),
    }
}
