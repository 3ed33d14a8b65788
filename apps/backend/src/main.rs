use actix_web::{web, App, HttpServer};
use cardroom::config::{EngineConfig, JournalConfig, ServerConfig};
use cardroom::infra::state::build_state;
use cardroom::middleware::{cors_middleware, RequestTrace, StructuredLogger};
use cardroom::routes;
use tracing::info;

mod telemetry;

fn or_exit<T>(result: Result<T, cardroom::AppError>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("❌ {what}: {e}");
        std::process::exit(1);
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let server = or_exit(ServerConfig::from_env(), "invalid server configuration");
    let engine = or_exit(EngineConfig::from_env(), "invalid engine configuration");
    let journal = or_exit(JournalConfig::from_env(), "invalid journal configuration");

    let app_state = or_exit(
        build_state()
            .with_engine(engine)
            .with_journal(journal)
            .build()
            .await,
        "failed to build application state",
    );

    let (host, port) = server.bind_addr();
    info!(
        host = %host,
        port,
        journal = app_state.cardroom.journal_backend(),
        "starting cardroom backend"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
