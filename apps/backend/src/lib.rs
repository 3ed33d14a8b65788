//! Card-room chip ledger and shift reconciliation service.
//!
//! `domain` holds the room aggregate and is free of I/O; `services` serializes
//! access to it and journals every change; `routes` exposes it over HTTP.

#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

#[cfg(test)]
mod test_bootstrap;

pub use config::{EngineConfig, JournalConfig, ServerConfig};
pub use error::AppError;
pub use infra::state::{build_state, StateBuilder};
pub use middleware::{cors_middleware, RequestTrace, StructuredLogger};
pub use services::CardroomService;
pub use state::app_state::AppState;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::init_logging();
}
