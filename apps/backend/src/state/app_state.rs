use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::EngineConfig;
use crate::services::CardroomService;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// The room engine; every handler goes through it.
    pub cardroom: Arc<CardroomService>,
    /// Journal database connection (absent when the journal is in memory)
    pub db: Option<DatabaseConnection>,
    pub engine: EngineConfig,
}

impl AppState {
    pub fn new(
        cardroom: Arc<CardroomService>,
        db: Option<DatabaseConnection>,
        engine: EngineConfig,
    ) -> Self {
        Self {
            cardroom,
            db,
            engine,
        }
    }

    /// In-memory state with default engine settings.
    pub fn in_memory() -> Self {
        let engine = EngineConfig::default();
        let cardroom = CardroomService::in_memory(engine.policy());
        Self::new(Arc::new(cardroom), None, engine)
    }
}
