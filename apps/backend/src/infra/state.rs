use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::config::{EngineConfig, JournalConfig};
use crate::domain::Room;
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::infra::db::bootstrap_db;
use crate::repos::journal as journal_repo;
use crate::services::journal::spawn_writer;
use crate::services::{CardroomService, ChannelJournal};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    engine: EngineConfig,
    journal: JournalConfig,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            engine: EngineConfig::default(),
            journal: JournalConfig { database_url: None },
        }
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_journal(mut self, journal: JournalConfig) -> Self {
        self.journal = journal;
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.journal.database_url = Some(url.into());
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let policy = self.engine.policy();
        let Some(url) = self.journal.database_url else {
            info!("no DATABASE_URL, journal kept in memory");
            let service = CardroomService::in_memory(policy);
            return Ok(AppState::new(Arc::new(service), None, self.engine));
        };

        // single entrypoint: build + migrate
        let conn = bootstrap_db(&url).await?;
        let stored = journal_repo::load_entries(&conn).await?;
        let next_seq = stored.last().map_or(1, |(seq, _)| seq + 1);

        let mut room = Room::new(policy);
        for (seq, entry) in &stored {
            room.apply(entry).map_err(|e| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("journal entry {seq} ({}) does not replay: {e}", entry.kind()),
                )
            })?;
        }
        info!(entries = stored.len(), next_seq, "journal replayed");

        let (tx, rx) = mpsc::unbounded_channel();
        spawn_writer(conn.clone(), rx);
        let journal = ChannelJournal::new(tx, next_seq);
        let service = CardroomService::new(room, Arc::new(journal));
        Ok(AppState::new(Arc::new(service), Some(conn), self.engine))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
