//! Schema for the card-room journal.

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_journal; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261001_000001_journal::Migration)]
    }
}

/// Name of the latest applied migration, or `None` before the first run.
pub async fn latest_applied(db: &sea_orm::DatabaseConnection) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None), // migration table doesn't exist yet
        Err(e) => Err(e),
    }
}
