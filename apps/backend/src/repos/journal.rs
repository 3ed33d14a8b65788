//! Journal repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::journal_sea::{self as journal_adapter, JournalRowCreate};
use crate::domain::JournalEntry;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Persist one entry at position `seq`.
pub async fn append<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    seq: i64,
    entry: &JournalEntry,
) -> Result<(), DomainError> {
    let payload = serde_json::to_string(entry).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("serialize".to_string()),
            format!("journal entry {seq}: {e}"),
        )
    })?;

    journal_adapter::insert_row(
        conn,
        JournalRowCreate {
            seq,
            kind: entry.kind().to_string(),
            payload,
            recorded_at: OffsetDateTime::now_utc(),
        },
    )
    .await?;
    Ok(())
}

/// Load every stored entry in sequence order, with its sequence number.
///
/// A row whose payload does not decode is reported as data corruption.
pub async fn load_entries<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(i64, JournalEntry)>, DomainError> {
    let rows = journal_adapter::load_all(conn).await?;
    rows.into_iter()
        .map(|row| {
            serde_json::from_str::<JournalEntry>(&row.payload)
                .map(|entry| (row.seq, entry))
                .map_err(|e| {
                    DomainError::infra(
                        InfraErrorKind::DataCorruption,
                        format!("journal row {} ({}): {e}", row.seq, row.kind),
                    )
                })
        })
        .collect()
}

pub async fn count<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(journal_adapter::count_rows(conn).await?)
}
