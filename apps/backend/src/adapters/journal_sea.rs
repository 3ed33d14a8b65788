//! SeaORM adapter for the journal table.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::journal_entries;

pub struct JournalRowCreate {
    pub seq: i64,
    pub kind: String,
    pub payload: String,
    pub recorded_at: OffsetDateTime,
}

pub async fn insert_row<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    row: JournalRowCreate,
) -> Result<journal_entries::Model, sea_orm::DbErr> {
    let active = journal_entries::ActiveModel {
        seq: Set(row.seq),
        kind: Set(row.kind),
        payload: Set(row.payload),
        recorded_at: Set(row.recorded_at),
    };
    active.insert(conn).await
}

/// All rows in sequence order.
pub async fn load_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<journal_entries::Model>, sea_orm::DbErr> {
    journal_entries::Entity::find()
        .order_by_asc(journal_entries::Column::Seq)
        .all(conn)
        .await
}

pub async fn count_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    journal_entries::Entity::find().count(conn).await
}
