use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum JournalEntries {
    Table,
    Seq,
    Kind,
    Payload,
    RecordedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // seq is assigned by the service, never by the database
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Seq)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalEntries::Kind).string().not_null())
                    .col(ColumnDef::new(JournalEntries::Payload).text().not_null())
                    .col(
                        ColumnDef::new(JournalEntries::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_kind")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::Kind)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(JournalEntries::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
