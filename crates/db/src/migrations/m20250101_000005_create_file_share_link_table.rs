//! Create file share link table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FileShareLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FileShareLink::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FileShareLink::FileId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(FileShareLink::Token)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FileShareLink::CreatedBy).string_len(32).not_null())
                    .col(ColumnDef::new(FileShareLink::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(FileShareLink::DownloadCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FileShareLink::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_share_link_file")
                            .from(FileShareLink::Table, FileShareLink::FileId)
                            .to(File::Table, File::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_share_link_file_id")
                    .table(FileShareLink::Table)
                    .col(FileShareLink::FileId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FileShareLink::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FileShareLink {
    Table,
    Id,
    FileId,
    Token,
    CreatedBy,
    ExpiresAt,
    DownloadCount,
    CreatedAt,
}

#[derive(Iden)]
enum File {
    Table,
    Id,
}
