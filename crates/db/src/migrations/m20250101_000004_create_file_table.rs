//! Create file table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(File::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(File::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(File::CircleId).string_len(32).not_null())
                    .col(ColumnDef::new(File::FolderId).string_len(32))
                    .col(ColumnDef::new(File::UploaderId).string_len(32).not_null())
                    .col(ColumnDef::new(File::Filename).string_len(255).not_null())
                    .col(ColumnDef::new(File::FileKey).string_len(512).not_null())
                    .col(ColumnDef::new(File::FileUrl).text().not_null())
                    .col(ColumnDef::new(File::MimeType).string_len(128).not_null())
                    .col(ColumnDef::new(File::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(File::FileType).string_len(20).not_null())
                    .col(ColumnDef::new(File::IsPaid).boolean().not_null().default(false))
                    .col(ColumnDef::new(File::Price).big_integer())
                    .col(
                        ColumnDef::new(File::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_circle")
                            .from(File::Table, File::CircleId)
                            .to(Circle::Table, Circle::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_folder")
                            .from(File::Table, File::FolderId)
                            .to(Folder::Table, Folder::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_uploader")
                            .from(File::Table, File::UploaderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_circle_uploaded_at")
                    .table(File::Table)
                    .col(File::CircleId)
                    .col(File::UploadedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_folder_id")
                    .table(File::Table)
                    .col(File::FolderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_uploader_id")
                    .table(File::Table)
                    .col(File::UploaderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(File::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum File {
    Table,
    Id,
    CircleId,
    FolderId,
    UploaderId,
    Filename,
    FileKey,
    FileUrl,
    MimeType,
    FileSize,
    FileType,
    IsPaid,
    Price,
    UploadedAt,
}

#[derive(Iden)]
enum Circle {
    Table,
    Id,
}

#[derive(Iden)]
enum Folder {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
