//! Create folder table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Folder::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Folder::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Folder::CircleId).string_len(32).not_null())
                    .col(ColumnDef::new(Folder::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Folder::Description).text())
                    .col(ColumnDef::new(Folder::CreatedBy).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Folder::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Folder::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_folder_circle")
                            .from(Folder::Table, Folder::CircleId)
                            .to(Circle::Table, Circle::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_folder_created_by")
                            .from(Folder::Table, Folder::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_folder_circle_id")
                    .table(Folder::Table)
                    .col(Folder::CircleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Folder::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Folder {
    Table,
    Id,
    CircleId,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Circle {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
