//! Create circle category table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CircleCategory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CircleCategory::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CircleCategory::CircleId).string_len(32).not_null())
                    .col(ColumnDef::new(CircleCategory::Category).string_len(50).not_null())
                    .col(
                        ColumnDef::new(CircleCategory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_circle_category_circle")
                            .from(CircleCategory::Table, CircleCategory::CircleId)
                            .to(Circle::Table, Circle::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_circle_category_circle_id_category")
                    .table(CircleCategory::Table)
                    .col(CircleCategory::CircleId)
                    .col(CircleCategory::Category)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_circle_category_category")
                    .table(CircleCategory::Table)
                    .col(CircleCategory::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CircleCategory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CircleCategory {
    Table,
    Id,
    CircleId,
    Category,
    CreatedAt,
}

#[derive(Iden)]
enum Circle {
    Table,
    Id,
}
