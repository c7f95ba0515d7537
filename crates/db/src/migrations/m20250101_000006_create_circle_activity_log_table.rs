//! Create circle activity log table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CircleActivityLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CircleActivityLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CircleActivityLog::CircleId).string_len(32).not_null())
                    .col(ColumnDef::new(CircleActivityLog::UserId).string_len(32))
                    .col(ColumnDef::new(CircleActivityLog::Action).string_len(32).not_null())
                    .col(ColumnDef::new(CircleActivityLog::TargetId).string_len(32))
                    .col(ColumnDef::new(CircleActivityLog::TargetType).string_len(20))
                    .col(ColumnDef::new(CircleActivityLog::Description).text())
                    .col(
                        ColumnDef::new(CircleActivityLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_circle_activity_log_circle")
                            .from(CircleActivityLog::Table, CircleActivityLog::CircleId)
                            .to(Circle::Table, Circle::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_circle_activity_log_user")
                            .from(CircleActivityLog::Table, CircleActivityLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_circle_activity_log_circle_created_at")
                    .table(CircleActivityLog::Table)
                    .col(CircleActivityLog::CircleId)
                    .col(CircleActivityLog::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CircleActivityLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CircleActivityLog {
    Table,
    Id,
    CircleId,
    UserId,
    Action,
    TargetId,
    TargetType,
    Description,
    CreatedAt,
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
