//! Create `announcement` and `admin_log` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcement::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcement::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Announcement::Content).text().not_null())
                    .col(ColumnDef::new(Announcement::CreatedBy).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Announcement::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Announcement::PublishedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Announcement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Announcement::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdminLog::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(AdminLog::AdminId).string_len(32).not_null())
                    .col(ColumnDef::new(AdminLog::Action).string_len(32).not_null())
                    .col(ColumnDef::new(AdminLog::TargetUserId).string_len(32))
                    .col(ColumnDef::new(AdminLog::Details).text())
                    .col(
                        ColumnDef::new(AdminLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_log_created_at")
                    .table(AdminLog::Table)
                    .col(AdminLog::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
    Title,
    Content,
    CreatedBy,
    IsPublished,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AdminLog {
    Table,
    Id,
    AdminId,
    Action,
    TargetUserId,
    Details,
    CreatedAt,
}
