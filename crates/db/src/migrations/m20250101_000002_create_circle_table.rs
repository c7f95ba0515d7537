//! Create `circle` and `circle_member` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Circle::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Circle::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Circle::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Circle::Description).text())
                    .col(ColumnDef::new(Circle::CreatorId).string_len(32).not_null())
                    .col(ColumnDef::new(Circle::IsPublic).boolean().not_null().default(true))
                    .col(ColumnDef::new(Circle::InvitationCode).string_len(64).unique_key())
                    .col(
                        ColumnDef::new(Circle::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Circle::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_circle_creator")
                            .from(Circle::Table, Circle::CreatorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_circle_creator_id")
                    .table(Circle::Table)
                    .col(Circle::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_circle_is_public_updated_at")
                    .table(Circle::Table)
                    .col(Circle::IsPublic)
                    .col(Circle::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CircleMember::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CircleMember::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CircleMember::CircleId).string_len(32).not_null())
                    .col(ColumnDef::new(CircleMember::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(CircleMember::Role)
                            .string_len(20)
                            .not_null()
                            .default("member"),
                    )
                    .col(
                        ColumnDef::new(CircleMember::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_circle_member_circle")
                            .from(CircleMember::Table, CircleMember::CircleId)
                            .to(Circle::Table, Circle::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_circle_member_user")
                            .from(CircleMember::Table, CircleMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership per (circle, user)
        manager
            .create_index(
                Index::create()
                    .name("idx_circle_member_circle_user")
                    .table(CircleMember::Table)
                    .col(CircleMember::CircleId)
                    .col(CircleMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_circle_member_user_id")
                    .table(CircleMember::Table)
                    .col(CircleMember::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CircleMember::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Circle::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Circle {
    Table,
    Id,
    Name,
    Description,
    CreatorId,
    IsPublic,
    InvitationCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CircleMember {
    Table,
    Id,
    CircleId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
