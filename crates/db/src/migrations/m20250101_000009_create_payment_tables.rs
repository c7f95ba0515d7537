//! Create `payment_order`, `user_earnings` and `platform_earnings` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentOrder::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentOrder::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentOrder::FileId).string_len(32).not_null())
                    .col(ColumnDef::new(PaymentOrder::BuyerId).string_len(32).not_null())
                    .col(ColumnDef::new(PaymentOrder::SellerId).string_len(32).not_null())
                    .col(ColumnDef::new(PaymentOrder::Amount).big_integer().not_null())
                    .col(ColumnDef::new(PaymentOrder::PlatformFee).big_integer().not_null())
                    .col(ColumnDef::new(PaymentOrder::SellerAmount).big_integer().not_null())
                    .col(ColumnDef::new(PaymentOrder::PaymentMethod).string_len(20).not_null())
                    .col(
                        ColumnDef::new(PaymentOrder::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(PaymentOrder::TransactionId).string_len(128))
                    .col(
                        ColumnDef::new(PaymentOrder::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PaymentOrder::CompletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_order_file")
                            .from(PaymentOrder::Table, PaymentOrder::FileId)
                            .to(File::Table, File::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_order_file_buyer")
                    .table(PaymentOrder::Table)
                    .col(PaymentOrder::FileId)
                    .col(PaymentOrder::BuyerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_order_seller_id")
                    .table(PaymentOrder::Table)
                    .col(PaymentOrder::SellerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_order_buyer_id")
                    .table(PaymentOrder::Table)
                    .col(PaymentOrder::BuyerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserEarnings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserEarnings::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserEarnings::TotalEarnings)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserEarnings::WithdrawnAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserEarnings::AvailableAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserEarnings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_earnings_user")
                            .from(UserEarnings::Table, UserEarnings::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlatformEarnings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlatformEarnings::Month)
                            .string_len(7)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlatformEarnings::TotalEarnings)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlatformEarnings::TransactionCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlatformEarnings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlatformEarnings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserEarnings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentOrder::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PaymentOrder {
    Table,
    Id,
    FileId,
    BuyerId,
    SellerId,
    Amount,
    PlatformFee,
    SellerAmount,
    PaymentMethod,
    Status,
    TransactionId,
    CreatedAt,
    CompletedAt,
}

#[derive(Iden)]
enum UserEarnings {
    Table,
    UserId,
    TotalEarnings,
    WithdrawnAmount,
    AvailableAmount,
    UpdatedAt,
}

#[derive(Iden)]
enum PlatformEarnings {
    Table,
    Month,
    TotalEarnings,
    TransactionCount,
    UpdatedAt,
}

#[derive(Iden)]
enum File {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
