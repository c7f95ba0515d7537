//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_circle_table;
mod m20250101_000003_create_folder_table;
mod m20250101_000004_create_file_table;
mod m20250101_000005_create_file_share_link_table;
mod m20250101_000006_create_circle_activity_log_table;
mod m20250101_000007_create_circle_category_table;
mod m20250101_000008_create_admin_tables;
mod m20250101_000009_create_payment_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_circle_table::Migration),
            Box::new(m20250101_000003_create_folder_table::Migration),
            Box::new(m20250101_000004_create_file_table::Migration),
            Box::new(m20250101_000005_create_file_share_link_table::Migration),
            Box::new(m20250101_000006_create_circle_activity_log_table::Migration),
            Box::new(m20250101_000007_create_circle_category_table::Migration),
            Box::new(m20250101_000008_create_admin_tables::Migration),
            Box::new(m20250101_000009_create_payment_tables::Migration),
        ]
    }
}
