//! Admin audit log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Administrative mutation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    #[sea_orm(string_value = "announcement_published")]
    AnnouncementPublished,
    #[sea_orm(string_value = "announcement_deleted")]
    AnnouncementDeleted,
    #[sea_orm(string_value = "user_disabled")]
    UserDisabled,
}

/// One row per administrative mutation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub admin_id: String,

    pub action: AdminAction,

    #[sea_orm(nullable)]
    pub target_user_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
