//! Announcement entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Site-wide notice written by an admin. Drafts stay hidden until published.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcement")]
pub struct Model {
    /// Unique announcement ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Title of the announcement.
    pub title: String,

    /// Body of the announcement.
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Admin who wrote it.
    pub created_by: String,

    /// Whether the announcement is visible to users.
    #[sea_orm(default_value = false)]
    pub is_published: bool,

    /// When it was published.
    #[sea_orm(nullable)]
    pub published_at: Option<DateTimeWithTimeZone>,

    /// When the announcement was created.
    pub created_at: DateTimeWithTimeZone,

    /// When the announcement was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
