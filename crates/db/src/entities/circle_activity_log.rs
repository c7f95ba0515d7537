//! Circle activity log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of activity recorded for a circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    #[sea_orm(string_value = "member_joined")]
    MemberJoined,
    #[sea_orm(string_value = "member_left")]
    MemberLeft,
    #[sea_orm(string_value = "member_removed")]
    MemberRemoved,
    #[sea_orm(string_value = "file_uploaded")]
    FileUploaded,
    #[sea_orm(string_value = "file_deleted")]
    FileDeleted,
    #[sea_orm(string_value = "folder_created")]
    FolderCreated,
    #[sea_orm(string_value = "folder_deleted")]
    FolderDeleted,
    #[sea_orm(string_value = "circle_updated")]
    CircleUpdated,
}

/// Append-only activity entry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "circle_activity_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub circle_id: String,

    /// Actor; nulled if the user is deleted.
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    pub action: ActivityAction,

    #[sea_orm(nullable)]
    pub target_id: Option<String>,

    /// `user`, `file`, `folder` or `circle`
    #[sea_orm(nullable)]
    pub target_type: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::circle::Entity",
        from = "Column::CircleId",
        to = "super::circle::Column::Id",
        on_delete = "Cascade"
    )]
    Circle,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::circle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Circle.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
