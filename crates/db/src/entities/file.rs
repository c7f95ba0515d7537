//! File entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Media class derived from the MIME type at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "audio")]
    Audio,
    #[sea_orm(string_value = "image")]
    Image,
}

impl FileType {
    /// Classify a MIME type by its `video/`, `audio/` or `image/` prefix.
    #[must_use]
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with("video/") {
            Some(Self::Video)
        } else if mime_type.starts_with("audio/") {
            Some(Self::Audio)
        } else if mime_type.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }
}

/// Uploaded file metadata. The bytes live in object storage under `file_key`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub circle_id: String,

    /// Nulled when the folder is deleted.
    #[sea_orm(nullable, indexed)]
    pub folder_id: Option<String>,

    #[sea_orm(indexed)]
    pub uploader_id: String,

    /// Original filename
    pub filename: String,

    /// Object storage key
    pub file_key: String,

    pub file_url: String,

    pub mime_type: String,

    /// Size in bytes as reported by the uploader
    pub file_size: i64,

    pub file_type: FileType,

    /// Whether the file is for sale.
    #[sea_orm(default_value = false)]
    pub is_paid: bool,

    /// Price in cents; set iff `is_paid`.
    #[sea_orm(nullable)]
    pub price: Option<i64>,

    pub uploaded_at: DateTimeWithTimeZone,
}

impl Model {
    /// Price in cents if the file is currently for sale.
    #[must_use]
    pub fn sale_price(&self) -> Option<i64> {
        if self.is_paid {
            self.price.filter(|p| *p > 0)
        } else {
            None
        }
    }
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
        belongs_to = "super::folder::Entity",
        from = "Column::FolderId",
        to = "super::folder::Column::Id",
        on_delete = "SetNull"
    )]
    Folder,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UploaderId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Uploader,
    #[sea_orm(has_many = "super::file_share_link::Entity")]
    ShareLinks,
}

impl Related<super::circle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Circle.def()
    }
}

impl Related<super::folder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Folder.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl Related<super::file_share_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShareLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
