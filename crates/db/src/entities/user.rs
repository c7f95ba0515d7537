//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user.
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Identity assigned by the external sign-in provider.
    #[sea_orm(unique)]
    pub open_id: String,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    #[sea_orm(nullable)]
    pub email: Option<String>,

    /// How the user signed in (provider name).
    #[sea_orm(nullable)]
    pub login_method: Option<String>,

    pub role: UserRole,

    /// Bearer token for API access
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Disabled accounts cannot authenticate.
    #[sea_orm(default_value = false)]
    pub is_disabled: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub last_signed_in_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::circle_member::Entity")]
    Memberships,
    #[sea_orm(has_many = "super::circle::Entity")]
    CreatedCircles,
}

impl Related<super::circle_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl Related<super::circle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedCircles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
