//! Monthly platform fee totals.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platform_earnings")]
pub struct Model {
    /// `YYYY-MM`
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: String,

    /// Sum of platform fees, in cents.
    pub total_earnings: i64,

    pub transaction_count: i64,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
