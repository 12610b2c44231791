//! Category entity (editorial grouping for entries).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Display name
    pub name: String,

    /// URL-safe identifier
    #[sea_orm(unique)]
    pub slug: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry_category::Entity")]
    EntryCategory,
}

impl Related<super::entry_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
