//! Entry entity (votable directory listings).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Display title
    pub title: String,

    /// Directory kind the entry belongs to
    pub kind: EntryKind,

    /// Editorial status
    pub status: ContentStatus,

    /// Whether the entry sits in the voting pool for nomination rounds
    pub in_voting: bool,

    /// Opaque public voting reference, assigned on first save
    #[sea_orm(unique, nullable)]
    pub reference: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Kind of directory listing an entry represents.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[sea_orm(string_value = "business")]
    Business,
    #[sea_orm(string_value = "person")]
    Person,
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "location")]
    Location,
}

impl EntryKind {
    /// Lowercase slug, used as the reference namespace.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Person => "person",
            Self::Event => "event",
            Self::Location => "location",
        }
    }
}

/// Editorial status shared by entries and rounds.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "draft")]
    Draft,
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
