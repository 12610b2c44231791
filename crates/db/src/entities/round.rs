//! Voting round entity.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

pub use super::entry::ContentStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "round")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Display title
    pub title: String,

    /// Editorial status; archived rounds are set back to draft
    pub status: ContentStatus,

    /// Opaque public voting reference, assigned on first save
    #[sea_orm(unique, nullable)]
    pub reference: Option<String>,

    /// Lifecycle stage driving participant resolution
    pub stage: RoundStage,

    /// Scheduled opening time
    #[sea_orm(nullable)]
    pub starts_at: Option<DateTimeWithTimeZone>,

    /// Scheduled closing time
    #[sea_orm(nullable)]
    pub ends_at: Option<DateTimeWithTimeZone>,

    /// Planned length in whole days, kept in sync with the window
    pub duration_days: i32,

    /// Categories feeding nomination resolution
    #[sea_orm(column_type = "JsonBinary")]
    pub category_ids: IdList,

    /// Round whose results seed a final stage
    #[sea_orm(nullable)]
    pub source_round_id: Option<i64>,

    /// Hand-picked entries for custom rounds
    #[sea_orm(column_type = "JsonBinary")]
    pub manual_entry_ids: IdList,

    /// Cached participant list, recomputed on save and refresh
    #[sea_orm(column_type = "JsonBinary")]
    pub participant_ids: IdList,

    /// Editorial display field for the nominee count
    #[sea_orm(nullable)]
    pub nominee_limit: Option<i32>,

    /// Editorial display field for the number of places awarded
    #[sea_orm(nullable)]
    pub place_limit: Option<i32>,

    /// Frozen ranked entry ids, written when the round is ended
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub result_entry_ids: Option<IdList>,

    /// Frozen ranked rows exactly as computed at end time
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub result_rankings: Option<JsonValue>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Lifecycle stage of a voting round.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RoundStage {
    #[sea_orm(string_value = "nomination")]
    Nomination,
    #[sea_orm(string_value = "final")]
    Final,
    #[sea_orm(string_value = "custom")]
    Custom,
}

impl RoundStage {
    /// Normalize free-form stage input; anything unrecognized is custom.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "nomination" => Self::Nomination,
            "final" => Self::Final,
            _ => Self::Custom,
        }
    }
}

/// Canonical persisted representation of an id list.
///
/// Every list column stores a plain JSON array of positive integers.
/// [`IdList::normalized`] is the single place where raw input becomes
/// canonical: non-positive ids are dropped and duplicates keep their
/// first occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct IdList(pub Vec<i64>);

impl IdList {
    /// Build a canonical list from arbitrary input.
    #[must_use]
    pub fn normalized<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for id in ids {
            if id > 0 && seen.insert(id) {
                list.push(id);
            }
        }
        Self(list)
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the ids by value.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        self.0.as_slice()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }

    /// Keep at most `limit` leading ids.
    #[must_use]
    pub fn truncated(mut self, limit: usize) -> Self {
        self.0.truncate(limit);
        self
    }
}

impl From<Vec<i64>> for IdList {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
