//! API response types.

#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use ovation_db::entities::{entry, round};
use serde::Serialize;

/// Full round representation returned by the editor surface.
#[derive(Debug, Serialize)]
pub struct RoundResponse {
    pub id: i64,
    pub title: String,
    pub status: round::ContentStatus,
    pub reference: Option<String>,
    pub stage: round::RoundStage,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub duration_days: i32,
    pub category_ids: Vec<i64>,
    pub source_round_id: Option<i64>,
    pub manual_entry_ids: Vec<i64>,
    pub participant_ids: Vec<i64>,
    pub nominee_limit: Option<i32>,
    pub place_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_entry_ids: Option<Vec<i64>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<round::Model> for RoundResponse {
    fn from(round: round::Model) -> Self {
        Self {
            id: round.id,
            title: round.title,
            status: round.status,
            reference: round.reference,
            stage: round.stage,
            starts_at: round.starts_at.map(|t| t.with_timezone(&Utc)),
            ends_at: round.ends_at.map(|t| t.with_timezone(&Utc)),
            duration_days: round.duration_days,
            category_ids: round.category_ids.into_vec(),
            source_round_id: round.source_round_id,
            manual_entry_ids: round.manual_entry_ids.into_vec(),
            participant_ids: round.participant_ids.into_vec(),
            nominee_limit: round.nominee_limit,
            place_limit: round.place_limit,
            result_entry_ids: round.result_entry_ids.map(round::IdList::into_vec),
            created_at: round.created_at.with_timezone(&Utc),
            updated_at: round.updated_at.with_timezone(&Utc),
        }
    }
}

/// Entry representation returned by the editor surface.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: i64,
    pub title: String,
    pub kind: entry::EntryKind,
    pub status: entry::ContentStatus,
    pub in_voting: bool,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entry::Model> for EntryResponse {
    fn from(entry: entry::Model) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            kind: entry.kind,
            status: entry.status,
            in_voting: entry.in_voting,
            reference: entry.reference,
            created_at: entry.created_at.with_timezone(&Utc),
            updated_at: entry.updated_at.with_timezone(&Utc),
        }
    }
}
