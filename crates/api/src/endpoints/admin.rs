//! Editor endpoints.
//!
//! Every route here requires the configured editor token.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use ovation_common::AppResult;
use ovation_core::{
    BulkRoundAction, BulkSummary, EndOutcome, RefreshResult, RoundOverview, SaveEntryInput,
    SaveRoundInput,
};
use ovation_db::entities::entry::{ContentStatus, EntryKind};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    extractors::EditorAuth,
    middleware::AppState,
    response::{EntryResponse, RoundResponse},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rounds", get(rounds_overview).post(create_round))
        .route("/rounds/bulk", post(bulk_rounds))
        .route("/rounds/{id}", get(get_round).put(update_round))
        .route("/rounds/{id}/refresh", post(refresh_round))
        .route("/rounds/{id}/end", post(end_round))
        .route("/entries", post(create_entry))
        .route("/entries/{id}", get(get_entry).put(update_entry))
}

/// Round save request.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveRoundRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default = "default_status")]
    pub status: ContentStatus,
    /// Free-form stage name; unrecognized values fall back to custom.
    #[serde(default)]
    pub stage: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub duration_days: Option<i32>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    pub source_round_id: Option<i64>,
    #[serde(default)]
    pub manual_entry_ids: Vec<i64>,
    /// Explicit participant override; wins over the recomputed list.
    pub participant_ids: Option<Vec<i64>>,
    pub nominee_limit: Option<i32>,
    pub place_limit: Option<i32>,
}

impl SaveRoundRequest {
    fn into_input(self) -> SaveRoundInput {
        SaveRoundInput {
            title: self.title,
            status: self.status,
            stage: self.stage,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            duration_days: self.duration_days,
            category_ids: self.category_ids,
            source_round_id: self.source_round_id,
            manual_entry_ids: self.manual_entry_ids,
            participant_override: self.participant_ids,
            nominee_limit: self.nominee_limit,
            place_limit: self.place_limit,
        }
    }
}

/// Entry save request.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveEntryRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub kind: EntryKind,
    #[serde(default = "default_status")]
    pub status: ContentStatus,
    #[serde(default)]
    pub in_voting: bool,
    pub category_ids: Option<Vec<i64>>,
}

impl SaveEntryRequest {
    fn into_input(self) -> SaveEntryInput {
        SaveEntryInput {
            title: self.title,
            kind: self.kind,
            status: self.status,
            in_voting: self.in_voting,
            category_ids: self.category_ids,
        }
    }
}

const fn default_status() -> ContentStatus {
    ContentStatus::Published
}

/// Bulk round action request.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkRoundsRequest {
    pub action: BulkRoundAction,
    #[validate(length(min = 1))]
    pub round_ids: Vec<i64>,
}

/// End-round response with a human-readable notice.
#[derive(Debug, Serialize)]
pub struct EndRoundResponse {
    #[serde(flatten)]
    pub outcome: EndOutcome,
    pub notice: &'static str,
}

/// Schedule overview of all published rounds.
async fn rounds_overview(
    _auth: EditorAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RoundOverview>>> {
    Ok(Json(state.round_service.overview().await?))
}

async fn get_round(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RoundResponse>> {
    Ok(Json(state.round_service.get(id).await?.into()))
}

/// Create a round and resolve its participant list.
async fn create_round(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Json(req): Json<SaveRoundRequest>,
) -> AppResult<Json<RoundResponse>> {
    req.validate()?;

    let round = state.round_service.create(req.into_input()).await?;
    info!(round_id = round.id, "round created");

    Ok(Json(round.into()))
}

/// Update a round, re-syncing schedule and participants.
async fn update_round(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SaveRoundRequest>,
) -> AppResult<Json<RoundResponse>> {
    req.validate()?;

    let round = state.round_service.update(id, req.into_input()).await?;
    info!(round_id = round.id, "round updated");

    Ok(Json(round.into()))
}

/// Recompute and persist the cached participant list.
async fn refresh_round(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RefreshResult>> {
    let result = state.round_service.refresh(id).await?;
    info!(
        round_id = result.round_id,
        participants = result.participants.len(),
        "round participants refreshed"
    );

    Ok(Json(result))
}

/// End a round now, freezing its results.
async fn end_round(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EndRoundResponse>> {
    let outcome = state.round_service.end_now(id).await?;

    let notice = match outcome {
        EndOutcome::Ended { .. } => "Voting round ended.",
        EndOutcome::NotStarted { .. } => "Round has not started yet.",
    };
    info!(round_id = id, notice, "end requested");

    Ok(Json(EndRoundResponse { outcome, notice }))
}

/// Apply one action to many rounds, counting failures per round.
async fn bulk_rounds(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Json(req): Json<BulkRoundsRequest>,
) -> AppResult<Json<BulkSummary>> {
    req.validate()?;

    let summary = state.round_service.bulk(req.action, &req.round_ids).await?;
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "bulk round action finished"
    );

    Ok(Json(summary))
}

async fn get_entry(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EntryResponse>> {
    Ok(Json(state.entry_service.get(id).await?.into()))
}

/// Create an entry and assign its voting reference.
async fn create_entry(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Json(req): Json<SaveEntryRequest>,
) -> AppResult<Json<EntryResponse>> {
    req.validate()?;

    let entry = state.entry_service.create(req.into_input()).await?;
    info!(entry_id = entry.id, "entry created");

    Ok(Json(entry.into()))
}

/// Update an entry and its category memberships.
async fn update_entry(
    _auth: EditorAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SaveEntryRequest>,
) -> AppResult<Json<EntryResponse>> {
    req.validate()?;

    let entry = state.entry_service.update(id, req.into_input()).await?;
    info!(entry_id = entry.id, "entry updated");

    Ok(Json(entry.into()))
}
