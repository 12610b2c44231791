//! Public round standings.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use ovation_common::AppResult;
use ovation_core::{SortMode, SortedRow};
use serde::{Deserialize, Serialize};

use crate::middleware::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{reference}/totals", get(round_totals))
}

#[derive(Debug, Deserialize)]
pub struct TotalsQuery {
    pub sort: Option<String>,
}

/// Standings response for one round.
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub round_reference: String,
    pub results: Vec<SortedRow>,
}

/// Live vote totals for a round, ordered by the requested sort mode.
async fn round_totals(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(query): Query<TotalsQuery>,
) -> AppResult<Json<TotalsResponse>> {
    let mode = query
        .sort
        .as_deref()
        .map_or(SortMode::Recent, SortMode::parse);

    let results = state.vote_service.totals(&reference, mode).await?;

    Ok(Json(TotalsResponse {
        round_reference: reference,
        results,
    }))
}
