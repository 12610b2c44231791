//! Public vote submission.

use axum::{Json, Router, extract::State, routing::post};
use ovation_common::AppResult;
use ovation_core::VoteReceipt;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::middleware::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_vote))
}

/// Vote submission request.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitVoteRequest {
    #[validate(length(min = 1, max = 64))]
    pub round_reference: String,
    #[validate(length(min = 1, max = 64))]
    pub participant_reference: String,
}

/// Record one vote for a participant in a round.
async fn submit_vote(
    State(state): State<AppState>,
    Json(req): Json<SubmitVoteRequest>,
) -> AppResult<Json<VoteReceipt>> {
    req.validate()?;

    let receipt = state
        .vote_service
        .record_vote(&req.round_reference, &req.participant_reference)
        .await?;

    info!(
        round = %receipt.round_reference,
        participant = %receipt.participant_reference,
        total = receipt.total,
        "vote recorded"
    );

    Ok(Json(receipt))
}
