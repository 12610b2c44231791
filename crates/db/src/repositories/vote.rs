//! Vote ledger repository.

use std::sync::Arc;

use crate::entities::{Vote, vote};
use chrono::{DateTime, Utc};
use ovation_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record one vote for a participant in a round.
    ///
    /// The increment is a single upsert statement keyed on the composite
    /// primary key, so concurrent submissions never lose counts. Returns
    /// the row as it stands after the write.
    pub async fn record(
        &self,
        round_reference: &str,
        participant_reference: &str,
        now: DateTime<Utc>,
    ) -> AppResult<vote::Model> {
        let model = vote::ActiveModel {
            round_reference: Set(round_reference.to_string()),
            participant_reference: Set(participant_reference.to_string()),
            votes: Set(1),
            last_vote_at: Set(now.into()),
        };

        Vote::insert(model)
            .on_conflict(
                OnConflict::columns([
                    vote::Column::RoundReference,
                    vote::Column::ParticipantReference,
                ])
                .value(vote::Column::Votes, Expr::col(vote::Column::Votes).add(1))
                .value(vote::Column::LastVoteAt, Expr::value(now))
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_pair(round_reference, participant_reference)
            .await?
            .ok_or_else(|| AppError::Internal("vote row missing after upsert".to_string()))
    }

    /// Find the ledger row for a round/participant pair.
    pub async fn find_pair(
        &self,
        round_reference: &str,
        participant_reference: &str,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find_by_id((
            round_reference.to_string(),
            participant_reference.to_string(),
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch ledger rows for the given participants of a round.
    pub async fn find_for_round(
        &self,
        round_reference: &str,
        participant_references: &[String],
    ) -> AppResult<Vec<vote::Model>> {
        if participant_references.is_empty() {
            return Ok(Vec::new());
        }

        Vote::find()
            .filter(vote::Column::RoundReference.eq(round_reference))
            .filter(vote::Column::ParticipantReference.is_in(participant_references.iter()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
