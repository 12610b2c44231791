//! Round repository.

use std::sync::Arc;

use crate::entities::{Round, round};
use ovation_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Round repository for database operations.
#[derive(Clone)]
pub struct RoundRepository {
    db: Arc<DatabaseConnection>,
}

impl RoundRepository {
    /// Create a new round repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a round by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<round::Model>> {
        Round::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a round by ID, failing if it does not exist.
    pub async fn get_by_id(&self, id: i64) -> AppResult<round::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RoundNotFound(format!("round {id}")))
    }

    /// Find a round by its public voting reference.
    pub async fn find_by_reference(&self, reference: &str) -> AppResult<Option<round::Model>> {
        Round::find()
            .filter(round::Column::Reference.eq(reference))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a round by reference, failing if it does not resolve.
    pub async fn get_by_reference(&self, reference: &str) -> AppResult<round::Model> {
        self.find_by_reference(reference)
            .await?
            .ok_or_else(|| AppError::RoundNotFound(reference.to_string()))
    }

    /// List published rounds ordered by start time.
    pub async fn list_published(&self) -> AppResult<Vec<round::Model>> {
        Round::find()
            .filter(round::Column::Status.eq(round::ContentStatus::Published))
            .order_by_asc(round::Column::StartsAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new round.
    pub async fn insert(&self, model: round::ActiveModel) -> AppResult<round::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing round.
    pub async fn update(&self, model: round::ActiveModel) -> AppResult<round::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set a round's editorial status.
    pub async fn set_status(
        &self,
        id: i64,
        status: round::ContentStatus,
    ) -> AppResult<round::Model> {
        let model = round::ActiveModel {
            id: Set(id),
            status: Set(status),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::round::{ContentStatus, IdList, RoundStage};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_round(id: i64, reference: Option<&str>) -> round::Model {
        round::Model {
            id,
            title: "Round of 2026".to_string(),
            status: ContentStatus::Published,
            reference: reference.map(ToString::to_string),
            stage: RoundStage::Nomination,
            starts_at: None,
            ends_at: None,
            duration_days: 0,
            category_ids: IdList::default(),
            source_round_id: None,
            manual_entry_ids: IdList::default(),
            participant_ids: IdList::normalized([5, 9]),
            nominee_limit: None,
            place_limit: None,
            result_entry_ids: None,
            result_rankings: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_reference_found() {
        let round = create_test_round(11, Some("round_11_p0q1r2s3"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[round.clone()]])
                .into_connection(),
        );

        let repo = RoundRepository::new(db);
        let result = repo.get_by_reference("round_11_p0q1r2s3").await.unwrap();

        assert_eq!(result.id, 11);
        assert_eq!(result.participant_ids.as_slice(), &[5, 9]);
    }

    #[tokio::test]
    async fn test_get_by_reference_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<round::Model>::new()])
                .into_connection(),
        );

        let repo = RoundRepository::new(db);
        let err = repo.get_by_reference("round_99_zzzzzzzz").await.unwrap_err();

        assert!(matches!(err, AppError::RoundNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_published() {
        let first = create_test_round(1, None);
        let second = create_test_round(2, Some("round_2_aa22bb33"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[first, second]])
                .into_connection(),
        );

        let repo = RoundRepository::new(db);
        let result = repo.list_published().await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
