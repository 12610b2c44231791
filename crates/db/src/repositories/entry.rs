//! Entry repository.

use std::sync::Arc;

use crate::entities::{Entry, EntryCategory, entry, entry_category};
use ovation_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Entry repository for database operations.
#[derive(Clone)]
pub struct EntryRepository {
    db: Arc<DatabaseConnection>,
}

impl EntryRepository {
    /// Create a new entry repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an entry by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<entry::Model>> {
        Entry::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an entry by ID, failing if it does not exist.
    pub async fn get_by_id(&self, id: i64) -> AppResult<entry::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("entry {id}")))
    }

    /// Find entries by a set of IDs. Order follows the input list.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<entry::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut entries = Entry::find()
            .filter(entry::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        entries.sort_by_key(|e| ids.iter().position(|&id| id == e.id));
        Ok(entries)
    }

    /// Find an entry by its public voting reference.
    pub async fn find_by_reference(&self, reference: &str) -> AppResult<Option<entry::Model>> {
        Entry::find()
            .filter(entry::Column::Reference.eq(reference))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find published, in-pool entries that belong to any of the given
    /// categories, ordered by ID.
    pub async fn find_nomination_pool(&self, category_ids: &[i64]) -> AppResult<Vec<entry::Model>> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let memberships = EntryCategory::find()
            .filter(entry_category::Column::CategoryId.is_in(category_ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut entry_ids: Vec<i64> = memberships.iter().map(|m| m.entry_id).collect();
        entry_ids.sort_unstable();
        entry_ids.dedup();

        if entry_ids.is_empty() {
            return Ok(Vec::new());
        }

        Entry::find()
            .filter(entry::Column::Id.is_in(entry_ids))
            .filter(entry::Column::Status.eq(entry::ContentStatus::Published))
            .filter(entry::Column::InVoting.eq(true))
            .order_by_asc(entry::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new entry.
    pub async fn insert(&self, model: entry::ActiveModel) -> AppResult<entry::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing entry.
    pub async fn update(&self, model: entry::ActiveModel) -> AppResult<entry::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Assign a public voting reference to an entry.
    pub async fn set_reference(&self, id: i64, reference: &str) -> AppResult<entry::Model> {
        let model = entry::ActiveModel {
            id: Set(id),
            reference: Set(Some(reference.to_string())),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace an entry's category memberships.
    pub async fn replace_categories(&self, entry_id: i64, category_ids: &[i64]) -> AppResult<()> {
        EntryCategory::delete_many()
            .filter(entry_category::Column::EntryId.eq(entry_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if category_ids.is_empty() {
            return Ok(());
        }

        let memberships: Vec<entry_category::ActiveModel> = category_ids
            .iter()
            .map(|&category_id| entry_category::ActiveModel {
                entry_id: Set(entry_id),
                category_id: Set(category_id),
            })
            .collect();

        EntryCategory::insert_many(memberships)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::entry::{ContentStatus, EntryKind};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_entry(id: i64, title: &str, reference: Option<&str>) -> entry::Model {
        entry::Model {
            id,
            title: title.to_string(),
            kind: EntryKind::Business,
            status: ContentStatus::Published,
            in_voting: true,
            reference: reference.map(ToString::to_string),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_reference_found() {
        let entry = create_test_entry(3, "Harbor Grill", Some("business_3_k2v9w1xq"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry.clone()]])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let result = repo.find_by_reference("business_3_k2v9w1xq").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_find_by_reference_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<entry::Model>::new()])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let result = repo.find_by_reference("business_9_missing0").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<entry::Model>::new()])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let err = repo.get_by_id(42).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_ids_preserves_input_order() {
        let first = create_test_entry(1, "One", None);
        let second = create_test_entry(2, "Two", None);

        // Storage returns rows in id order; the caller asked for [2, 1].
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[first, second]])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let result = repo.find_by_ids(&[2, 1]).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 2);
        assert_eq!(result[1].id, 1);
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = EntryRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_nomination_pool_empty_categories() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = EntryRepository::new(db);
        let result = repo.find_nomination_pool(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_nomination_pool_no_memberships() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<entry_category::Model>::new()])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let result = repo.find_nomination_pool(&[7]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_nomination_pool_returns_pool_entries() {
        let membership = entry_category::Model {
            entry_id: 5,
            category_id: 7,
        };
        let entry = create_test_entry(5, "Corner Bakery", Some("business_5_aa11bb22"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[membership]])
                .append_query_results([[entry]])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let result = repo.find_nomination_pool(&[7]).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 5);
    }
}
