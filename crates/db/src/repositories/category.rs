//! Category repository.

use std::sync::Arc;

use crate::entities::{Category, category};
use ovation_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Category repository for database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find categories by a set of IDs.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<category::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Category::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
