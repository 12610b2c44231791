//! Entry management.

use std::collections::HashSet;

use chrono::Utc;
use ovation_common::{AppError, AppResult, ReferenceGenerator};
use ovation_db::entities::entry::{self, ContentStatus, EntryKind};
use ovation_db::entities::round::IdList;
use ovation_db::repositories::{CategoryRepository, EntryRepository};
use sea_orm::Set;

/// Fields accepted when creating or updating an entry.
#[derive(Clone, Debug)]
pub struct SaveEntryInput {
    pub title: String,
    pub kind: EntryKind,
    pub status: ContentStatus,
    pub in_voting: bool,
    /// Category memberships to replace wholesale, when given.
    pub category_ids: Option<Vec<i64>>,
}

/// Entry service for business logic.
#[derive(Clone)]
pub struct EntryService {
    entry_repo: EntryRepository,
    category_repo: CategoryRepository,
    reference_gen: ReferenceGenerator,
}

impl EntryService {
    /// Create a new entry service.
    #[must_use]
    pub const fn new(entry_repo: EntryRepository, category_repo: CategoryRepository) -> Self {
        Self {
            entry_repo,
            category_repo,
            reference_gen: ReferenceGenerator::new(),
        }
    }

    /// Fetch a single entry.
    pub async fn get(&self, id: i64) -> AppResult<entry::Model> {
        self.entry_repo.get_by_id(id).await
    }

    /// Create an entry.
    ///
    /// A public reference is minted as soon as the row has an id, so every
    /// entry leaves creation votable.
    pub async fn create(&self, input: SaveEntryInput) -> AppResult<entry::Model> {
        Self::check_title(&input.title)?;
        let categories = self.checked_categories(input.category_ids).await?;

        let namespace = input.kind.slug();
        let now = Utc::now();
        let model = entry::ActiveModel {
            title: Set(input.title),
            kind: Set(input.kind),
            status: Set(input.status),
            in_voting: Set(input.in_voting),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let inserted = self.entry_repo.insert(model).await?;

        let reference = self.reference_gen.generate(namespace, inserted.id);
        let entry = self.entry_repo.set_reference(inserted.id, &reference).await?;

        if let Some(category_ids) = categories {
            self.entry_repo
                .replace_categories(entry.id, &category_ids)
                .await?;
        }
        Ok(entry)
    }

    /// Update an entry.
    ///
    /// Entries that predate reference minting get one on their next save;
    /// an existing reference is never regenerated.
    pub async fn update(&self, id: i64, input: SaveEntryInput) -> AppResult<entry::Model> {
        Self::check_title(&input.title)?;
        let categories = self.checked_categories(input.category_ids).await?;
        let existing = self.entry_repo.get_by_id(id).await?;

        let namespace = input.kind.slug();
        let missing_reference = existing.reference.is_none();

        let mut model: entry::ActiveModel = existing.into();
        model.title = Set(input.title);
        model.kind = Set(input.kind);
        model.status = Set(input.status);
        model.in_voting = Set(input.in_voting);
        model.updated_at = Set(Utc::now().into());
        if missing_reference {
            model.reference = Set(Some(self.reference_gen.generate(namespace, id)));
        }
        let entry = self.entry_repo.update(model).await?;

        if let Some(category_ids) = categories {
            self.entry_repo.replace_categories(id, &category_ids).await?;
        }
        Ok(entry)
    }

    fn check_title(title: &str) -> AppResult<()> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        Ok(())
    }

    /// Normalizes the requested memberships and rejects ids that do not
    /// name a known category.
    async fn checked_categories(&self, ids: Option<Vec<i64>>) -> AppResult<Option<Vec<i64>>> {
        let Some(ids) = ids else {
            return Ok(None);
        };

        let wanted = IdList::normalized(ids);
        let found = self.category_repo.find_by_ids(wanted.as_slice()).await?;
        if found.len() != wanted.len() {
            let known: HashSet<i64> = found.iter().map(|category| category.id).collect();
            let missing: Vec<i64> = wanted.iter().filter(|id| !known.contains(id)).collect();
            return Err(AppError::Validation(format!(
                "unknown category ids: {missing:?}"
            )));
        }
        Ok(Some(wanted.into_vec()))
    }
}
