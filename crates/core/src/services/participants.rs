//! Participant resolution for voting rounds.

use ovation_common::AppResult;
use ovation_db::entities::entry::EntryKind;
use ovation_db::entities::round::{IdList, RoundStage};
use ovation_db::repositories::{EntryRepository, RoundRepository};
use serde::Serialize;

/// How many finishers advance from a source round into a final.
const FINALIST_COUNT: usize = 5;

/// Compact entry descriptor for admin payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParticipantDetail {
    pub id: i64,
    pub title: String,
    pub kind: EntryKind,
}

/// Resolves which entries participate in a round.
#[derive(Clone)]
pub struct ParticipantResolver {
    entry_repo: EntryRepository,
    round_repo: RoundRepository,
}

impl ParticipantResolver {
    /// Create a new participant resolver.
    #[must_use]
    pub const fn new(entry_repo: EntryRepository, round_repo: RoundRepository) -> Self {
        Self {
            entry_repo,
            round_repo,
        }
    }

    /// Resolve the participant list for a round configuration.
    ///
    /// Nomination rounds draw published, voting-eligible entries from their
    /// categories. Final rounds advance the top finishers of their source
    /// round. Custom rounds take the hand-picked list as given, cleaned up
    /// but not filtered for eligibility.
    pub async fn resolve(
        &self,
        stage: &RoundStage,
        category_ids: &IdList,
        manual_entry_ids: &IdList,
        source_round_id: Option<i64>,
    ) -> AppResult<IdList> {
        match stage {
            RoundStage::Nomination => self.resolve_nomination(category_ids).await,
            RoundStage::Final => self.resolve_final(source_round_id).await,
            RoundStage::Custom => Ok(IdList::normalized(manual_entry_ids.iter())),
        }
    }

    async fn resolve_nomination(&self, category_ids: &IdList) -> AppResult<IdList> {
        if category_ids.is_empty() {
            return Ok(IdList::default());
        }

        let pool = self
            .entry_repo
            .find_nomination_pool(category_ids.as_slice())
            .await?;
        Ok(IdList::from(
            pool.into_iter().map(|entry| entry.id).collect::<Vec<_>>(),
        ))
    }

    /// Finals prefer the source round's frozen results. A source that was
    /// never ended falls back to its cached participant list, truncated
    /// before cleanup so the advancing field never exceeds the limit.
    async fn resolve_final(&self, source_round_id: Option<i64>) -> AppResult<IdList> {
        let Some(source_id) = source_round_id else {
            return Ok(IdList::default());
        };
        let Some(source) = self.round_repo.find_by_id(source_id).await? else {
            return Ok(IdList::default());
        };

        if let Some(results) = source.result_entry_ids {
            if !results.is_empty() {
                return Ok(results.truncated(FINALIST_COUNT));
            }
        }

        let fallback = source.participant_ids.truncated(FINALIST_COUNT);
        Ok(IdList::normalized(fallback.iter()))
    }

    /// Describe entries for display, in the order the ids are given.
    pub async fn details(&self, ids: &[i64]) -> AppResult<Vec<ParticipantDetail>> {
        let entries = self.entry_repo.find_by_ids(ids).await?;
        Ok(entries
            .into_iter()
            .map(|entry| ParticipantDetail {
                id: entry.id,
                title: entry.title,
                kind: entry.kind,
            })
            .collect())
    }
}
