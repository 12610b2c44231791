//! Vote tallying and competition ranking.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ovation_common::AppResult;
use ovation_db::entities::{entry::EntryKind, round};
use ovation_db::repositories::{EntryRepository, RoundRepository, VoteRepository};
use serde::{Deserialize, Serialize};

/// One participant's standing in a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRow {
    /// Storage id of the participating entry.
    pub entry_id: i64,
    /// Public reference of the participating entry.
    pub reference: String,
    /// Entry title at tally time.
    pub title: String,
    /// Entry kind at tally time.
    pub kind: EntryKind,
    /// Accumulated vote count.
    pub votes: i64,
    /// When the most recent vote landed, if any vote has.
    pub last_vote_at: Option<DateTime<Utc>>,
    /// Competition rank; tied rows share one.
    pub rank: u32,
}

/// Sorts `rows` by votes descending (entry id ascending between equals) and
/// assigns competition ranks: tied rows share a rank and the next rank is
/// skipped, so vote counts `[5, 5, 3]` rank as `[1, 1, 3]`.
pub fn assign_ranks(rows: &mut [RankedRow]) {
    rows.sort_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then_with(|| a.entry_id.cmp(&b.entry_id))
    });

    let mut current_rank = 0;
    let mut previous_votes = None;
    let mut position = 0u32;
    for row in rows.iter_mut() {
        position += 1;
        if previous_votes != Some(row.votes) {
            current_rank = position;
            previous_votes = Some(row.votes);
        }
        row.rank = current_rank;
    }
}

/// Computes live standings for voting rounds.
#[derive(Clone)]
pub struct RankingService {
    round_repo: RoundRepository,
    entry_repo: EntryRepository,
    vote_repo: VoteRepository,
}

impl RankingService {
    /// Create a new ranking service.
    #[must_use]
    pub const fn new(
        round_repo: RoundRepository,
        entry_repo: EntryRepository,
        vote_repo: VoteRepository,
    ) -> Self {
        Self {
            round_repo,
            entry_repo,
            vote_repo,
        }
    }

    /// Compute ranked standings for the round with the given reference.
    pub async fn rank(&self, round_reference: &str) -> AppResult<Vec<RankedRow>> {
        let round = self.round_repo.get_by_reference(round_reference).await?;
        self.rank_round(&round).await
    }

    /// Compute ranked standings for an already loaded round.
    ///
    /// Participants whose entry no longer exists, or whose entry never
    /// received a reference, are skipped. A round without a reference has
    /// no ledger rows and yields empty standings.
    pub async fn rank_round(&self, round: &round::Model) -> AppResult<Vec<RankedRow>> {
        let Some(round_reference) = round.reference.as_deref() else {
            return Ok(Vec::new());
        };

        let entries = self
            .entry_repo
            .find_by_ids(round.participant_ids.as_slice())
            .await?;

        let mut rows = Vec::with_capacity(entries.len());
        let mut references = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(reference) = entry.reference else {
                tracing::debug!(entry_id = entry.id, "skipping participant without reference");
                continue;
            };
            references.push(reference.clone());
            rows.push(RankedRow {
                entry_id: entry.id,
                reference,
                title: entry.title,
                kind: entry.kind,
                votes: 0,
                last_vote_at: None,
                rank: 0,
            });
        }

        let votes = self
            .vote_repo
            .find_for_round(round_reference, &references)
            .await?;
        let mut tallies: HashMap<String, (i64, DateTime<Utc>)> =
            HashMap::with_capacity(votes.len());
        for vote in votes {
            tallies.insert(
                vote.participant_reference,
                (vote.votes, vote.last_vote_at.with_timezone(&Utc)),
            );
        }

        for row in &mut rows {
            if let Some(&(count, at)) = tallies.get(&row.reference) {
                row.votes = count;
                row.last_vote_at = Some(at);
            }
        }

        assign_ranks(&mut rows);
        Ok(rows)
    }
}
