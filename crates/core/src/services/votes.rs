//! Vote recording.

use chrono::{DateTime, Utc};
use ovation_common::{AppError, AppResult};
use ovation_db::repositories::{EntryRepository, RoundRepository, VoteRepository};
use serde::Serialize;

use crate::services::ranking::RankingService;
use crate::services::sorting::{self, SortMode, SortedRow};

/// Receipt returned to a voter after a successful submission.
#[derive(Clone, Debug, Serialize)]
pub struct VoteReceipt {
    pub round_reference: String,
    pub participant_reference: String,
    /// Ledger count for this pair after the increment.
    pub total: i64,
    /// Count as seen by the post-increment ranking pass.
    pub votes: i64,
    pub rank: Option<u32>,
    pub last_vote_at: DateTime<Utc>,
}

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    round_repo: RoundRepository,
    entry_repo: EntryRepository,
    vote_repo: VoteRepository,
    ranking: RankingService,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(
        round_repo: RoundRepository,
        entry_repo: EntryRepository,
        vote_repo: VoteRepository,
        ranking: RankingService,
    ) -> Self {
        Self {
            round_repo,
            entry_repo,
            vote_repo,
            ranking,
        }
    }

    /// Record one anonymous vote.
    ///
    /// Both references must resolve, and the participant must sit in the
    /// round's cached list. Votes carried in other rounds do not admit a
    /// participant here.
    pub async fn record_vote(
        &self,
        round_reference: &str,
        participant_reference: &str,
    ) -> AppResult<VoteReceipt> {
        let round = self.round_repo.get_by_reference(round_reference).await?;
        let entry = self
            .entry_repo
            .find_by_reference(participant_reference)
            .await?
            .ok_or_else(|| AppError::ParticipantNotFound(participant_reference.to_string()))?;
        if !round.participant_ids.contains(entry.id) {
            return Err(AppError::ParticipantNotInRound(
                participant_reference.to_string(),
            ));
        }

        let now = Utc::now();
        let row = self
            .vote_repo
            .record(round_reference, participant_reference, now)
            .await?;

        // A fresh pass so the receipt reflects the standing this vote produced.
        let standings = self.ranking.rank_round(&round).await?;
        let standing = standings
            .iter()
            .find(|s| s.reference == participant_reference);

        Ok(VoteReceipt {
            round_reference: round_reference.to_string(),
            participant_reference: participant_reference.to_string(),
            total: row.votes,
            votes: standing.map_or(row.votes, |s| s.votes),
            rank: standing.map(|s| s.rank),
            last_vote_at: standing.and_then(|s| s.last_vote_at).unwrap_or(now),
        })
    }

    /// Ranked standings for a round, arranged for display.
    pub async fn totals(&self, round_reference: &str, mode: SortMode) -> AppResult<Vec<SortedRow>> {
        let rows = self.ranking.rank(round_reference).await?;
        Ok(sorting::apply(mode, rows))
    }
}
