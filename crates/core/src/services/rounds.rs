//! Round lifecycle.
//!
//! Saving keeps the stored configuration canonical (stage, schedule,
//! id lists) and recomputes the cached participant list; ending freezes
//! results into the round row. Votes are never touched from here.

use chrono::{DateTime, Duration, Utc};
use ovation_common::{AppError, AppResult, ReferenceGenerator};
use ovation_db::entities::round::{self, ContentStatus, IdList, RoundStage};
use ovation_db::repositories::RoundRepository;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::services::participants::{ParticipantDetail, ParticipantResolver};
use crate::services::ranking::RankingService;

/// Most categories a round may draw from; excess is silently dropped.
const CATEGORY_LIMIT: usize = 12;

const SECONDS_PER_DAY: i64 = 86_400;

/// Fields accepted when creating or updating a round.
#[derive(Clone, Debug)]
pub struct SaveRoundInput {
    pub title: String,
    pub status: ContentStatus,
    /// Free-form; anything unrecognized is treated as custom.
    pub stage: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub duration_days: Option<i32>,
    pub category_ids: Vec<i64>,
    pub source_round_id: Option<i64>,
    pub manual_entry_ids: Vec<i64>,
    /// Explicit cached-list override; wins over resolution for any stage.
    pub participant_override: Option<Vec<i64>>,
    pub nominee_limit: Option<i32>,
    pub place_limit: Option<i32>,
}

/// Outcome of ending a round.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EndOutcome {
    /// The round was closed and its results frozen.
    Ended {
        round_id: i64,
        duration_days: i32,
        ended_at: DateTime<Utc>,
    },
    /// The round has no start yet, or it lies in the future. Nothing
    /// was changed.
    NotStarted { round_id: i64 },
}

/// Bulk action over rounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkRoundAction {
    EndNow,
    Archive,
}

/// Per-id tallies from a bulk action.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub succeeded: u32,
    pub failed: u32,
}

/// Outcome of a participant refresh.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshResult {
    pub round_id: i64,
    pub participants: Vec<i64>,
    pub details: Vec<ParticipantDetail>,
}

/// Derived schedule state of a round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Upcoming,
    Active,
    Expired,
    Unscheduled,
}

/// One row of the editor overview.
#[derive(Clone, Debug, Serialize)]
pub struct RoundOverview {
    pub id: i64,
    pub title: String,
    pub reference: Option<String>,
    pub stage: RoundStage,
    pub starts_at: Option<DateTime<Utc>>,
    /// Effective end: the explicit end when set, else start plus duration.
    pub ends_at: Option<DateTime<Utc>>,
    pub duration_days: i32,
    pub schedule_status: ScheduleStatus,
    pub participant_count: usize,
}

/// Round lifecycle service.
#[derive(Clone)]
pub struct RoundService {
    round_repo: RoundRepository,
    resolver: ParticipantResolver,
    ranking: RankingService,
    reference_gen: ReferenceGenerator,
}

impl RoundService {
    /// Create a new round service.
    #[must_use]
    pub const fn new(
        round_repo: RoundRepository,
        resolver: ParticipantResolver,
        ranking: RankingService,
    ) -> Self {
        Self {
            round_repo,
            resolver,
            ranking,
            reference_gen: ReferenceGenerator::new(),
        }
    }

    /// Fetch a single round.
    pub async fn get(&self, id: i64) -> AppResult<round::Model> {
        self.round_repo.get_by_id(id).await
    }

    /// Create a round.
    ///
    /// The row is inserted first so the reference and the participant
    /// resolution see a real id, then finalized like any other save.
    pub async fn create(&self, input: SaveRoundInput) -> AppResult<round::Model> {
        Self::check_title(&input.title)?;

        let now = Utc::now();
        let model = round::ActiveModel {
            title: Set(input.title.clone()),
            status: Set(input.status.clone()),
            stage: Set(RoundStage::parse_lenient(&input.stage)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let inserted = self.round_repo.insert(model).await?;

        self.apply(inserted, input).await
    }

    /// Update a round.
    pub async fn update(&self, id: i64, input: SaveRoundInput) -> AppResult<round::Model> {
        Self::check_title(&input.title)?;
        let existing = self.round_repo.get_by_id(id).await?;
        self.apply(existing, input).await
    }

    /// Shared save path: canonicalize the configuration, mint a missing
    /// reference, recompute the cached participants and persist the lot
    /// in one update.
    async fn apply(&self, round: round::Model, input: SaveRoundInput) -> AppResult<round::Model> {
        let stage = RoundStage::parse_lenient(&input.stage);
        let category_ids = IdList::normalized(input.category_ids).truncated(CATEGORY_LIMIT);
        let manual_entry_ids = IdList::normalized(input.manual_entry_ids);
        let schedule = sync_schedule(input.starts_at, input.ends_at, input.duration_days);

        let reference = match round.reference.clone() {
            Some(reference) => reference,
            None => self.reference_gen.generate("round", round.id),
        };

        let resolved = self
            .resolver
            .resolve(
                &stage,
                &category_ids,
                &manual_entry_ids,
                input.source_round_id,
            )
            .await?;
        let participant_ids = match input.participant_override {
            Some(ids) => IdList::normalized(ids),
            None => resolved,
        };

        let mut model: round::ActiveModel = round.into();
        model.title = Set(input.title);
        model.status = Set(input.status);
        model.reference = Set(Some(reference));
        model.stage = Set(stage);
        model.starts_at = Set(schedule.starts_at.map(Into::into));
        model.ends_at = Set(schedule.ends_at.map(Into::into));
        model.duration_days = Set(schedule.duration_days);
        model.category_ids = Set(category_ids);
        model.source_round_id = Set(input.source_round_id);
        model.manual_entry_ids = Set(manual_entry_ids);
        model.participant_ids = Set(participant_ids);
        model.nominee_limit = Set(input.nominee_limit);
        model.place_limit = Set(input.place_limit);
        model.updated_at = Set(Utc::now().into());
        self.round_repo.update(model).await
    }

    /// End a round now.
    ///
    /// A round that never started, or starts in the future, is left
    /// untouched. Otherwise the effective duration is recorded, the end
    /// is set to now, and the current standings are frozen into the row
    /// when the round has a reference. Ending again re-freezes.
    pub async fn end_now(&self, id: i64) -> AppResult<EndOutcome> {
        let round = self.round_repo.get_by_id(id).await?;
        let now = Utc::now();

        let Some(starts_at) = round.starts_at else {
            return Ok(EndOutcome::NotStarted { round_id: id });
        };
        let starts_at = starts_at.with_timezone(&Utc);
        if now < starts_at {
            return Ok(EndOutcome::NotStarted { round_id: id });
        }

        let duration_days = days_between(starts_at, now).max(1);

        let snapshot = if round.reference.is_some() {
            Some(self.ranking.rank_round(&round).await?)
        } else {
            None
        };

        let mut model: round::ActiveModel = round.into();
        model.ends_at = Set(Some(now.into()));
        model.duration_days = Set(duration_days);
        if let Some(rows) = snapshot {
            let ids: Vec<i64> = rows.iter().map(|row| row.entry_id).collect();
            model.result_entry_ids = Set(Some(IdList::from(ids)));
            model.result_rankings = Set(Some(
                serde_json::to_value(&rows).map_err(|e| AppError::Internal(e.to_string()))?,
            ));
        }
        model.updated_at = Set(now.into());
        self.round_repo.update(model).await?;

        Ok(EndOutcome::Ended {
            round_id: id,
            duration_days,
            ended_at: now,
        })
    }

    /// Run a bulk action, counting per-id outcomes instead of aborting.
    pub async fn bulk(&self, action: BulkRoundAction, round_ids: &[i64]) -> AppResult<BulkSummary> {
        let mut summary = BulkSummary::default();
        for &id in round_ids {
            let outcome = match action {
                BulkRoundAction::EndNow => self.bulk_end(id).await,
                BulkRoundAction::Archive => self.bulk_archive(id).await,
            };
            match outcome {
                Ok(true) => summary.succeeded += 1,
                Ok(false) => summary.failed += 1,
                Err(error) => {
                    tracing::warn!(round_id = id, %error, "bulk round action failed");
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn bulk_end(&self, id: i64) -> AppResult<bool> {
        match self.end_now(id).await {
            Ok(EndOutcome::Ended { .. }) => Ok(true),
            Ok(EndOutcome::NotStarted { .. }) => Ok(false),
            Err(AppError::RoundNotFound(_)) => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Archiving sets the round back to draft. Snapshots and the vote
    /// ledger stay as they are.
    async fn bulk_archive(&self, id: i64) -> AppResult<bool> {
        if self.round_repo.find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        self.round_repo.set_status(id, ContentStatus::Draft).await?;
        Ok(true)
    }

    /// Recompute the cached participant list from the stored
    /// configuration and overwrite it.
    pub async fn refresh(&self, id: i64) -> AppResult<RefreshResult> {
        let round = self.round_repo.get_by_id(id).await?;
        let resolved = self
            .resolver
            .resolve(
                &round.stage,
                &round.category_ids,
                &round.manual_entry_ids,
                round.source_round_id,
            )
            .await?;

        let mut model: round::ActiveModel = round.into();
        model.participant_ids = Set(resolved.clone());
        model.updated_at = Set(Utc::now().into());
        self.round_repo.update(model).await?;

        let details = self.resolver.details(resolved.as_slice()).await?;
        Ok(RefreshResult {
            round_id: id,
            participants: resolved.into_vec(),
            details,
        })
    }

    /// Published rounds ordered by start, with their derived schedule
    /// state.
    pub async fn overview(&self) -> AppResult<Vec<RoundOverview>> {
        let rounds = self.round_repo.list_published().await?;
        let now = Utc::now();
        Ok(rounds
            .into_iter()
            .map(|round| Self::overview_row(round, now))
            .collect())
    }

    fn overview_row(round: round::Model, now: DateTime<Utc>) -> RoundOverview {
        let starts_at = round.starts_at.map(|t| t.with_timezone(&Utc));
        let ends_at = effective_end(
            starts_at,
            round.ends_at.map(|t| t.with_timezone(&Utc)),
            round.duration_days,
        );

        let schedule_status = match (starts_at, ends_at) {
            (None, _) => ScheduleStatus::Unscheduled,
            (Some(start), _) if now < start => ScheduleStatus::Upcoming,
            (Some(_), Some(end)) if now > end => ScheduleStatus::Expired,
            (Some(_), _) => ScheduleStatus::Active,
        };

        RoundOverview {
            id: round.id,
            title: round.title,
            reference: round.reference,
            stage: round.stage,
            starts_at,
            ends_at,
            duration_days: round.duration_days,
            schedule_status,
            participant_count: round.participant_ids.len(),
        }
    }

    fn check_title(title: &str) -> AppResult<()> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Schedule fields after synchronization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Schedule {
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    duration_days: i32,
}

/// Keeps start, end and duration mutually consistent: start plus end
/// recompute the duration; start plus duration fill in a missing end.
fn sync_schedule(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    duration_days: Option<i32>,
) -> Schedule {
    let mut duration = duration_days.unwrap_or(0).max(0);
    let mut ends = ends_at;

    if let (Some(start), Some(end)) = (starts_at, ends) {
        duration = days_between(start, end);
    }
    if let (Some(start), None) = (starts_at, ends) {
        if duration > 0 {
            ends = Some(start + Duration::days(i64::from(duration)));
        }
    }

    Schedule {
        starts_at,
        ends_at: ends,
        duration_days: duration,
    }
}

/// Ceiling day count between two instants, floored at zero.
fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    i32::try_from(days).unwrap_or(i32::MAX)
}

/// The explicit end when set, else start plus the planned duration.
fn effective_end(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    duration_days: i32,
) -> Option<DateTime<Utc>> {
    ends_at.or_else(|| {
        starts_at.map(|start| start + Duration::days(i64::from(duration_days.max(0))))
    })
}
