//! Business logic services.

#![allow(missing_docs)]

pub mod entries;
pub mod participants;
pub mod ranking;
pub mod rounds;
pub mod sorting;
pub mod votes;

pub use entries::{EntryService, SaveEntryInput};
pub use participants::{ParticipantDetail, ParticipantResolver};
pub use ranking::{RankedRow, RankingService, assign_ranks};
pub use rounds::{
    BulkRoundAction, BulkSummary, EndOutcome, RefreshResult, RoundOverview, RoundService,
    SaveRoundInput, ScheduleStatus,
};
pub use sorting::{SortMode, SortedRow, TieStatus};
pub use votes::{VoteReceipt, VoteService};
