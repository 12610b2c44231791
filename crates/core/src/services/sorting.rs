//! Presentation orders for round standings.
//!
//! Ranking decides who is winning; this module only decides how a tally is
//! arranged for display. The tiebreaker order additionally classifies each
//! row by how close it sits to a contested vote count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::services::ranking::RankedRow;

/// How far (in votes) a row may sit from a contested count and still be
/// surfaced next to it.
const NEAR_TIE_DISTANCE: i64 = 2;

/// Requested presentation order for a totals listing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Most recently voted first. The default when nothing is requested.
    #[default]
    Recent,
    /// Best rank first.
    Highest,
    /// Worst rank first.
    Lowest,
    /// Contested rows first, grouped by tie classification.
    Tiebreaker,
}

impl SortMode {
    /// Parse a requested order; anything unrecognized sorts by best rank.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "recent" => Self::Recent,
            "lowest" => Self::Lowest,
            "tiebreaker" => Self::Tiebreaker,
            _ => Self::Highest,
        }
    }
}

/// Tie classification of a row under [`SortMode::Tiebreaker`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieStatus {
    /// Tied at the lowest contested vote count.
    LowTie,
    /// Tied at the highest contested vote count.
    HighTie,
    /// Tied at a contested count between the extremes.
    MidTie,
    /// Within [`NEAR_TIE_DISTANCE`] votes of a contested count.
    NearTie,
    /// Not near any contested count.
    Other,
}

/// A standings row decorated for one presentation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortedRow {
    #[serde(flatten)]
    pub row: RankedRow,
    /// Present only under the tiebreaker order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_status: Option<TieStatus>,
}

impl SortedRow {
    const fn plain(row: RankedRow) -> Self {
        Self {
            row,
            tie_status: None,
        }
    }
}

/// Arrange ranked rows for display.
///
/// Rows missing a last-vote timestamp count as the oldest wherever recency
/// matters.
#[must_use]
pub fn apply(mode: SortMode, rows: Vec<RankedRow>) -> Vec<SortedRow> {
    match mode {
        SortMode::Recent => {
            let mut rows = rows;
            rows.sort_by(|a, b| {
                b.last_vote_at
                    .cmp(&a.last_vote_at)
                    .then_with(|| a.rank.cmp(&b.rank))
            });
            rows.into_iter().map(SortedRow::plain).collect()
        }
        SortMode::Highest => {
            let mut rows = rows;
            rows.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.entry_id.cmp(&b.entry_id)));
            rows.into_iter().map(SortedRow::plain).collect()
        }
        SortMode::Lowest => {
            let mut rows = rows;
            rows.sort_by(|a, b| b.rank.cmp(&a.rank).then_with(|| a.entry_id.cmp(&b.entry_id)));
            rows.into_iter().map(SortedRow::plain).collect()
        }
        SortMode::Tiebreaker => apply_tiebreaker(rows),
    }
}

fn apply_tiebreaker(rows: Vec<RankedRow>) -> Vec<SortedRow> {
    let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
    for row in &rows {
        *histogram.entry(row.votes).or_insert(0) += 1;
    }
    // Ascending, so the first contested count is the lowest.
    let tie_values: Vec<i64> = histogram
        .into_iter()
        .filter(|&(_, count)| count >= 2)
        .map(|(votes, _)| votes)
        .collect();

    let mut sorted: Vec<SortedRow> = rows
        .into_iter()
        .map(|row| {
            let status = classify(row.votes, &tie_values);
            SortedRow {
                row,
                tie_status: Some(status),
            }
        })
        .collect();

    sorted.sort_by(|a, b| {
        bucket(a)
            .cmp(&bucket(b))
            .then_with(|| b.row.last_vote_at.cmp(&a.row.last_vote_at))
    });
    sorted
}

fn classify(votes: i64, tie_values: &[i64]) -> TieStatus {
    if tie_values.contains(&votes) {
        if tie_values.first() == Some(&votes) {
            return TieStatus::LowTie;
        }
        if tie_values.last() == Some(&votes) {
            return TieStatus::HighTie;
        }
        return TieStatus::MidTie;
    }
    if tie_values
        .iter()
        .any(|tie| (votes - tie).abs() <= NEAR_TIE_DISTANCE)
    {
        return TieStatus::NearTie;
    }
    TieStatus::Other
}

const fn bucket(row: &SortedRow) -> u8 {
    match row.tie_status {
        Some(TieStatus::LowTie) => 0,
        Some(TieStatus::HighTie | TieStatus::MidTie) => 1,
        Some(TieStatus::NearTie) => 2,
        Some(TieStatus::Other) | None => 3,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use ovation_db::entities::entry::EntryKind;

    fn row(entry_id: i64, votes: i64, rank: u32, minutes_ago: Option<i64>) -> RankedRow {
        RankedRow {
            entry_id,
            reference: format!("business_{entry_id}_aaaaaaaa"),
            title: format!("Entry {entry_id}"),
            kind: EntryKind::Business,
            votes,
            last_vote_at: minutes_ago.map(|m| Utc::now() - Duration::minutes(m)),
            rank,
        }
    }

    fn ids(rows: &[SortedRow]) -> Vec<i64> {
        rows.iter().map(|r| r.row.entry_id).collect()
    }

    #[test]
    fn test_parse_known_and_unknown_modes() {
        assert_eq!(SortMode::parse("recent"), SortMode::Recent);
        assert_eq!(SortMode::parse(" Lowest "), SortMode::Lowest);
        assert_eq!(SortMode::parse("TIEBREAKER"), SortMode::Tiebreaker);
        assert_eq!(SortMode::parse("highest"), SortMode::Highest);
        assert_eq!(SortMode::parse("alphabetical"), SortMode::Highest);
        assert_eq!(SortMode::default(), SortMode::Recent);
    }

    #[test]
    fn test_recent_puts_newest_first_and_unvoted_last() {
        let rows = vec![
            row(1, 3, 2, Some(60)),
            row(2, 9, 1, None),
            row(3, 1, 3, Some(5)),
        ];

        let sorted = apply(SortMode::Recent, rows);

        assert_eq!(ids(&sorted), vec![3, 1, 2]);
        assert!(sorted.iter().all(|r| r.tie_status.is_none()));
    }

    #[test]
    fn test_highest_and_lowest_order_by_rank() {
        let rows = vec![row(1, 3, 3, None), row(2, 9, 1, None), row(3, 5, 2, None)];

        let highest = apply(SortMode::Highest, rows.clone());
        assert_eq!(ids(&highest), vec![2, 3, 1]);

        let lowest = apply(SortMode::Lowest, rows);
        assert_eq!(ids(&lowest), vec![1, 3, 2]);
    }

    #[test]
    fn test_tiebreaker_classification_and_grouping() {
        // Contested counts are 5 (lowest) and 10 (highest); 7 and 3 sit
        // within two votes of a contested count, 20 does not.
        let rows = vec![
            row(1, 10, 1, Some(50)),
            row(2, 10, 1, Some(10)),
            row(3, 5, 4, Some(20)),
            row(4, 5, 4, Some(5)),
            row(5, 7, 3, Some(1)),
            row(6, 3, 6, Some(2)),
            row(7, 20, 7, Some(90)),
        ];

        let sorted = apply(SortMode::Tiebreaker, rows);

        assert_eq!(ids(&sorted), vec![4, 3, 2, 1, 5, 6, 7]);
        let statuses: Vec<Option<TieStatus>> = sorted.iter().map(|r| r.tie_status).collect();
        assert_eq!(
            statuses,
            vec![
                Some(TieStatus::LowTie),
                Some(TieStatus::LowTie),
                Some(TieStatus::HighTie),
                Some(TieStatus::HighTie),
                Some(TieStatus::NearTie),
                Some(TieStatus::NearTie),
                Some(TieStatus::Other),
            ]
        );
    }

    #[test]
    fn test_tiebreaker_single_contested_count_reads_as_low() {
        let rows = vec![
            row(1, 4, 2, Some(30)),
            row(2, 4, 2, Some(10)),
            row(3, 9, 1, Some(5)),
        ];

        let sorted = apply(SortMode::Tiebreaker, rows);

        assert_eq!(ids(&sorted), vec![2, 1, 3]);
        assert_eq!(sorted[0].tie_status, Some(TieStatus::LowTie));
        assert_eq!(sorted[2].tie_status, Some(TieStatus::Other));
    }

    #[test]
    fn test_tiebreaker_middle_contested_count_is_midtie() {
        let rows = vec![
            row(1, 2, 5, None),
            row(2, 2, 5, None),
            row(3, 6, 3, None),
            row(4, 6, 3, None),
            row(5, 9, 1, None),
            row(6, 9, 1, None),
        ];

        let sorted = apply(SortMode::Tiebreaker, rows);

        let mid: Vec<i64> = sorted
            .iter()
            .filter(|r| r.tie_status == Some(TieStatus::MidTie))
            .map(|r| r.row.entry_id)
            .collect();
        assert_eq!(mid, vec![3, 4]);
    }

    #[test]
    fn test_tiebreaker_serializes_status_lowercase() {
        let sorted = apply(SortMode::Tiebreaker, vec![row(1, 4, 1, None), row(2, 4, 1, None)]);
        let json = serde_json::to_value(&sorted[0]).unwrap();

        assert_eq!(json["tie_status"], "lowtie");
        assert_eq!(json["entry_id"], 1);
    }
}
