//! Aggregates over recorded votes and finished sessions.
//!
//! These are pure functions so the in-memory store, the SQLite store and the
//! services layer agree on ranking and tallying rules.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::{ItemId, Respondent, Vote, VoteLabel};

//
// ─── PERCENTILE ────────────────────────────────────────────────────────────────
//

/// Percentage of finished sessions in a language that took strictly less
/// time than `my_secs`, out of all finished sessions (the caller's included).
///
/// Returns `0.0` when there are no finished sessions.
#[must_use]
pub fn percentile_rank(my_secs: f64, finished_secs: &[f64]) -> f64 {
    if finished_secs.is_empty() {
        return 0.0;
    }
    let faster = finished_secs.iter().filter(|secs| **secs < my_secs).count();
    #[allow(clippy::cast_precision_loss)]
    let pct = 100.0 * faster as f64 / finished_secs.len() as f64;
    pct
}

//
// ─── ITEM TALLIES ──────────────────────────────────────────────────────────────
//

/// Vote counts for one item in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTally {
    pub item_id: ItemId,
    pub voters: u32,
    pub left_better: u32,
    pub tie: u32,
    pub right_better: u32,
}

impl ItemTally {
    #[must_use]
    pub fn empty(item_id: ItemId) -> Self {
        Self {
            item_id,
            voters: 0,
            left_better: 0,
            tie: 0,
            right_better: 0,
        }
    }

    pub fn add(&mut self, label: VoteLabel) {
        self.voters += 1;
        match label {
            VoteLabel::LeftBetter => self.left_better += 1,
            VoteLabel::Tie => self.tie += 1,
            VoteLabel::RightBetter => self.right_better += 1,
        }
    }

    /// Mean of the stored labels (+1 / 0 / -1); `0.0` with no voters.
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        if self.voters == 0 {
            return 0.0;
        }
        let net = i64::from(self.left_better) - i64::from(self.right_better);
        #[allow(clippy::cast_precision_loss)]
        let mean = net as f64 / f64::from(self.voters);
        mean
    }
}

/// Tally votes per item, ordered by item id.
#[must_use]
pub fn tally_votes(votes: &[Vote]) -> Vec<ItemTally> {
    let mut by_item: BTreeMap<ItemId, ItemTally> = BTreeMap::new();
    for vote in votes {
        by_item
            .entry(vote.item_id.clone())
            .or_insert_with(|| ItemTally::empty(vote.item_id.clone()))
            .add(vote.label);
    }
    by_item.into_values().collect()
}

//
// ─── LEADERBOARD ───────────────────────────────────────────────────────────────
//

/// Voting activity of one respondent in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespondentActivity {
    pub respondent: Respondent,
    pub completed: u32,
    pub first_vote_at: DateTime<Utc>,
    pub last_vote_at: DateTime<Utc>,
}

impl RespondentActivity {
    /// Span between first and last vote, floored at one second.
    #[must_use]
    pub fn active_secs(&self) -> f64 {
        let millis = (self.last_vote_at - self.first_vote_at).num_milliseconds();
        #[allow(clippy::cast_precision_loss)]
        let secs = millis as f64 / 1000.0;
        secs.max(1.0)
    }

    /// Average seconds spent per answered item.
    #[must_use]
    pub fn avg_secs_per_item(&self) -> f64 {
        if self.completed == 0 {
            return self.active_secs();
        }
        self.active_secs() / f64::from(self.completed)
    }
}

/// Group votes per respondent, ordered by respondent.
#[must_use]
pub fn activity_from_votes(votes: &[Vote]) -> Vec<RespondentActivity> {
    let mut by_respondent: BTreeMap<Respondent, RespondentActivity> = BTreeMap::new();
    for vote in votes {
        by_respondent
            .entry(vote.respondent.clone())
            .and_modify(|activity| {
                activity.completed += 1;
                activity.first_vote_at = activity.first_vote_at.min(vote.voted_at);
                activity.last_vote_at = activity.last_vote_at.max(vote.voted_at);
            })
            .or_insert_with(|| RespondentActivity {
                respondent: vote.respondent.clone(),
                completed: 1,
                first_vote_at: vote.voted_at,
                last_vote_at: vote.voted_at,
            });
    }
    by_respondent.into_values().collect()
}

/// One ranked row of the speed leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub respondent: Respondent,
    pub completed: u32,
    pub avg_secs_per_item: f64,
}

/// Rank respondents by average seconds per item, fastest first.
///
/// Respondents without votes are dropped. Equal averages are ordered by
/// email so the ranking is stable.
#[must_use]
pub fn rank_leaderboard(activity: &[RespondentActivity]) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<_> = activity
        .iter()
        .filter(|row| row.completed > 0)
        .map(|row| (row.avg_secs_per_item(), row))
        .collect();
    rows.sort_by(|(a_avg, a), (b_avg, b)| {
        a_avg
            .total_cmp(b_avg)
            .then_with(|| a.respondent.cmp(&b.respondent))
    });

    rows.into_iter()
        .zip(1_u32..)
        .map(|((avg, row), rank)| LeaderboardEntry {
            rank,
            respondent: row.respondent.clone(),
            completed: row.completed,
            avg_secs_per_item: avg,
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
