use services::Leaderboard;
use vote_core::stats::ItemTally;

use super::time_fmt::format_one_decimal;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRowVm {
    pub rank: u32,
    pub email: String,
    pub completed: u32,
    pub avg_secs: String,
    pub is_me: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemStatsRowVm {
    pub item_id: String,
    pub voters: u32,
    pub avg_score: String,
    pub left_better: u32,
    pub tie: u32,
    pub right_better: u32,
}

#[must_use]
pub fn map_leaderboard(board: &Leaderboard, me: Option<&str>) -> Vec<LeaderboardRowVm> {
    board
        .entries
        .iter()
        .map(|entry| LeaderboardRowVm {
            rank: entry.rank,
            email: entry.respondent.email().to_string(),
            completed: entry.completed,
            avg_secs: format_one_decimal(entry.avg_secs_per_item),
            is_me: me == Some(entry.respondent.email()),
        })
        .collect()
}

#[must_use]
pub fn map_item_stats(tallies: &[ItemTally]) -> Vec<ItemStatsRowVm> {
    tallies
        .iter()
        .map(|tally| ItemStatsRowVm {
            item_id: tally.item_id.to_string(),
            voters: tally.voters,
            avg_score: format!("{:.2}", tally.mean_score()),
            left_better: tally.left_better,
            tie: tally.tie,
            right_better: tally.right_better,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vote_core::model::{ItemId, LanguageCode, Respondent, VoteLabel};
    use vote_core::stats::LeaderboardEntry;

    #[test]
    fn marks_current_respondent() {
        let board = Leaderboard {
            language: LanguageCode::new("en").unwrap(),
            entries: vec![
                LeaderboardEntry {
                    rank: 1,
                    respondent: Respondent::parse("a@x.io").unwrap(),
                    completed: 3,
                    avg_secs_per_item: 4.04,
                },
                LeaderboardEntry {
                    rank: 2,
                    respondent: Respondent::parse("b@x.io").unwrap(),
                    completed: 1,
                    avg_secs_per_item: 9.0,
                },
            ],
        };
        let rows = map_leaderboard(&board, Some("b@x.io"));
        assert_eq!(rows[0].avg_secs, "4.0");
        assert!(!rows[0].is_me);
        assert!(rows[1].is_me);
    }

    #[test]
    fn item_stats_round_mean() {
        let mut tally = ItemTally::empty(ItemId::new("7"));
        tally.add(VoteLabel::LeftBetter);
        tally.add(VoteLabel::Tie);
        tally.add(VoteLabel::Tie);
        let rows = map_item_stats(&[tally]);
        assert_eq!(rows[0].avg_score, "0.33");
        assert_eq!(rows[0].tie, 2);
    }
}
