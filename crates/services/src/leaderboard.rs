use std::sync::Arc;

use storage::repository::{StorageError, VoteRepository};
use vote_core::model::{LanguageCode, Respondent};
use vote_core::stats::{ItemTally, LeaderboardEntry, rank_leaderboard};

/// Ranked speed table for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub language: LanguageCode,
    pub entries: Vec<LeaderboardEntry>,
}

/// Where one respondent stands on a [`Leaderboard`].
#[derive(Debug, Clone, PartialEq)]
pub struct MyRank {
    pub rank: u32,
    pub participants: usize,
    pub completed: u32,
    pub avg_secs_per_item: f64,
}

impl Leaderboard {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The respondent's row, or `None` if they have not voted in this language.
    #[must_use]
    pub fn my_rank(&self, respondent: &Respondent) -> Option<MyRank> {
        self.entries
            .iter()
            .find(|entry| &entry.respondent == respondent)
            .map(|entry| MyRank {
                rank: entry.rank,
                participants: self.entries.len(),
                completed: entry.completed,
                avg_secs_per_item: entry.avg_secs_per_item,
            })
    }
}

/// Read-only aggregates over the vote store.
#[derive(Clone)]
pub struct LeaderboardService {
    votes: Arc<dyn VoteRepository>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(votes: Arc<dyn VoteRepository>) -> Self {
        Self { votes }
    }

    /// Rank every respondent with at least one vote in `language`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the activity cannot be read.
    pub async fn leaderboard(&self, language: &LanguageCode) -> Result<Leaderboard, StorageError> {
        let activity = self.votes.respondent_activity(language).await?;
        Ok(Leaderboard {
            language: language.clone(),
            entries: rank_leaderboard(&activity),
        })
    }

    /// Per-item label counts of `language`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the tallies cannot be read.
    pub async fn item_tallies(&self, language: &LanguageCode) -> Result<Vec<ItemTally>, StorageError> {
        self.votes.item_tallies(language).await
    }
}
