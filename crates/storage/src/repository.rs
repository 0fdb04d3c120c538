use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use vote_core::model::{ItemId, LanguageCode, Respondent, SessionRecord, Vote};
use vote_core::stats::{ItemTally, RespondentActivity, activity_from_votes, tally_votes};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Per-respondent, per-language session bookkeeping.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Record the start of a session unless one already exists.
    ///
    /// Returns `true` if a new session row was created.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn record_session_start(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Set the finish timestamp of a session if it is not set yet.
    ///
    /// Returns `true` if this call set the timestamp. Missing sessions are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update fails.
    async fn record_session_finish(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Fetch the session for a respondent and language, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decoding failures.
    async fn get_session(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
    ) -> Result<Option<SessionRecord>, StorageError>;

    /// All sessions of a language that have a finish timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decoding failures.
    async fn finished_sessions(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<SessionRecord>, StorageError>;
}

/// Vote records keyed by (respondent, language, item).
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Insert a vote or replace the existing vote for the same key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the vote cannot be stored.
    async fn record_vote(&self, vote: &Vote) -> Result<(), StorageError>;

    /// Votes of one respondent in one language, ordered by item id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decoding failures.
    async fn votes_for(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
    ) -> Result<Vec<Vote>, StorageError>;

    /// Every vote cast in one language, ordered by item id then respondent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decoding failures.
    async fn votes_for_language(&self, language: &LanguageCode) -> Result<Vec<Vote>, StorageError>;

    /// Every vote in the store, ordered by language, item id and respondent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decoding failures.
    async fn all_votes(&self) -> Result<Vec<Vote>, StorageError>;

    /// Per-item label counts for one language, ordered by item id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decoding failures.
    async fn item_tallies(&self, language: &LanguageCode) -> Result<Vec<ItemTally>, StorageError>;

    /// Per-respondent vote count and first/last vote time for one language.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decoding failures.
    async fn respondent_activity(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<RespondentActivity>, StorageError>;
}

pub(crate) fn sort_votes(votes: &mut [Vote]) {
    votes.sort_by(|a, b| {
        a.language
            .cmp(&b.language)
            .then_with(|| a.item_id.cmp(&b.item_id))
            .then_with(|| a.respondent.cmp(&b.respondent))
    });
}

type SessionKey = (Respondent, LanguageCode);
type VoteKey = (Respondent, LanguageCode, ItemId);

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sessions: Arc<Mutex<HashMap<SessionKey, SessionRecord>>>,
    votes: Arc<Mutex<BTreeMap<VoteKey, Vote>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn language_votes(&self, language: &LanguageCode) -> Result<Vec<Vote>, StorageError> {
        let guard = self
            .votes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut votes: Vec<Vote> = guard
            .values()
            .filter(|vote| &vote.language == language)
            .cloned()
            .collect();
        sort_votes(&mut votes);
        Ok(votes)
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn record_session_start(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let key = (respondent.clone(), language.clone());
        if guard.contains_key(&key) {
            return Ok(false);
        }
        guard.insert(
            key,
            SessionRecord::started(respondent.clone(), language.clone(), at),
        );
        Ok(true)
    }

    async fn record_session_finish(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get_mut(&(respondent.clone(), language.clone()))
            .is_some_and(|session| session.finish(at)))
    }

    async fn get_session(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
    ) -> Result<Option<SessionRecord>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(respondent.clone(), language.clone())).cloned())
    }

    async fn finished_sessions(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut out: Vec<SessionRecord> = guard
            .values()
            .filter(|session| session.language() == language && session.is_finished())
            .cloned()
            .collect();
        out.sort_by(|a, b| a.respondent().cmp(b.respondent()));
        Ok(out)
    }
}

#[async_trait]
impl VoteRepository for InMemoryRepository {
    async fn record_vote(&self, vote: &Vote) -> Result<(), StorageError> {
        let mut guard = self
            .votes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            (
                vote.respondent.clone(),
                vote.language.clone(),
                vote.item_id.clone(),
            ),
            vote.clone(),
        );
        Ok(())
    }

    async fn votes_for(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
    ) -> Result<Vec<Vote>, StorageError> {
        let mut votes = self.language_votes(language)?;
        votes.retain(|vote| &vote.respondent == respondent);
        Ok(votes)
    }

    async fn votes_for_language(&self, language: &LanguageCode) -> Result<Vec<Vote>, StorageError> {
        self.language_votes(language)
    }

    async fn all_votes(&self) -> Result<Vec<Vote>, StorageError> {
        let guard = self
            .votes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut votes: Vec<Vote> = guard.values().cloned().collect();
        sort_votes(&mut votes);
        Ok(votes)
    }

    async fn item_tallies(&self, language: &LanguageCode) -> Result<Vec<ItemTally>, StorageError> {
        Ok(tally_votes(&self.language_votes(language)?))
    }

    async fn respondent_activity(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<RespondentActivity>, StorageError> {
        Ok(activity_from_votes(&self.language_votes(language)?))
    }
}

/// Aggregates the session and vote repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
    pub votes: Arc<dyn VoteRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let votes: Arc<dyn VoteRepository> = Arc::new(repo);
        Self { sessions, votes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use vote_core::model::VoteLabel;
    use vote_core::time::fixed_now;

    fn alice() -> Respondent {
        Respondent::parse("alice@example.com").unwrap()
    }

    fn en() -> LanguageCode {
        LanguageCode::new("en").unwrap()
    }

    #[tokio::test]
    async fn session_start_is_idempotent() {
        let repo = InMemoryRepository::new();
        assert!(repo.record_session_start(&alice(), &en(), fixed_now()).await.unwrap());
        let later = fixed_now() + Duration::minutes(5);
        assert!(!repo.record_session_start(&alice(), &en(), later).await.unwrap());

        let session = repo.get_session(&alice(), &en()).await.unwrap().unwrap();
        assert_eq!(session.started_at(), fixed_now());
    }

    #[tokio::test]
    async fn finish_is_recorded_once() {
        let repo = InMemoryRepository::new();
        repo.record_session_start(&alice(), &en(), fixed_now()).await.unwrap();

        let first = fixed_now() + Duration::seconds(40);
        assert!(repo.record_session_finish(&alice(), &en(), first).await.unwrap());
        let second = fixed_now() + Duration::seconds(90);
        assert!(!repo.record_session_finish(&alice(), &en(), second).await.unwrap());

        let finished = repo.finished_sessions(&en()).await.unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].finished_at(), Some(first));
    }

    #[tokio::test]
    async fn finish_without_start_is_a_no_op() {
        let repo = InMemoryRepository::new();
        assert!(!repo.record_session_finish(&alice(), &en(), fixed_now()).await.unwrap());
        assert!(repo.get_session(&alice(), &en()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn vote_upsert_replaces_label() {
        let repo = InMemoryRepository::new();
        let item = ItemId::new("1");
        let first = Vote::new(alice(), en(), item.clone(), VoteLabel::LeftBetter, fixed_now());
        repo.record_vote(&first).await.unwrap();
        let revised = Vote::new(alice(), en(), item, VoteLabel::Tie, fixed_now());
        repo.record_vote(&revised).await.unwrap();

        let votes = repo.votes_for(&alice(), &en()).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].label, VoteLabel::Tie);
    }
}
