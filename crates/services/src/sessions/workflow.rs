use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::repository::{SessionRepository, Storage, VoteRepository};
use vote_core::model::{ItemId, LanguageCode, LanguageSpec, Respondent, Vote, VoteLabel};
use vote_core::stats::percentile_rank;

use super::client::{ClientSession, Stage};
use super::progress::SessionProgress;
use super::screen::{AnsweringScreen, CompletionScreen, Screen, SessionRequest};
use crate::Clock;
use crate::error::SessionError;
use crate::pairs::{PairCache, PairSet};

/// Drives a client through sign-in, language choice and voting.
///
/// Every request re-derives the remaining items from the vote store, so a
/// client that reconnects resumes where its votes left off.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
    votes: Arc<dyn VoteRepository>,
    pairs: Arc<PairCache>,
    csv_path: PathBuf,
    languages: Arc<[LanguageSpec]>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        storage: &Storage,
        pairs: Arc<PairCache>,
        csv_path: impl Into<PathBuf>,
        languages: Vec<LanguageSpec>,
    ) -> Self {
        Self {
            clock,
            sessions: Arc::clone(&storage.sessions),
            votes: Arc::clone(&storage.votes),
            pairs,
            csv_path: csv_path.into(),
            languages: languages.into(),
        }
    }

    #[must_use]
    pub fn languages(&self) -> &[LanguageSpec] {
        &self.languages
    }

    #[must_use]
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Look up a configured language.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownLanguage` if `code` is not configured.
    pub fn language(&self, code: &LanguageCode) -> Result<&LanguageSpec, SessionError> {
        LanguageSpec::find(&self.languages, code)
            .ok_or_else(|| SessionError::UnknownLanguage(code.clone()))
    }

    /// The (cached) comparison items of a language.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownLanguage` or the loader's error.
    pub fn pair_set(&self, code: &LanguageCode) -> Result<Arc<PairSet>, SessionError> {
        let spec = self.language(code)?;
        Ok(self.pairs.get_or_load(&self.csv_path, spec)?)
    }

    /// Apply one request to `client` and return the screen to show.
    ///
    /// The new stage is written back to `client` only once its screen has
    /// rendered; a rejected email or any error leaves `client` as it was.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for unknown languages or items, requests that do
    /// not fit the current stage, pair loading failures and storage failures.
    pub async fn handle(
        &self,
        client: &mut ClientSession,
        request: SessionRequest,
    ) -> Result<Screen, SessionError> {
        let mut next = client.clone();
        match request {
            SessionRequest::SubmitEmail(raw) => match Respondent::parse(&raw) {
                Ok(respondent) => {
                    tracing::info!(respondent = %respondent, "respondent signed in");
                    next.sign_in(respondent);
                }
                Err(_) => {
                    tracing::debug!("rejected malformed email");
                    return Ok(Screen::Login {
                        rejected: Some(raw),
                    });
                }
            },
            SessionRequest::SelectLanguage(code) => {
                self.language(&code)?;
                if !next.activate(code) {
                    return Err(SessionError::SignedOut);
                }
            }
            SessionRequest::Vote { item_id, label } => {
                let Stage::Active {
                    respondent,
                    language,
                } = next.stage()
                else {
                    return Err(SessionError::NotAnswering);
                };
                self.vote(respondent, language, item_id, label).await?;
            }
            SessionRequest::SwitchLanguage => {
                self.pairs.clear();
                next.unselect_language();
            }
            SessionRequest::Refresh => {}
        }
        let screen = self.render(&next).await?;
        *client = next;
        Ok(screen)
    }

    /// The screen for the client's current stage, without changing it.
    ///
    /// An active client gets its session start recorded if this is its first
    /// visit to the language.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for pair loading or storage failures, and
    /// `SessionError::Empty` if the language has no complete items.
    pub async fn render(&self, client: &ClientSession) -> Result<Screen, SessionError> {
        match client.stage() {
            Stage::Unauthenticated => Ok(Screen::Login { rejected: None }),
            Stage::LanguageUnselected { respondent } => Ok(Screen::LanguageSelect {
                respondent: respondent.clone(),
                languages: self.languages.to_vec(),
            }),
            Stage::Active {
                respondent,
                language,
            } => self.render_active(respondent, language).await,
        }
    }

    async fn render_active(
        &self,
        respondent: &Respondent,
        code: &LanguageCode,
    ) -> Result<Screen, SessionError> {
        let spec = self.language(code)?;
        let set = self.pairs.get_or_load(&self.csv_path, spec)?;
        if set.is_empty() {
            return Err(SessionError::Empty(code.clone()));
        }

        if self
            .sessions
            .record_session_start(respondent, code, self.clock.now())
            .await?
        {
            tracing::info!(respondent = %respondent, language = %code, "session started");
        }

        let answered = self.answered_ids(respondent, code, &set).await?;
        let progress = SessionProgress::new(set.len(), answered.len());

        match set.remaining(&answered).next() {
            Some(item) => Ok(Screen::Answering(AnsweringScreen {
                respondent: respondent.clone(),
                language: spec.clone(),
                item: item.clone(),
                position: progress.position(),
                total: progress.total,
                progress,
            })),
            None => {
                self.completion(respondent, spec)
                    .await
                    .map(Screen::Complete)
            }
        }
    }

    async fn vote(
        &self,
        respondent: &Respondent,
        code: &LanguageCode,
        item_id: ItemId,
        label: VoteLabel,
    ) -> Result<(), SessionError> {
        let set = self.pair_set(code)?;
        if !set.contains(&item_id) {
            return Err(SessionError::UnknownItem(item_id));
        }

        let now = self.clock.now();
        self.sessions
            .record_session_start(respondent, code, now)
            .await?;
        let vote = Vote::new(respondent.clone(), code.clone(), item_id, label, now);
        self.votes.record_vote(&vote).await?;
        tracing::debug!(
            respondent = %respondent,
            language = %code,
            item = %vote.item_id,
            label = vote.label.to_i64(),
            "vote recorded"
        );

        let answered = self.answered_ids(respondent, code, &set).await?;
        if set.remaining(&answered).next().is_none()
            && self
                .sessions
                .record_session_finish(respondent, code, now)
                .await?
        {
            tracing::info!(respondent = %respondent, language = %code, "session finished");
        }
        Ok(())
    }

    async fn completion(
        &self,
        respondent: &Respondent,
        spec: &LanguageSpec,
    ) -> Result<CompletionScreen, SessionError> {
        let code = &spec.code;
        // Covers votes cast before the item set shrank to what is answered.
        self.sessions
            .record_session_finish(respondent, code, self.clock.now())
            .await?;

        let elapsed_secs = self
            .sessions
            .get_session(respondent, code)
            .await?
            .and_then(|session| session.elapsed_secs())
            .unwrap_or(0.0);
        let finished: Vec<f64> = self
            .sessions
            .finished_sessions(code)
            .await?
            .iter()
            .filter_map(|session| session.elapsed_secs())
            .collect();
        let my_votes = self.votes.votes_for(respondent, code).await?;

        Ok(CompletionScreen {
            respondent: respondent.clone(),
            language: spec.clone(),
            elapsed_secs,
            percentile: percentile_rank(elapsed_secs, &finished),
            my_votes,
        })
    }

    /// Ids of loaded items the respondent has voted on.
    async fn answered_ids(
        &self,
        respondent: &Respondent,
        code: &LanguageCode,
        set: &PairSet,
    ) -> Result<HashSet<ItemId>, SessionError> {
        Ok(self
            .votes
            .votes_for(respondent, code)
            .await?
            .into_iter()
            .map(|vote| vote.item_id)
            .filter(|id| set.contains(id))
            .collect())
    }
}
