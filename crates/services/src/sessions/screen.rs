use vote_core::model::{ComparisonItem, ItemId, LanguageCode, LanguageSpec, Respondent, Vote, VoteLabel};

use super::progress::SessionProgress;

/// Input accepted by [`super::SessionLoopService::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRequest {
    /// Raw text typed into the email field.
    SubmitEmail(String),
    SelectLanguage(LanguageCode),
    Vote { item_id: ItemId, label: VoteLabel },
    /// Go back to language selection and reshuffle on the next load.
    SwitchLanguage,
    Refresh,
}

/// What the client should display after a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login {
        /// The last input that failed validation, if any.
        rejected: Option<String>,
    },
    LanguageSelect {
        respondent: Respondent,
        languages: Vec<LanguageSpec>,
    },
    Answering(AnsweringScreen),
    Complete(CompletionScreen),
}

impl Screen {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Screen::Complete(_))
    }
}

/// The next unanswered item of the active language.
#[derive(Debug, Clone, PartialEq)]
pub struct AnsweringScreen {
    pub respondent: Respondent,
    pub language: LanguageSpec,
    pub item: ComparisonItem,
    /// 1-based position of `item`.
    pub position: usize,
    pub total: usize,
    pub progress: SessionProgress,
}

/// Shown once every item of the active language has a vote.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionScreen {
    pub respondent: Respondent,
    pub language: LanguageSpec,
    pub elapsed_secs: f64,
    /// Share of finished sessions that took longer, in percent.
    pub percentile: f64,
    pub my_votes: Vec<Vote>,
}
