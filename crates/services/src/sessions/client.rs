use vote_core::model::{LanguageCode, Respondent};

/// Where a client currently is in the annotation flow.
///
/// Completion is not a stage of its own: it is derived from the vote store
/// whenever an `Active` client has no remaining items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Unauthenticated,
    LanguageUnselected {
        respondent: Respondent,
    },
    Active {
        respondent: Respondent,
        language: LanguageCode,
    },
}

/// Per-client state carried between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSession {
    stage: Stage,
}

impl ClientSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that is already signed in, e.g. from a hosting identity.
    #[must_use]
    pub fn signed_in(respondent: Respondent) -> Self {
        Self {
            stage: Stage::LanguageUnselected { respondent },
        }
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[must_use]
    pub fn respondent(&self) -> Option<&Respondent> {
        match &self.stage {
            Stage::Unauthenticated => None,
            Stage::LanguageUnselected { respondent } | Stage::Active { respondent, .. } => {
                Some(respondent)
            }
        }
    }

    #[must_use]
    pub fn language(&self) -> Option<&LanguageCode> {
        match &self.stage {
            Stage::Active { language, .. } => Some(language),
            _ => None,
        }
    }

    pub(crate) fn sign_in(&mut self, respondent: Respondent) {
        self.stage = Stage::LanguageUnselected { respondent };
    }

    /// Drop the chosen language, keeping the respondent.
    pub(crate) fn unselect_language(&mut self) {
        if let Stage::Active { respondent, .. } = &self.stage {
            self.stage = Stage::LanguageUnselected {
                respondent: respondent.clone(),
            };
        }
    }

    pub(crate) fn activate(&mut self, language: LanguageCode) -> bool {
        match &self.stage {
            Stage::Unauthenticated => false,
            Stage::LanguageUnselected { respondent } | Stage::Active { respondent, .. } => {
                self.stage = Stage::Active {
                    respondent: respondent.clone(),
                    language,
                };
                true
            }
        }
    }
}
