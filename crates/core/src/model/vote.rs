use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ItemId, LanguageCode, Respondent};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoteError {
    #[error("invalid vote label value: {0}")]
    InvalidLabel(i64),
}

//
// ─── VOTE LABEL ───────────────────────────────────────────────────────────────
//

/// Three-way preference between the left and right answer of an item.
///
/// Stored as `+1` (left better), `0` (tie) and `-1` (right better), so the
/// mean of stored labels reads as "how much A is preferred over B".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteLabel {
    LeftBetter,
    Tie,
    RightBetter,
}

impl VoteLabel {
    pub const ALL: [VoteLabel; 3] = [VoteLabel::LeftBetter, VoteLabel::Tie, VoteLabel::RightBetter];

    /// Converts a stored value back into a label.
    ///
    /// # Errors
    ///
    /// Returns `VoteError::InvalidLabel` for anything outside `-1..=1`.
    pub fn from_i64(value: i64) -> Result<Self, VoteError> {
        match value {
            1 => Ok(Self::LeftBetter),
            0 => Ok(Self::Tie),
            -1 => Ok(Self::RightBetter),
            other => Err(VoteError::InvalidLabel(other)),
        }
    }

    #[must_use]
    pub fn to_i64(self) -> i64 {
        match self {
            VoteLabel::LeftBetter => 1,
            VoteLabel::Tie => 0,
            VoteLabel::RightBetter => -1,
        }
    }
}

//
// ─── VOTE ─────────────────────────────────────────────────────────────────────
//

/// A respondent's judgement of one item in one language.
///
/// At most one vote exists per (respondent, language, item); recording a
/// new vote for the same key replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub respondent: Respondent,
    pub language: LanguageCode,
    pub item_id: ItemId,
    pub label: VoteLabel,
    pub voted_at: DateTime<Utc>,
}

impl Vote {
    #[must_use]
    pub fn new(
        respondent: Respondent,
        language: LanguageCode,
        item_id: ItemId,
        label: VoteLabel,
        voted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            respondent,
            language,
            item_id,
            label,
            voted_at,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
