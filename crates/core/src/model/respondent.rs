use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("email pattern should compile")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RespondentError {
    #[error("email address is malformed: {raw:?}")]
    MalformedEmail { raw: String },
    #[error("email address is empty")]
    Empty,
}

/// Identity of a respondent: a trimmed, lower-cased email address.
///
/// The email gate is the only identity check; no ownership of the address
/// is verified.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Respondent(String);

impl Respondent {
    /// Validate and normalize a raw email entry.
    ///
    /// # Errors
    ///
    /// Returns `RespondentError::MalformedEmail` if the trimmed input does not
    /// look like `name@domain.tld`.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, RespondentError> {
        let trimmed = raw.as_ref().trim();
        if !EMAIL_RE.is_match(trimmed) {
            return Err(RespondentError::MalformedEmail {
                raw: raw.as_ref().to_string(),
            });
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Normalize an identity that did not come through the login form, such
    /// as a hosting identity or an email already in the vote store.
    ///
    /// Only trims and lower-cases; the login pattern is not applied.
    ///
    /// # Errors
    ///
    /// Returns `RespondentError::Empty` if nothing is left after trimming.
    pub fn from_trusted(raw: impl AsRef<str>) -> Result<Self, RespondentError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RespondentError::Empty);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Respondent {
    type Error = RespondentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_trusted(value)
    }
}

impl From<Respondent> for String {
    fn from(value: Respondent) -> Self {
        value.0
    }
}

impl fmt::Debug for Respondent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Respondent({})", self.0)
    }
}

impl fmt::Display for Respondent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
