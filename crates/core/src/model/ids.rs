use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Positional identifier of a comparison item within one loaded source.
///
/// Identifiers are the 1-based post-filter row position, stringified
/// (`"1"`, `"2"`, …). They are not derived from the item's content.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an `ItemId` from its stored text.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates the identifier for the item at the given 1-based position.
    #[must_use]
    pub fn from_position(position: usize) -> Self {
        Self(position.to_string())
    }

    /// Returns the underlying text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric position if the identifier is positional.
    #[must_use]
    pub fn position(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

// Numeric ids sort by value ("2" < "10"); anything else falls back to text.
impl Ord for ItemId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.position(), other.position()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ItemId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Short lowercase language code such as `zh` or `en`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    const MAX_LEN: usize = 16;

    /// Creates a validated language code.
    ///
    /// The input is trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the code is empty, too long, or contains
    /// characters other than ASCII letters, digits, `-` and `_`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ParseIdError> {
        let code = raw.as_ref().trim().to_ascii_lowercase();
        let valid = !code.is_empty()
            && code.len() <= Self::MAX_LEN
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ParseIdError {
                kind: "LanguageCode".to_string(),
            });
        }
        Ok(Self(code))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LanguageCode> for String {
    fn from(value: LanguageCode) -> Self {
        value.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Debug for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageCode({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing an identifier from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ItemId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "ItemId".to_string(),
            });
        }
        Ok(ItemId::new(trimmed))
    }
}

impl FromStr for LanguageCode {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageCode::new(s)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_from_position_is_one_based_text() {
        assert_eq!(ItemId::from_position(1).as_str(), "1");
        assert_eq!(ItemId::from_position(12).to_string(), "12");
    }

    #[test]
    fn item_ids_sort_numerically() {
        let mut ids = vec![ItemId::new("10"), ItemId::new("2"), ItemId::new("1")];
        ids.sort();
        let texts: Vec<_> = ids.iter().map(ItemId::as_str).collect();
        assert_eq!(texts, vec!["1", "2", "10"]);
    }

    #[test]
    fn item_id_from_str_rejects_blank() {
        assert!("  ".parse::<ItemId>().is_err());
        assert_eq!("7".parse::<ItemId>().unwrap(), ItemId::new("7"));
    }

    #[test]
    fn language_code_is_normalized() {
        let code = LanguageCode::new(" EN ").unwrap();
        assert_eq!(code.as_str(), "en");
    }

    #[test]
    fn language_code_rejects_invalid() {
        assert!(LanguageCode::new("").is_err());
        assert!(LanguageCode::new("e n").is_err());
        assert!(LanguageCode::new("x".repeat(17)).is_err());
    }
}
