use serde::{Deserialize, Serialize};

use crate::model::LanguageCode;

/// Column mapping and display label for one supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSpec {
    pub code: LanguageCode,
    pub label: String,
    /// Source column shown on the left ("version A").
    pub column_a: String,
    /// Source column shown on the right ("version B").
    pub column_b: String,
}

impl LanguageSpec {
    #[must_use]
    pub fn new(
        code: LanguageCode,
        label: impl Into<String>,
        column_a: impl Into<String>,
        column_b: impl Into<String>,
    ) -> Self {
        Self {
            code,
            label: label.into(),
            column_a: column_a.into(),
            column_b: column_b.into(),
        }
    }

    /// The two languages the comparison source ships with.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        ["zh", "en"]
            .into_iter()
            .filter_map(|code| LanguageCode::new(code).ok())
            .map(|code| {
                let label = if code.as_str() == "zh" { "中文" } else { "English" };
                let column_a = format!("normal_conversation_history_{code}");
                let column_b = format!("personalized_conversation_history_{code}");
                Self::new(code, label, column_a, column_b)
            })
            .collect()
    }

    /// Look up a language by code.
    #[must_use]
    pub fn find<'a>(languages: &'a [Self], code: &LanguageCode) -> Option<&'a Self> {
        languages.iter().find(|spec| &spec.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_zh_and_en() {
        let langs = LanguageSpec::defaults();
        assert_eq!(langs.len(), 2);
        let en = LanguageSpec::find(&langs, &LanguageCode::new("en").unwrap()).unwrap();
        assert_eq!(en.column_a, "normal_conversation_history_en");
        assert_eq!(en.column_b, "personalized_conversation_history_en");
        assert_eq!(en.label, "English");
    }

    #[test]
    fn find_misses_unknown_code() {
        let langs = LanguageSpec::defaults();
        assert!(LanguageSpec::find(&langs, &LanguageCode::new("fr").unwrap()).is_none());
    }
}
