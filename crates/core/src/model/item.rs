use serde::{Deserialize, Serialize};

use crate::model::ItemId;

/// One comparison pair: two answers to be judged against each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonItem {
    id: ItemId,
    answer_a: String,
    answer_b: String,
}

impl ComparisonItem {
    #[must_use]
    pub fn new(id: ItemId, answer_a: impl Into<String>, answer_b: impl Into<String>) -> Self {
        Self {
            id,
            answer_a: answer_a.into(),
            answer_b: answer_b.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn answer_a(&self) -> &str {
        &self.answer_a
    }

    #[must_use]
    pub fn answer_b(&self) -> &str {
        &self.answer_b
    }
}
