use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use vote_core::model::{ComparisonItem, ItemId, LanguageCode, LanguageSpec};

use crate::error::PairLoadError;

/// Summary of the raw source, shown to the operator next to the task.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSetStats {
    /// Data rows in the source, before dropping incomplete ones.
    pub rows_read: usize,
    /// Mean character length of the present values of each answer column.
    pub avg_len_a: f64,
    pub avg_len_b: f64,
}

/// The comparison items of one language, in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSet {
    language: LanguageCode,
    items: Vec<ComparisonItem>,
    stats: PairSetStats,
}

impl PairSet {
    #[must_use]
    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    #[must_use]
    pub fn items(&self) -> &[ComparisonItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> &PairSetStats {
        &self.stats
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&ComparisonItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Items whose id is not in `answered`, in presentation order.
    pub fn remaining<'a>(
        &'a self,
        answered: &'a HashSet<ItemId>,
    ) -> impl Iterator<Item = &'a ComparisonItem> + 'a {
        self.items
            .iter()
            .filter(move |item| !answered.contains(item.id()))
    }
}

/// Load the comparison items of `language` from a CSV file and shuffle them.
///
/// # Errors
///
/// Returns `PairLoadError::Io` if the file cannot be opened, `Csv` for
/// malformed input, and `MissingColumn` if either answer column is absent.
pub fn load_pairs<G: Rng + ?Sized>(
    path: &Path,
    language: &LanguageSpec,
    rng: &mut G,
) -> Result<PairSet, PairLoadError> {
    let file = File::open(path).map_err(|source| PairLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let set = read_pairs(file, language, rng)?;
    tracing::info!(
        path = %path.display(),
        language = %language.code,
        rows = set.stats.rows_read,
        items = set.len(),
        "loaded comparison pairs"
    );
    Ok(set)
}

/// Read comparison items from any CSV reader.
///
/// Rows where either answer is missing or empty are dropped; ids are the
/// 1-based position among the kept rows.
///
/// # Errors
///
/// Returns `PairLoadError::Csv` for malformed input and `MissingColumn` if
/// either answer column is absent from the header.
pub fn read_pairs<R: Read, G: Rng + ?Sized>(
    reader: R,
    language: &LanguageSpec,
    rng: &mut G,
) -> Result<PairSet, PairLoadError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| PairLoadError::MissingColumn {
                column: name.to_string(),
            })
    };
    let idx_a = column_index(&language.column_a)?;
    let idx_b = column_index(&language.column_b)?;

    let mut rows_read = 0_usize;
    let mut len_a = LengthMean::default();
    let mut len_b = LengthMean::default();
    let mut items = Vec::new();

    for record in csv.records() {
        let record = record?;
        rows_read += 1;

        let answer_a = record.get(idx_a).filter(|value| !value.is_empty());
        let answer_b = record.get(idx_b).filter(|value| !value.is_empty());
        len_a.push(answer_a);
        len_b.push(answer_b);

        if let (Some(a), Some(b)) = (answer_a, answer_b) {
            let id = ItemId::from_position(items.len() + 1);
            items.push(ComparisonItem::new(id, a, b));
        }
    }

    let dropped = rows_read - items.len();
    if dropped > 0 {
        tracing::debug!(language = %language.code, dropped, "dropped incomplete rows");
    }

    items.shuffle(rng);

    Ok(PairSet {
        language: language.code.clone(),
        items,
        stats: PairSetStats {
            rows_read,
            avg_len_a: len_a.mean(),
            avg_len_b: len_b.mean(),
        },
    })
}

#[derive(Default)]
struct LengthMean {
    total_chars: usize,
    count: usize,
}

impl LengthMean {
    fn push(&mut self, value: Option<&str>) {
        if let Some(value) = value {
            self.total_chars += value.chars().count();
            self.count += 1;
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = self.total_chars as f64 / self.count as f64;
        mean
    }
}
