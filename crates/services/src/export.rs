use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::repository::VoteRepository;
use vote_core::model::{LanguageCode, Respondent, Vote};
use vote_core::stats::ItemTally;
use vote_core::time::format_timestamp;

use crate::error::ExportError;

/// A rendered CSV document and the file name it is offered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
}

impl CsvExport {
    /// Write the document into `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` if the directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = self.contents.len(), "export written");
        Ok(path)
    }
}

/// Builds CSV exports from the vote store.
#[derive(Clone)]
pub struct ExportService {
    votes: Arc<dyn VoteRepository>,
}

impl ExportService {
    #[must_use]
    pub fn new(votes: Arc<dyn VoteRepository>) -> Self {
        Self { votes }
    }

    /// The respondent's own votes in one language.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` on storage or encoding failures.
    pub async fn my_votes(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
    ) -> Result<CsvExport, ExportError> {
        let votes = self.votes.votes_for(respondent, language).await?;
        own_votes_csv(respondent, language, &votes)
    }

    /// Per-item label counts of one language.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` on storage or encoding failures.
    pub async fn item_stats(&self, language: &LanguageCode) -> Result<CsvExport, ExportError> {
        let tallies = self.votes.item_tallies(language).await?;
        item_stats_csv(language, &tallies)
    }

    /// Every vote cast in one language.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` on storage or encoding failures.
    pub async fn raw_votes(&self, language: &LanguageCode) -> Result<CsvExport, ExportError> {
        let votes = self.votes.votes_for_language(language).await?;
        raw_votes_csv(format!("all_votes_{language}.csv"), &votes)
    }

    /// Every vote in the store, across languages.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` on storage or encoding failures.
    pub async fn all_votes(&self) -> Result<CsvExport, ExportError> {
        let votes = self.votes.all_votes().await?;
        raw_votes_csv("all_languages_votes.csv".to_string(), &votes)
    }
}

/// `pair_id,label,ts` rows for one respondent.
///
/// # Errors
///
/// Returns `ExportError` if the CSV cannot be encoded.
pub fn own_votes_csv(
    respondent: &Respondent,
    language: &LanguageCode,
    votes: &[Vote],
) -> Result<CsvExport, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["pair_id", "label", "ts"])?;
    for vote in votes {
        writer.write_record([
            vote.item_id.to_string(),
            vote.label.to_i64().to_string(),
            format_timestamp(vote.voted_at),
        ])?;
    }
    Ok(CsvExport {
        file_name: format!("votes_{language}_{}.csv", respondent.email()),
        contents: finish(writer)?,
    })
}

const STATS_HEADER_EN: [&str; 6] = ["pair_id", "Voters", "AvgScore", "VersionA", "Tie", "VersionB"];
const STATS_HEADER_ZH: [&str; 6] = ["pair_id", "投票人数", "平均得分", "版本A更好", "平分", "版本B更好"];

/// Per-item tally rows; `zh` gets Chinese column names, every other language
/// `pair_id,Voters,AvgScore,VersionA,Tie,VersionB`.
///
/// # Errors
///
/// Returns `ExportError` if the CSV cannot be encoded.
pub fn item_stats_csv(
    language: &LanguageCode,
    tallies: &[ItemTally],
) -> Result<CsvExport, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let header = if language.as_str() == "zh" {
        STATS_HEADER_ZH
    } else {
        STATS_HEADER_EN
    };
    writer.write_record(header)?;
    for tally in tallies {
        writer.write_record([
            tally.item_id.to_string(),
            tally.voters.to_string(),
            float_cell(tally.mean_score()),
            tally.left_better.to_string(),
            tally.tie.to_string(),
            tally.right_better.to_string(),
        ])?;
    }
    Ok(CsvExport {
        file_name: format!("question_stats_{language}.csv"),
        contents: finish(writer)?,
    })
}

/// `pair_id,email,lang,label,ts` rows.
///
/// # Errors
///
/// Returns `ExportError` if the CSV cannot be encoded.
pub fn raw_votes_csv(file_name: String, votes: &[Vote]) -> Result<CsvExport, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["pair_id", "email", "lang", "label", "ts"])?;
    for vote in votes {
        writer.write_record([
            vote.item_id.to_string(),
            vote.respondent.email().to_string(),
            vote.language.to_string(),
            vote.label.to_i64().to_string(),
            format_timestamp(vote.voted_at),
        ])?;
    }
    Ok(CsvExport {
        file_name,
        contents: finish(writer)?,
    })
}

/// Shortest round-trip form, always with a decimal point (`1.0`, `-0.5`).
fn float_cell(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}

#[cfg(test)]
mod tests {
    use storage::repository::InMemoryRepository;
    use vote_core::model::{ItemId, VoteLabel};
    use vote_core::time::fixed_now;

    use super::*;

    fn vote(email: &str, lang: &str, item: &str, label: VoteLabel) -> Vote {
        Vote::new(
            Respondent::parse(email).unwrap(),
            LanguageCode::new(lang).unwrap(),
            ItemId::new(item),
            label,
            fixed_now(),
        )
    }

    async fn seeded_repo() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        for v in [
            vote("ann@x.io", "en", "10", VoteLabel::LeftBetter),
            vote("ann@x.io", "en", "2", VoteLabel::RightBetter),
            vote("ben@x.io", "en", "2", VoteLabel::Tie),
            vote("ann@x.io", "zh", "1", VoteLabel::Tie),
        ] {
            repo.record_vote(&v).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn own_votes_are_ordered_by_item() {
        let svc = ExportService::new(Arc::new(seeded_repo().await));
        let export = svc
            .my_votes(
                &Respondent::parse("ann@x.io").unwrap(),
                &LanguageCode::new("en").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(export.file_name, "votes_en_ann@x.io.csv");
        assert_eq!(
            export.contents,
            "pair_id,label,ts\n\
             2,-1,2023-11-14T22:13:20+00:00\n\
             10,1,2023-11-14T22:13:20+00:00\n"
        );
    }

    #[tokio::test]
    async fn item_stats_report_counts_and_mean() {
        let svc = ExportService::new(Arc::new(seeded_repo().await));
        let export = svc
            .item_stats(&LanguageCode::new("en").unwrap())
            .await
            .unwrap();
        assert_eq!(export.file_name, "question_stats_en.csv");
        assert_eq!(
            export.contents,
            "pair_id,Voters,AvgScore,VersionA,Tie,VersionB\n\
             2,2,-0.5,0,1,1\n\
             10,1,1.0,1,0,0\n"
        );
    }

    #[tokio::test]
    async fn item_stats_use_chinese_headers_for_zh() {
        let svc = ExportService::new(Arc::new(seeded_repo().await));
        let export = svc
            .item_stats(&LanguageCode::new("zh").unwrap())
            .await
            .unwrap();
        assert_eq!(export.file_name, "question_stats_zh.csv");
        assert_eq!(
            export.contents,
            "pair_id,投票人数,平均得分,版本A更好,平分,版本B更好\n\
             1,1,0.0,0,1,0\n"
        );
    }

    #[test]
    fn mean_cells_keep_a_decimal_point() {
        assert_eq!(float_cell(1.0), "1.0");
        assert_eq!(float_cell(0.0), "0.0");
        assert_eq!(float_cell(-0.5), "-0.5");
        assert_eq!(float_cell(1.0 / 3.0), "0.3333333333333333");
    }

    #[tokio::test]
    async fn all_votes_cover_every_language() {
        let svc = ExportService::new(Arc::new(seeded_repo().await));
        let export = svc.all_votes().await.unwrap();
        assert_eq!(export.file_name, "all_languages_votes.csv");
        let rows: Vec<&str> = export.contents.lines().collect();
        assert_eq!(rows[0], "pair_id,email,lang,label,ts");
        assert_eq!(rows.len(), 5);
        assert!(rows[4].starts_with("1,ann@x.io,zh,0,"));
    }

    #[test]
    fn write_to_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("exports");
        let export = CsvExport {
            file_name: "all_votes_en.csv".into(),
            contents: "pair_id,email,lang,label,ts\n".into(),
        };
        let path = export.write_to(&target).unwrap();
        assert_eq!(path, target.join("all_votes_en.csv"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "pair_id,email,lang,label,ts\n"
        );
    }
}
