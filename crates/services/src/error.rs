//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use vote_core::model::{ItemId, LanguageCode};

/// Errors emitted while loading comparison pairs from a tabular source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PairLoadError {
    #[error("cannot read comparison source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed comparison source: {0}")]
    Csv(#[from] csv::Error),
    #[error("comparison source is missing column: {column}")]
    MissingColumn { column: String },
}

/// Errors emitted by the session loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no comparison items available for language {0}")]
    Empty(LanguageCode),
    #[error("unsupported language: {0}")]
    UnknownLanguage(LanguageCode),
    #[error("item {0} is not part of the current comparison set")]
    UnknownItem(ItemId),
    #[error("no respondent has signed in")]
    SignedOut,
    #[error("a respondent and language must be chosen first")]
    NotAnswering,
    #[error(transparent)]
    Pairs(#[from] PairLoadError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Whether the error is an operator configuration problem rather than a
    /// transient or respondent-caused failure.
    #[must_use]
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            SessionError::Pairs(PairLoadError::MissingColumn { .. } | PairLoadError::Io { .. })
        )
    }
}

/// Errors emitted by `ExportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("cannot write export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("export buffer is not valid UTF-8")]
    Encoding,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("no languages configured")]
    NoLanguages,
}
