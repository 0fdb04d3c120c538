//! Layered configuration.
//!
//! Sources, lowest to highest priority: built-in defaults, `pairvote.toml`
//! (or the file named by `--config`), `PAIRVOTE_*` environment variables with
//! `__` separating nested keys, then command-line flags.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vote_core::model::LanguageSpec;

use crate::cli::ConfigArgs;

pub const DEFAULT_CONFIG_FILE: &str = "pairvote.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("configuration file not found: {0}")]
    MissingFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    pub csv_path: PathBuf,
    pub db_url: String,
    pub export_dir: PathBuf,
    /// Preset respondent email; when set the email prompt is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent: Option<String>,
    pub languages: Vec<LanguageSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("comparison_results.csv"),
            db_url: "sqlite://votes.db".to_string(),
            export_dir: PathBuf::from("exports"),
            respondent: None,
            languages: LanguageSpec::defaults(),
        }
    }
}

/// Command-line values layered over every other source.
#[derive(Debug, Default, Serialize)]
struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    csv_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    respondent: Option<String>,
}

impl From<&ConfigArgs> for FlagOverrides {
    fn from(args: &ConfigArgs) -> Self {
        Self {
            csv_path: args.csv.clone(),
            db_url: args.db.clone(),
            export_dir: args.export_dir.clone(),
            respondent: args.respondent.clone(),
        }
    }
}

impl AppConfig {
    /// Load configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFile` if an explicit `--config` file does
    /// not exist, and `ConfigError::Figment` for malformed sources.
    pub fn load(args: &ConfigArgs) -> Result<Self, ConfigError> {
        if let Some(path) = &args.config {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.clone()));
            }
        }
        Self::figment(args).extract().map_err(|err| ConfigError::Figment(Box::new(err)))
    }

    /// Build the provider chain without extracting it.
    #[must_use]
    pub fn figment(args: &ConfigArgs) -> Figment {
        let file = args
            .config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("PAIRVOTE_").split("__").ignore(&["log", "config"]))
            .merge(Serialized::defaults(FlagOverrides::from(args)))
    }
}
