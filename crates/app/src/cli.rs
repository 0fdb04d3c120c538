use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Pairwise A/B comparison voting.
#[derive(Debug, Parser)]
#[command(name = "pairvote", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub overrides: ConfigArgs,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Flags that override the layered configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Configuration file (defaults to `pairvote.toml` when present).
    #[arg(long, global = true, env = "PAIRVOTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// CSV file with the comparison pairs.
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,

    /// SQLite URL or file path of the vote store.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Directory that exports are written into.
    #[arg(long, global = true)]
    pub export_dir: Option<PathBuf>,

    /// Respondent email supplied by the host; skips the email prompt.
    #[arg(long, global = true)]
    pub respondent: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the desktop annotation UI (default).
    Ui,
    /// Write a CSV export of recorded votes.
    Export(ExportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[arg(long, value_enum)]
    pub kind: ExportKindArg,

    /// Language code; required for every kind except `all`.
    #[arg(long)]
    pub lang: Option<String>,

    /// Respondent email; required for `mine`.
    #[arg(long)]
    pub email: Option<String>,

    /// Output directory (defaults to the configured export directory).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKindArg {
    /// One respondent's votes in one language.
    Mine,
    /// Per-item label counts of one language.
    Stats,
    /// Every vote of one language.
    Raw,
    /// Every vote across languages.
    All,
}
