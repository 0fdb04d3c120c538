#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod export;
pub mod leaderboard;
pub mod pairs;
pub mod sessions;

pub use vote_core::Clock;

pub use app_services::{AppServices, ServiceSettings};
pub use error::{AppServicesError, ExportError, PairLoadError, SessionError};
pub use export::{CsvExport, ExportService};
pub use leaderboard::{Leaderboard, LeaderboardService, MyRank};
pub use pairs::{PairCache, PairSet, PairSetStats};
pub use sessions::{
    AnsweringScreen, ClientSession, CompletionScreen, Screen, SessionLoopService, SessionProgress,
    SessionRequest, Stage,
};
