mod annotate;
mod export;
mod leaderboard;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use annotate::AnnotateView;
pub use export::{ExportButton, ExportKind};
pub use leaderboard::LeaderboardView;
pub use state::{ViewError, ViewState, view_state_from_resource};
