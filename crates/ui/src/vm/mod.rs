mod leaderboard_vm;
mod markdown_vm;
mod time_fmt;
mod vote_vm;

pub use leaderboard_vm::{ItemStatsRowVm, LeaderboardRowVm, map_item_stats, map_leaderboard};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use time_fmt::{format_datetime, format_one_decimal, whole_secs};
pub use vote_vm::{AnsweringVm, CompletionVm, ScreenVm, VoteRowVm, map_screen};
