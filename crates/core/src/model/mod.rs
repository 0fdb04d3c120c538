mod ids;
mod item;
mod language;
mod respondent;
mod session;
mod vote;

pub use ids::{ItemId, LanguageCode, ParseIdError};

pub use item::ComparisonItem;
pub use language::LanguageSpec;
pub use respondent::{Respondent, RespondentError};
pub use session::{SessionRecord, SessionRecordError};
pub use vote::{Vote, VoteError, VoteLabel};
