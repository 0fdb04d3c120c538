use chrono::{DateTime, Utc};
use sqlx::Row;
use vote_core::model::{ItemId, LanguageCode, Respondent, SessionRecord, Vote, VoteLabel};
use vote_core::time::format_timestamp;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Timestamps are stored as fixed-width RFC 3339 text (seconds precision,
/// `+00:00` offset) so `MIN`/`MAX`/`ORDER BY` on the column are chronological.
pub(crate) fn ts_to_text(at: DateTime<Utc>) -> String {
    format_timestamp(at)
}

pub(crate) fn ts_from_text(field: &'static str, raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StorageError::Serialization(format!("invalid {field} {raw:?}: {e}")))
}

pub(crate) fn respondent_from_text(raw: &str) -> Result<Respondent, StorageError> {
    Respondent::from_trusted(raw).map_err(ser)
}

pub(crate) fn language_from_text(raw: &str) -> Result<LanguageCode, StorageError> {
    LanguageCode::new(raw).map_err(ser)
}

pub(crate) fn label_from_i64(value: i64) -> Result<VoteLabel, StorageError> {
    VoteLabel::from_i64(value).map_err(ser)
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<SessionRecord, StorageError> {
    let respondent = respondent_from_text(&row.try_get::<String, _>("email").map_err(ser)?)?;
    let language = language_from_text(&row.try_get::<String, _>("lang").map_err(ser)?)?;
    let started_at = ts_from_text("start_ts", &row.try_get::<String, _>("start_ts").map_err(ser)?)?;
    let finished_at = row
        .try_get::<Option<String>, _>("finish_ts")
        .map_err(ser)?
        .map(|raw| ts_from_text("finish_ts", &raw))
        .transpose()?;

    SessionRecord::from_persisted(respondent, language, started_at, finished_at).map_err(ser)
}

pub(crate) fn map_vote_row(row: &sqlx::sqlite::SqliteRow) -> Result<Vote, StorageError> {
    Ok(Vote::new(
        respondent_from_text(&row.try_get::<String, _>("email").map_err(ser)?)?,
        language_from_text(&row.try_get::<String, _>("lang").map_err(ser)?)?,
        ItemId::new(row.try_get::<String, _>("pair_id").map_err(ser)?),
        label_from_i64(row.try_get::<i64, _>("label").map_err(ser)?)?,
        ts_from_text("ts", &row.try_get::<String, _>("ts").map_err(ser)?)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vote_core::time::fixed_now;

    #[test]
    fn timestamps_round_trip_through_text() {
        let text = ts_to_text(fixed_now());
        assert_eq!(ts_from_text("ts", &text).unwrap(), fixed_now());
    }

    #[test]
    fn invalid_timestamp_is_a_serialization_error() {
        let err = ts_from_text("ts", "yesterday").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn stored_label_out_of_range_is_rejected() {
        assert!(label_from_i64(3).is_err());
        assert_eq!(label_from_i64(-1).unwrap(), VoteLabel::RightBetter);
    }
}
