use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{LanguageCode, Respondent};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionRecordError {
    #[error("finished_at is before started_at")]
    InvalidTimeRange,
}

/// One respondent's pass through one language's item set.
///
/// Created on the first visit and only ever mutated to set `finished_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    respondent: Respondent,
    language: LanguageCode,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    #[must_use]
    pub fn started(
        respondent: Respondent,
        language: LanguageCode,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            respondent,
            language,
            started_at,
            finished_at: None,
        }
    }

    /// Rehydrate a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionRecordError::InvalidTimeRange` if the finish precedes the start.
    pub fn from_persisted(
        respondent: Respondent,
        language: LanguageCode,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
    ) -> Result<Self, SessionRecordError> {
        if finished_at.is_some_and(|finished| finished < started_at) {
            return Err(SessionRecordError::InvalidTimeRange);
        }
        Ok(Self {
            respondent,
            language,
            started_at,
            finished_at,
        })
    }

    #[must_use]
    pub fn respondent(&self) -> &Respondent {
        &self.respondent
    }

    #[must_use]
    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Set the finish timestamp unless one is already present.
    ///
    /// Returns `true` if the timestamp was set by this call. A finish earlier
    /// than the start is clamped to the start.
    pub fn finish(&mut self, at: DateTime<Utc>) -> bool {
        if self.finished_at.is_some() {
            return false;
        }
        self.finished_at = Some(at.max(self.started_at));
        true
    }

    /// Wall-clock duration of a finished session in seconds.
    #[must_use]
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.finished_at.map(|finished| {
            let millis = (finished - self.started_at).num_milliseconds();
            #[allow(clippy::cast_precision_loss)]
            let secs = millis as f64 / 1000.0;
            secs
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn record() -> SessionRecord {
        SessionRecord::started(
            Respondent::parse("a@b.io").unwrap(),
            LanguageCode::new("en").unwrap(),
            fixed_now(),
        )
    }

    #[test]
    fn finish_is_set_once() {
        let mut session = record();
        assert!(session.finish(fixed_now() + Duration::seconds(90)));
        assert!(!session.finish(fixed_now() + Duration::seconds(500)));
        assert_eq!(session.elapsed_secs(), Some(90.0));
    }

    #[test]
    fn unfinished_session_has_no_elapsed_time() {
        assert_eq!(record().elapsed_secs(), None);
    }

    #[test]
    fn persisted_range_is_validated() {
        let err = SessionRecord::from_persisted(
            Respondent::parse("a@b.io").unwrap(),
            LanguageCode::new("en").unwrap(),
            fixed_now(),
            Some(fixed_now() - Duration::seconds(1)),
        )
        .unwrap_err();
        assert_eq!(err, SessionRecordError::InvalidTimeRange);
    }
}
