use chrono::{DateTime, Utc};
use vote_core::model::{LanguageCode, Respondent, SessionRecord};

use super::SqliteRepository;
use super::mapping::{conn, map_session_row, ts_to_text};
use crate::repository::{SessionRepository, StorageError};

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn record_session_start(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO users (email, lang, start_ts)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(email, lang) DO NOTHING
            ",
        )
        .bind(respondent.email())
        .bind(language.as_str())
        .bind(ts_to_text(at))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.rows_affected() == 1)
    }

    async fn record_session_finish(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let res = sqlx::query(
            r"
                UPDATE users
                SET finish_ts = MAX(?3, start_ts)
                WHERE email = ?1 AND lang = ?2 AND finish_ts IS NULL
            ",
        )
        .bind(respondent.email())
        .bind(language.as_str())
        .bind(ts_to_text(at))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.rows_affected() == 1)
    }

    async fn get_session(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
    ) -> Result<Option<SessionRecord>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT email, lang, start_ts, finish_ts
                FROM users
                WHERE email = ?1 AND lang = ?2
            ",
        )
        .bind(respondent.email())
        .bind(language.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn finished_sessions(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT email, lang, start_ts, finish_ts
                FROM users
                WHERE lang = ?1 AND finish_ts IS NOT NULL
                ORDER BY email ASC
            ",
        )
        .bind(language.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_session_row(&row)?);
        }
        Ok(out)
    }
}
