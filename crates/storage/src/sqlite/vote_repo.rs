use sqlx::Row;
use vote_core::model::{ItemId, LanguageCode, Respondent, Vote};
use vote_core::stats::{ItemTally, RespondentActivity};

use super::SqliteRepository;
use super::mapping::{
    conn, map_vote_row, respondent_from_text, ser, ts_from_text, ts_to_text, u32_from_i64,
};
use crate::repository::{StorageError, VoteRepository, sort_votes};

const VOTE_COLUMNS: &str = "email, lang, pair_id, label, ts";

impl SqliteRepository {
    async fn fetch_votes(
        &self,
        filter: &str,
        binds: &[&str],
    ) -> Result<Vec<Vote>, StorageError> {
        let sql = format!("SELECT {VOTE_COLUMNS} FROM votes {filter}");
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_vote_row(&row)?);
        }
        // Item ids are positional text; order them numerically rather than by SQL text order.
        sort_votes(&mut out);
        Ok(out)
    }
}

#[async_trait::async_trait]
impl VoteRepository for SqliteRepository {
    async fn record_vote(&self, vote: &Vote) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO votes (email, lang, pair_id, label, ts)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(email, lang, pair_id) DO UPDATE SET
                    label = excluded.label,
                    ts = excluded.ts
            ",
        )
        .bind(vote.respondent.email())
        .bind(vote.language.as_str())
        .bind(vote.item_id.as_str())
        .bind(vote.label.to_i64())
        .bind(ts_to_text(vote.voted_at))
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn votes_for(
        &self,
        respondent: &Respondent,
        language: &LanguageCode,
    ) -> Result<Vec<Vote>, StorageError> {
        self.fetch_votes(
            "WHERE email = ?1 AND lang = ?2",
            &[respondent.email(), language.as_str()],
        )
        .await
    }

    async fn votes_for_language(&self, language: &LanguageCode) -> Result<Vec<Vote>, StorageError> {
        self.fetch_votes("WHERE lang = ?1", &[language.as_str()]).await
    }

    async fn all_votes(&self) -> Result<Vec<Vote>, StorageError> {
        self.fetch_votes("", &[]).await
    }

    async fn item_tallies(&self, language: &LanguageCode) -> Result<Vec<ItemTally>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    pair_id,
                    COUNT(*) AS voters,
                    SUM(CASE WHEN label = 1 THEN 1 ELSE 0 END) AS left_better,
                    SUM(CASE WHEN label = 0 THEN 1 ELSE 0 END) AS tie,
                    SUM(CASE WHEN label = -1 THEN 1 ELSE 0 END) AS right_better
                FROM votes
                WHERE lang = ?1
                GROUP BY pair_id
            ",
        )
        .bind(language.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(ItemTally {
                item_id: ItemId::new(row.try_get::<String, _>("pair_id").map_err(ser)?),
                voters: u32_from_i64("voters", row.try_get("voters").map_err(ser)?)?,
                left_better: u32_from_i64("left_better", row.try_get("left_better").map_err(ser)?)?,
                tie: u32_from_i64("tie", row.try_get("tie").map_err(ser)?)?,
                right_better: u32_from_i64(
                    "right_better",
                    row.try_get("right_better").map_err(ser)?,
                )?,
            });
        }
        out.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        Ok(out)
    }

    async fn respondent_activity(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<RespondentActivity>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT email, COUNT(*) AS completed, MIN(ts) AS first_ts, MAX(ts) AS last_ts
                FROM votes
                WHERE lang = ?1
                GROUP BY email
                HAVING completed > 0
                ORDER BY email ASC
            ",
        )
        .bind(language.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let first: String = row.try_get("first_ts").map_err(ser)?;
            let last: String = row.try_get("last_ts").map_err(ser)?;
            out.push(RespondentActivity {
                respondent: respondent_from_text(&row.try_get::<String, _>("email").map_err(ser)?)?,
                completed: u32_from_i64("completed", row.try_get("completed").map_err(ser)?)?,
                first_vote_at: ts_from_text("ts", &first)?,
                last_vote_at: ts_from_text("ts", &last)?,
            });
        }
        Ok(out)
    }
}
