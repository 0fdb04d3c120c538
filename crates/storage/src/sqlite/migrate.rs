use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Apply pending schema migrations.
///
/// Table and column names match stores written by earlier deployments of
/// the voting tool, so an existing `votes.db` opens without conversion.
pub(super) async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: session and vote tables.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS users (
                    email TEXT NOT NULL,
                    lang TEXT NOT NULL,
                    start_ts TEXT NOT NULL,
                    finish_ts TEXT,
                    PRIMARY KEY (email, lang)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS votes (
                    email TEXT NOT NULL,
                    lang TEXT NOT NULL,
                    pair_id TEXT NOT NULL,
                    label INTEGER NOT NULL CHECK (label IN (-1, 0, 1)),
                    ts TEXT NOT NULL,
                    PRIMARY KEY (email, lang, pair_id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_votes_lang_pair
                    ON votes (lang, pair_id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}
