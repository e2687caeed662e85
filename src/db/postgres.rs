use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::error::{AppError, AppResult};
use crate::models::daily_log::DailyLog;
use crate::models::revision::RevisionItem;
use crate::models::user_config::UserConfig;

const USER_CONFIG_ROW: i32 = 1;

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_revision_item(&self, item: RevisionItem) -> AppResult<RevisionItem> {
        let inserted = sqlx::query_as::<_, RevisionItem>(
            r#"
            INSERT INTO revision_items (id, problem_link, watched_at, due_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (problem_link) DO NOTHING
            RETURNING id, problem_link, watched_at, due_at, seq
            "#,
        )
        .bind(item.id)
        .bind(&item.problem_link)
        .bind(item.watched_at)
        .bind(item.due_at)
        .fetch_optional(&self.db)
        .await?;

        inserted.ok_or_else(|| AppError::Duplicate("This problem is already in your queue".into()))
    }

    async fn list_revision_items(&self) -> AppResult<Vec<RevisionItem>> {
        let items = sqlx::query_as::<_, RevisionItem>(
            "SELECT id, problem_link, watched_at, due_at, seq FROM revision_items ORDER BY due_at, seq",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }

    async fn peek_revision_item(&self) -> AppResult<Option<RevisionItem>> {
        let item = sqlx::query_as::<_, RevisionItem>(
            "SELECT id, problem_link, watched_at, due_at, seq FROM revision_items ORDER BY due_at, seq LIMIT 1",
        )
        .fetch_optional(&self.db)
        .await?;
        Ok(item)
    }

    async fn pop_revision_item(&self) -> AppResult<Option<RevisionItem>> {
        // SKIP LOCKED lets a concurrent pop move on to the next row instead of
        // returning the one already claimed.
        let item = sqlx::query_as::<_, RevisionItem>(
            r#"
            DELETE FROM revision_items
            WHERE id = (
                SELECT id FROM revision_items
                ORDER BY due_at, seq
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, problem_link, watched_at, due_at, seq
            "#,
        )
        .fetch_optional(&self.db)
        .await?;
        Ok(item)
    }

    async fn count_revision_due_by(&self, at: DateTime<Utc>) -> AppResult<u32> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM revision_items WHERE due_at <= $1",
        )
        .bind(at)
        .fetch_one(&self.db)
        .await?;
        Ok(count.max(0) as u32)
    }

    async fn delete_revision_item(&self, id: Uuid) -> AppResult<Option<RevisionItem>> {
        let item = sqlx::query_as::<_, RevisionItem>(
            "DELETE FROM revision_items WHERE id = $1 RETURNING id, problem_link, watched_at, due_at, seq",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(item)
    }

    async fn get_daily_log(&self, date: NaiveDate) -> AppResult<Option<DailyLog>> {
        let body = sqlx::query_scalar::<_, Json<DailyLog>>(
            "SELECT body FROM daily_logs WHERE log_date = $1",
        )
        .bind(date)
        .fetch_optional(&self.db)
        .await?;
        Ok(body.map(|Json(log)| log))
    }

    async fn insert_daily_log(&self, log: &DailyLog) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO daily_logs (log_date, is_submitted, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (log_date) DO NOTHING
            "#,
        )
        .bind(log.date)
        .bind(log.is_submitted)
        .bind(Json(log))
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn save_daily_log(&self, log: &DailyLog) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_logs (log_date, is_submitted, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (log_date) DO UPDATE SET
                is_submitted = EXCLUDED.is_submitted,
                body = EXCLUDED.body,
                updated_at = NOW()
            "#,
        )
        .bind(log.date)
        .bind(log.is_submitted)
        .bind(Json(log))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn list_daily_logs(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DailyLog>> {
        let rows = sqlx::query_scalar::<_, Json<DailyLog>>(
            r#"
            SELECT body FROM daily_logs
            WHERE log_date BETWEEN $1 AND $2
            ORDER BY log_date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|Json(log)| log).collect())
    }

    async fn list_submitted_daily_logs(&self) -> AppResult<Vec<DailyLog>> {
        let rows = sqlx::query_scalar::<_, Json<DailyLog>>(
            "SELECT body FROM daily_logs WHERE is_submitted ORDER BY log_date ASC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|Json(log)| log).collect())
    }

    async fn load_user_config(&self) -> AppResult<Option<UserConfig>> {
        let body = sqlx::query_scalar::<_, Json<UserConfig>>(
            "SELECT body FROM user_config WHERE id = $1",
        )
        .bind(USER_CONFIG_ROW)
        .fetch_optional(&self.db)
        .await?;
        Ok(body.map(|Json(config)| config))
    }

    async fn save_user_config(&self, config: &UserConfig) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_config (id, body)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()
            "#,
        )
        .bind(USER_CONFIG_ROW)
        .bind(Json(config))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await
            .is_ok()
    }
}
