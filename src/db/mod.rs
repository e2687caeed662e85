//! Keyed storage for revision items, daily logs and the user config.

mod memory;
mod pool;
mod postgres;

pub use memory::MemoryStore;
pub use pool::create_pool;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::models::revision::RevisionItem;
use crate::models::user_config::UserConfig;

#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Revision queue
    // =========================================================================

    /// Fails with `AppError::Duplicate` when the link is already queued.
    async fn insert_revision_item(&self, item: RevisionItem) -> AppResult<RevisionItem>;

    /// All items, earliest due first.
    async fn list_revision_items(&self) -> AppResult<Vec<RevisionItem>>;

    async fn peek_revision_item(&self) -> AppResult<Option<RevisionItem>>;

    /// Removes and returns the earliest item. Two concurrent callers never
    /// receive the same item.
    async fn pop_revision_item(&self) -> AppResult<Option<RevisionItem>>;

    async fn count_revision_due_by(&self, at: DateTime<Utc>) -> AppResult<u32>;

    async fn delete_revision_item(&self, id: Uuid) -> AppResult<Option<RevisionItem>>;

    // =========================================================================
    // Daily logs
    // =========================================================================

    async fn get_daily_log(&self, date: NaiveDate) -> AppResult<Option<DailyLog>>;

    /// Inserts only if no log exists for that date. Returns whether it was inserted.
    async fn insert_daily_log(&self, log: &DailyLog) -> AppResult<bool>;

    async fn save_daily_log(&self, log: &DailyLog) -> AppResult<()>;

    /// Logs within `[start, end]`, ascending by date.
    async fn list_daily_logs(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DailyLog>>;

    async fn list_submitted_daily_logs(&self) -> AppResult<Vec<DailyLog>>;

    // =========================================================================
    // User config
    // =========================================================================

    async fn load_user_config(&self) -> AppResult<Option<UserConfig>>;

    async fn save_user_config(&self, config: &UserConfig) -> AppResult<()>;

    async fn ping(&self) -> bool;
}
