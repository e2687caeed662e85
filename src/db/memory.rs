use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Store;
use crate::error::{AppError, AppResult};
use crate::models::daily_log::DailyLog;
use crate::models::revision::RevisionItem;
use crate::models::user_config::UserConfig;
use crate::services::revision_queue::RevisionQueue;

#[derive(Default)]
struct Inner {
    queue: RevisionQueue,
    logs: BTreeMap<NaiveDate, DailyLog>,
    user_config: Option<UserConfig>,
}

/// Process-local store for single-instance runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_revision_item(&self, item: RevisionItem) -> AppResult<RevisionItem> {
        self.inner.lock().await.queue.insert(item)
    }

    async fn list_revision_items(&self) -> AppResult<Vec<RevisionItem>> {
        Ok(self.inner.lock().await.queue.iter().cloned().collect())
    }

    async fn peek_revision_item(&self) -> AppResult<Option<RevisionItem>> {
        match self.inner.lock().await.queue.peek_earliest() {
            Ok(item) => Ok(Some(item.clone())),
            Err(AppError::EmptyQueue) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn pop_revision_item(&self) -> AppResult<Option<RevisionItem>> {
        match self.inner.lock().await.queue.pop_earliest() {
            Ok(item) => Ok(Some(item)),
            Err(AppError::EmptyQueue) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn count_revision_due_by(&self, at: DateTime<Utc>) -> AppResult<u32> {
        Ok(self.inner.lock().await.queue.count_due_by(at) as u32)
    }

    async fn delete_revision_item(&self, id: Uuid) -> AppResult<Option<RevisionItem>> {
        match self.inner.lock().await.queue.remove_by_id(id) {
            Ok(item) => Ok(Some(item)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_daily_log(&self, date: NaiveDate) -> AppResult<Option<DailyLog>> {
        Ok(self.inner.lock().await.logs.get(&date).cloned())
    }

    async fn insert_daily_log(&self, log: &DailyLog) -> AppResult<bool> {
        let mut inner = self.inner.lock().await;
        if inner.logs.contains_key(&log.date) {
            return Ok(false);
        }
        inner.logs.insert(log.date, log.clone());
        Ok(true)
    }

    async fn save_daily_log(&self, log: &DailyLog) -> AppResult<()> {
        self.inner.lock().await.logs.insert(log.date, log.clone());
        Ok(())
    }

    async fn list_daily_logs(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DailyLog>> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .inner
            .lock()
            .await
            .logs
            .range(start..=end)
            .map(|(_, log)| log.clone())
            .collect())
    }

    async fn list_submitted_daily_logs(&self) -> AppResult<Vec<DailyLog>> {
        Ok(self
            .inner
            .lock()
            .await
            .logs
            .values()
            .filter(|log| log.is_submitted)
            .cloned()
            .collect())
    }

    async fn load_user_config(&self) -> AppResult<Option<UserConfig>> {
        Ok(self.inner.lock().await.user_config.clone())
    }

    async fn save_user_config(&self, config: &UserConfig) -> AppResult<()> {
        self.inner.lock().await.user_config = Some(config.clone());
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn test_insert_daily_log_only_once() {
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
        let first = DailyLog::new(now.date_naive(), false, now);
        let mut second = DailyLog::new(now.date_naive(), true, now);
        second.comment = "should not land".into();

        assert!(store.insert_daily_log(&first).await.unwrap());
        assert!(!store.insert_daily_log(&second).await.unwrap());
        let stored = store.get_daily_log(now.date_naive()).await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
    }

    #[tokio::test]
    async fn test_list_daily_logs_range_is_inclusive_and_sorted() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let day = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        for offset in [3, 0, 1, 5] {
            let log = DailyLog::new(day + Duration::days(offset), false, now);
            store.save_daily_log(&log).await.unwrap();
        }
        let logs = store
            .list_daily_logs(day, day + Duration::days(3))
            .await
            .unwrap();
        let dates: Vec<NaiveDate> = logs.iter().map(|l| l.date).collect();
        assert_eq!(
            dates,
            vec![day, day + Duration::days(1), day + Duration::days(3)]
        );
        assert!(store
            .list_daily_logs(day + Duration::days(2), day)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_pops_never_share_an_item() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let now = Utc::now();
        for i in 0..50 {
            let link = format!("https://codeforces.com/contest/{}/problem/A", 1000 + i);
            store
                .insert_revision_item(RevisionItem::new(link, now))
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut popped = Vec::new();
                while let Some(item) = store.pop_revision_item().await.unwrap() {
                    popped.push(item.id);
                }
                popped
            }));
        }

        let mut all = Vec::new();
        for h in handles {
            all.extend(h.await.unwrap());
        }
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), 50);
        assert_eq!(unique.len(), 50);
    }
}
