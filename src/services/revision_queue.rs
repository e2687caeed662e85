//! Spaced-review queue of problems whose editorial has been watched.
//!
//! Items are ordered by `due_at`, ties broken by insertion order. Links are
//! unique across live items (exact, case-sensitive match).

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::revision::RevisionItem;

fn problem_link_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(
                r"^https?://(www\.)?codeforces\.com/(problemset/problem|contest)/\d+/(problem/)?[A-Z]\d*",
            )
            .expect("valid problemset/contest pattern"),
            Regex::new(r"^https?://(www\.)?codeforces\.com/gym/\d+/problem/[A-Z]\d*")
                .expect("valid gym pattern"),
        ]
    })
}

/// Accepts only the judge's canonical problemset, contest and gym problem URLs.
pub fn validate_problem_link(link: &str) -> AppResult<&str> {
    let link = link.trim();
    if link.is_empty() {
        return Err(AppError::Validation("Problem link is required".into()));
    }
    if problem_link_patterns().iter().any(|re| re.is_match(link)) {
        Ok(link)
    } else {
        Err(AppError::Validation(
            "Please provide a valid Codeforces problem link".into(),
        ))
    }
}

type QueueKey = (DateTime<Utc>, i64);

#[derive(Debug, Default)]
pub struct RevisionQueue {
    items: BTreeMap<QueueKey, RevisionItem>,
    by_link: HashMap<String, QueueKey>,
    by_id: HashMap<Uuid, QueueKey>,
    next_seq: i64,
}

impl RevisionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_link(&self, link: &str) -> bool {
        self.by_link.contains_key(link)
    }

    /// Inserts a prepared item, assigning its sequence number.
    pub fn insert(&mut self, mut item: RevisionItem) -> AppResult<RevisionItem> {
        if self.contains_link(&item.problem_link) {
            return Err(AppError::Duplicate(
                "This problem is already in your queue".into(),
            ));
        }
        self.next_seq += 1;
        item.seq = self.next_seq;
        let key = (item.due_at, item.seq);
        self.by_link.insert(item.problem_link.clone(), key);
        self.by_id.insert(item.id, key);
        self.items.insert(key, item.clone());
        Ok(item)
    }

    pub fn peek_earliest(&self) -> AppResult<&RevisionItem> {
        self.items
            .values()
            .next()
            .ok_or(AppError::EmptyQueue)
    }

    pub fn pop_earliest(&mut self) -> AppResult<RevisionItem> {
        let (_, item) = self.items.pop_first().ok_or(AppError::EmptyQueue)?;
        self.by_link.remove(&item.problem_link);
        self.by_id.remove(&item.id);
        Ok(item)
    }

    pub fn count_due_by(&self, at: DateTime<Utc>) -> usize {
        self.items.range(..=(at, i64::MAX)).count()
    }

    pub fn remove_by_id(&mut self, id: Uuid) -> AppResult<RevisionItem> {
        let key = self
            .by_id
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Problem not found".into()))?;
        let item = self
            .items
            .remove(&key)
            .ok_or_else(|| AppError::NotFound("Problem not found".into()))?;
        self.by_link.remove(&item.problem_link);
        Ok(item)
    }

    /// Items in pop order.
    pub fn iter(&self) -> impl Iterator<Item = &RevisionItem> {
        self.items.values()
    }
}
