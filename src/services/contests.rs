//! Contest participation tracker: upcoming rounds, history since 2024 and
//! participation streaks.

use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

/// Participation history starts here.
pub const HISTORY_START_YEAR: i32 = 2024;
pub const LAST_YEAR_DAYS: i64 = 365;
pub const LAST_MONTH_DAYS: i64 = 30;

/// Name fragments of rounds open to a Div. 2-4 participant.
const RELEVANT_MARKERS: [&str; 12] = [
    "div. 4",
    "div. 3",
    "div. 2",
    "educational",
    "global round",
    "good bye",
    "hello 20",
    "codeton",
    "pinely",
    "vk cup",
    "epic",
    "codeforces round",
];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContestPhase {
    Before,
    Running,
    Finished,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Contest {
    pub id: u32,
    pub name: String,
    pub phase: ContestPhase,
    pub start_time: DateTime<Utc>,
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContestParticipation {
    pub id: u32,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub participated: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ContestStats {
    pub current_streak: u32,
    pub max_streak: u32,
    pub max_streak_last_year: u32,
    pub max_streak_last_month: u32,
    pub total_contests: u32,
    pub participated_contests: u32,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ContestSummary {
    /// Nearest first.
    pub upcoming: Vec<Contest>,
    /// Oldest first.
    pub history: Vec<ContestParticipation>,
    pub stats: ContestStats,
}

pub fn is_relevant_contest(name: &str) -> bool {
    let name = name.to_lowercase();
    if name.contains("mirror") {
        return false;
    }
    if name.contains("div. 1") && !name.contains("div. 2") {
        return false;
    }
    RELEVANT_MARKERS.iter().any(|m| name.contains(m))
}

fn history_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(HISTORY_START_YEAR, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Longest run of consecutive attended contests.
fn longest_run<'a>(history: impl Iterator<Item = &'a ContestParticipation>) -> u32 {
    let (mut longest, mut run) = (0u32, 0u32);
    for contest in history {
        if contest.participated {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

pub fn contest_stats(history: &[ContestParticipation], now: DateTime<Utc>) -> ContestStats {
    let since = |days: i64| {
        let cutoff = now - Duration::days(days);
        history.iter().filter(move |c| c.start_time >= cutoff)
    };

    ContestStats {
        current_streak: history.iter().rev().take_while(|c| c.participated).count() as u32,
        max_streak: longest_run(history.iter()),
        max_streak_last_year: longest_run(since(LAST_YEAR_DAYS)),
        max_streak_last_month: longest_run(since(LAST_MONTH_DAYS)),
        total_contests: history.len() as u32,
        participated_contests: history.iter().filter(|c| c.participated).count() as u32,
    }
}

pub fn contest_summary(
    contests: Vec<Contest>,
    participated: &HashSet<u32>,
    now: DateTime<Utc>,
) -> ContestSummary {
    let start = history_start();
    let (mut upcoming, mut finished): (Vec<Contest>, Vec<Contest>) = contests
        .into_iter()
        .filter(|c| is_relevant_contest(&c.name))
        .filter(|c| c.phase != ContestPhase::Running)
        .partition(|c| c.phase == ContestPhase::Before);

    upcoming.sort_by_key(|c| c.start_time);
    finished.retain(|c| c.start_time >= start);
    finished.sort_by_key(|c| c.start_time);

    let history: Vec<ContestParticipation> = finished
        .into_iter()
        .map(|c| ContestParticipation {
            participated: participated.contains(&c.id),
            id: c.id,
            name: c.name,
            start_time: c.start_time,
        })
        .collect();

    ContestSummary {
        upcoming,
        stats: contest_stats(&history, now),
        history,
    }
}
