//! Per-day intensity grid for one tracked category.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::daily_log::{DailyLog, PrayerLog, ProblemStatus};
use crate::services::scoring::DAILY_CODING_TARGET;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapCategory {
    #[default]
    Overall,
    Prayers,
    Coding,
    Revision,
    Workout,
    Academic,
    Kaggle,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: HeatmapCategory,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeatmapEntry {
    pub date: NaiveDate,
    pub value: f64,
    pub max: f64,
    /// 0 for no activity, then 1..=4 by quartile of `value / max`.
    pub level: u8,
}

#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    pub category: HeatmapCategory,
    pub entries: Vec<HeatmapEntry>,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// (value, max) for a single log.
pub fn category_value(log: &DailyLog, category: HeatmapCategory) -> (f64, f64) {
    match category {
        HeatmapCategory::Overall => {
            let value = if log.is_submitted {
                log.consistency_score as f64
            } else {
                0.0
            };
            (value, 100.0)
        }
        HeatmapCategory::Prayers => (log.prayers.count as f64, PrayerLog::TOTAL as f64),
        HeatmapCategory::Coding => {
            let leetcode = u32::from(log.leetcode.status == ProblemStatus::Solved);
            (
                (log.codeforces.solved_count + leetcode) as f64,
                DAILY_CODING_TARGET as f64,
            )
        }
        HeatmapCategory::Revision => (
            log.revision.solved_count() as f64,
            log.revision.total_due as f64,
        ),
        HeatmapCategory::Workout => {
            if log.workout.checklist.is_empty() {
                (f64::from(u8::from(log.workout.is_completed)), 1.0)
            } else {
                (
                    log.workout.checked_count() as f64,
                    log.workout.checklist.len() as f64,
                )
            }
        }
        HeatmapCategory::Academic => (log.academic.hours_done, log.academic.hours_target),
        HeatmapCategory::Kaggle => (log.kaggle.minutes_done, log.kaggle.target_minutes),
    }
}

pub fn intensity_level(value: f64, max: f64) -> u8 {
    if value <= 0.0 {
        return 0;
    }
    if max <= 0.0 {
        return 4;
    }
    let percentage = value / max * 100.0;
    if percentage <= 25.0 {
        1
    } else if percentage <= 50.0 {
        2
    } else if percentage <= 75.0 {
        3
    } else {
        4
    }
}

/// Logs must be sorted ascending by date.
pub fn build_entries(logs: &[DailyLog], category: HeatmapCategory) -> Vec<HeatmapEntry> {
    logs.iter()
        .map(|log| {
            let (value, max) = category_value(log, category);
            HeatmapEntry {
                date: log.date,
                value,
                max,
                level: intensity_level(value, max),
            }
        })
        .collect()
}

/// Longest run of consecutive calendar days with a non-zero value.
pub fn longest_streak(entries: &[HeatmapEntry]) -> u32 {
    let mut longest = 0u32;
    let mut streak = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for entry in entries.iter().filter(|e| e.value > 0.0) {
        streak = match prev {
            Some(p) if entry.date == p + Duration::days(1) => streak + 1,
            Some(p) if entry.date == p => streak,
            _ => 1,
        };
        longest = longest.max(streak);
        prev = Some(entry.date);
    }

    longest
}

/// Consecutive active days ending on `today`, or on the day before when
/// today has no activity yet.
pub fn current_streak(entries: &[HeatmapEntry], today: NaiveDate) -> u32 {
    let active: Vec<NaiveDate> = entries
        .iter()
        .filter(|e| e.value > 0.0)
        .map(|e| e.date)
        .collect();

    let mut check = if active.last() == Some(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0u32;
    for date in active.iter().rev() {
        if *date == check {
            streak += 1;
            check -= Duration::days(1);
        } else if *date < check {
            break;
        }
    }
    streak
}

pub fn build_heatmap(
    logs: &[DailyLog],
    category: HeatmapCategory,
    today: NaiveDate,
) -> HeatmapResponse {
    let entries = build_entries(logs, category);
    HeatmapResponse {
        category,
        current_streak: current_streak(&entries, today),
        longest_streak: longest_streak(&entries),
        entries,
    }
}
