//! Weighted 0-100 consistency score for a single day.
//!
//! The stored score is only meaningful once the day is submitted; until then
//! it stays at 0 while the derived counters are still kept current.

use serde::Serialize;

use crate::models::daily_log::{
    DailyLog, ProblemStatus, PrayerLog, DEFAULT_ACADEMIC_HOURS, DEFAULT_KAGGLE_MINUTES,
};

/// Codeforces problems that earn full coding credit.
pub const DAILY_CODING_TARGET: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCategory {
    Coding,
    Leetcode,
    Revision,
    Prayers,
    Workout,
    Academic,
    Kaggle,
}

/// Weights sum to 100.
pub const WEIGHTS: [(ScoreCategory, f64); 7] = [
    (ScoreCategory::Coding, 30.0),
    (ScoreCategory::Leetcode, 5.0),
    (ScoreCategory::Revision, 15.0),
    (ScoreCategory::Prayers, 10.0),
    (ScoreCategory::Workout, 15.0),
    (ScoreCategory::Academic, 15.0),
    (ScoreCategory::Kaggle, 10.0),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryScore {
    pub category: ScoreCategory,
    pub weight: f64,
    /// Completion ratio in `0.0..=1.0`.
    pub ratio: f64,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    pub categories: Vec<CategoryScore>,
    pub total_due: u32,
    pub weighted_sum: f64,
}

impl ScoreBreakdown {
    pub fn rounded(&self) -> u32 {
        self.weighted_sum.round().clamp(0.0, 100.0) as u32
    }

    pub fn points(&self, category: ScoreCategory) -> f64 {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.points)
            .unwrap_or(0.0)
    }
}

fn ratio(done: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (done / total).clamp(0.0, 1.0)
}

fn study_ratio(done_tasks: usize, total_tasks: usize, progress: f64, target: f64, fallback: f64) -> f64 {
    if total_tasks > 0 {
        return ratio(done_tasks as f64, total_tasks as f64);
    }
    let target = if target > 0.0 { target } else { fallback };
    ratio(progress, target)
}

fn category_ratio(log: &DailyLog, category: ScoreCategory, total_due: u32) -> f64 {
    match category {
        ScoreCategory::Coding => ratio(
            log.codeforces.solved_count as f64,
            DAILY_CODING_TARGET as f64,
        ),
        ScoreCategory::Leetcode => {
            if log.leetcode.status == ProblemStatus::Solved {
                1.0
            } else {
                0.0
            }
        }
        ScoreCategory::Revision => {
            if total_due == 0 {
                1.0
            } else {
                ratio(log.revision.solved_count() as f64, total_due as f64)
            }
        }
        ScoreCategory::Prayers => ratio(log.prayers.count as f64, PrayerLog::TOTAL as f64),
        ScoreCategory::Workout => {
            if log.is_rest_day {
                1.0
            } else if !log.workout.checklist.is_empty() {
                ratio(
                    log.workout.checked_count() as f64,
                    log.workout.checklist.len() as f64,
                )
            } else if log.workout.is_completed {
                1.0
            } else {
                0.0
            }
        }
        ScoreCategory::Academic => {
            let a = &log.academic;
            study_ratio(
                a.todo_list.iter().filter(|t| t.is_done).count(),
                a.todo_list.len(),
                a.hours_done,
                a.hours_target,
                DEFAULT_ACADEMIC_HOURS,
            )
        }
        ScoreCategory::Kaggle => {
            let k = &log.kaggle;
            study_ratio(
                k.todo_list.iter().filter(|t| t.is_done).count(),
                k.todo_list.len(),
                k.minutes_done,
                k.target_minutes,
                DEFAULT_KAGGLE_MINUTES,
            )
        }
    }
}

/// Pure weighted score. `remaining_due` is the live count of queue items due
/// by the end of the day.
pub fn calculate_score(log: &DailyLog, remaining_due: u32) -> ScoreBreakdown {
    let total_due = remaining_due + log.revision.solved_count();
    let categories: Vec<CategoryScore> = WEIGHTS
        .iter()
        .map(|&(category, weight)| {
            let r = category_ratio(log, category, total_due);
            CategoryScore {
                category,
                weight,
                ratio: r,
                points: r * weight,
            }
        })
        .collect();
    let weighted_sum = categories.iter().map(|c| c.points).sum();

    ScoreBreakdown {
        categories,
        total_due,
        weighted_sum,
    }
}

/// Rebuilds every derived counter from source fields.
pub fn normalize(log: &mut DailyLog) {
    log.prayers.recount();

    let solved = log
        .codeforces
        .target_problems
        .iter()
        .filter(|p| p.is_solved())
        .count() as u32;
    log.codeforces.solved_count = solved;
    log.codeforces.is_complete = !log.codeforces.target_problems.is_empty()
        && solved as usize == log.codeforces.target_problems.len();

    if !log.workout.checklist.is_empty() {
        log.workout.is_completed = log.workout.checked_count() == log.workout.checklist.len();
    }
}

/// Normalizes the log and refreshes `revision` bookkeeping and the stored score.
/// Safe to call any number of times on the same inputs.
pub fn recompute(log: &mut DailyLog, remaining_due: u32) -> ScoreBreakdown {
    normalize(log);
    let breakdown = calculate_score(log, remaining_due);

    log.revision.total_due = breakdown.total_due;
    log.revision.is_complete = remaining_due == 0;
    log.consistency_score = if log.is_submitted {
        breakdown.rounded()
    } else {
        0
    };
    breakdown
}
