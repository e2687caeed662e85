use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user_config::{Exercise, TodoItem};

pub const DEFAULT_ACADEMIC_HOURS: f64 = 3.0;
pub const DEFAULT_KAGGLE_MINUTES: f64 = 60.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemStatus {
    #[default]
    Pending,
    Solved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedProblem {
    pub problem_id: String,
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub status: ProblemStatus,
}

impl TrackedProblem {
    pub fn is_solved(&self) -> bool {
        self.status == ProblemStatus::Solved
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CodeforcesLog {
    pub target_problems: Vec<TrackedProblem>,
    pub solved_count: u32,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LeetcodeLog {
    pub link: Option<String>,
    pub status: ProblemStatus,
}

/// `problems` holds revisions done on this day, not the live queue.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RevisionLog {
    pub problems: Vec<TrackedProblem>,
    pub total_due: u32,
    pub is_complete: bool,
}

impl RevisionLog {
    pub fn solved_count(&self) -> u32 {
        self.problems.iter().filter(|p| p.is_solved()).count() as u32
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PrayerLog {
    pub fajr: bool,
    pub dhuhr: bool,
    pub asr: bool,
    pub maghrib: bool,
    pub isha: bool,
    pub count: u32,
}

impl PrayerLog {
    pub const TOTAL: u32 = 5;

    fn flag_mut(&mut self, prayer: Prayer) -> &mut bool {
        match prayer {
            Prayer::Fajr => &mut self.fajr,
            Prayer::Dhuhr => &mut self.dhuhr,
            Prayer::Asr => &mut self.asr,
            Prayer::Maghrib => &mut self.maghrib,
            Prayer::Isha => &mut self.isha,
        }
    }

    pub fn toggle(&mut self, prayer: Prayer) {
        let flag = self.flag_mut(prayer);
        *flag = !*flag;
        self.recount();
    }

    pub fn set(&mut self, prayer: Prayer, done: bool) {
        *self.flag_mut(prayer) = done;
        self.recount();
    }

    pub fn recount(&mut self) {
        self.count = [self.fajr, self.dhuhr, self.asr, self.maghrib, self.isha]
            .iter()
            .filter(|done| **done)
            .count() as u32;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcademicLog {
    pub todo_list: Vec<TodoItem>,
    pub hours_target: f64,
    pub hours_done: f64,
}

impl Default for AcademicLog {
    fn default() -> Self {
        Self {
            todo_list: Vec::new(),
            hours_target: DEFAULT_ACADEMIC_HOURS,
            hours_done: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KaggleLog {
    pub todo_list: Vec<TodoItem>,
    pub target_minutes: f64,
    pub minutes_done: f64,
}

impl Default for KaggleLog {
    fn default() -> Self {
        Self {
            todo_list: Vec::new(),
            target_minutes: DEFAULT_KAGGLE_MINUTES,
            minutes_done: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WorkoutLog {
    pub level: u32,
    pub targets: BTreeMap<Exercise, u32>,
    pub checklist: BTreeMap<Exercise, bool>,
    pub is_completed: bool,
}

impl WorkoutLog {
    pub fn checked_count(&self) -> usize {
        self.checklist.values().filter(|done| **done).count()
    }
}

/// One record per calendar day, keyed by `date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub is_rest_day: bool,
    pub codeforces: CodeforcesLog,
    pub leetcode: LeetcodeLog,
    pub revision: RevisionLog,
    pub prayers: PrayerLog,
    pub academic: AcademicLog,
    pub kaggle: KaggleLog,
    pub workout: WorkoutLog,
    pub comment: String,
    pub is_submitted: bool,
    pub consistency_score: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyLog {
    pub fn new(date: NaiveDate, is_rest_day: bool, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            is_rest_day,
            codeforces: CodeforcesLog::default(),
            leetcode: LeetcodeLog::default(),
            revision: RevisionLog::default(),
            prayers: PrayerLog::default(),
            academic: AcademicLog::default(),
            kaggle: KaggleLog::default(),
            workout: WorkoutLog::default(),
            comment: String::new(),
            is_submitted: false,
            consistency_score: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy with the score hidden until the day has been submitted.
    pub fn masked(&self) -> Self {
        let mut log = self.clone();
        if !log.is_submitted {
            log.consistency_score = 0;
        }
        log
    }
}

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TogglePrayerRequest {
    pub prayer: Prayer,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudyPatch {
    pub todo_list: Option<Vec<TodoItem>>,
    pub target: Option<f64>,
    pub done: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkoutPatch {
    pub checklist: Option<BTreeMap<Exercise, bool>>,
    pub is_completed: Option<bool>,
}

/// Partial update of the editable parts of today's log.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDailyLogRequest {
    pub prayers: Option<BTreeMap<Prayer, bool>>,
    pub leetcode_status: Option<ProblemStatus>,
    pub academic: Option<StudyPatch>,
    pub kaggle: Option<StudyPatch>,
    pub workout: Option<WorkoutPatch>,
    #[validate(length(max = 2000, message = "Comment must be under 2000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SubmitDayRequest {
    #[validate(length(max = 2000, message = "Comment must be under 2000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyLogQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
