use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_RATING: u32 = 1700;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    Pushups,
    Situps,
    Squats,
    Biceps,
    Deadlift,
    Running,
}

impl Exercise {
    pub const ALL: [Exercise; 6] = [
        Exercise::Pushups,
        Exercise::Situps,
        Exercise::Squats,
        Exercise::Biceps,
        Exercise::Deadlift,
        Exercise::Running,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoItem {
    pub task: String,
    #[serde(default)]
    pub is_done: bool,
}

impl TodoItem {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            is_done: false,
        }
    }
}

/// Per-exercise progression: `min(base + level * increment, max)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExerciseProgression {
    pub base: u32,
    pub increment: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutProgram {
    pub start_date: NaiveDate,
    pub cycle_days: u32,
    pub exercises: BTreeMap<Exercise, ExerciseProgression>,
}

impl WorkoutProgram {
    pub fn starting(start_date: NaiveDate) -> Self {
        let exercises = [
            (Exercise::Pushups, 20, 5, 100),
            (Exercise::Situps, 20, 5, 100),
            (Exercise::Squats, 20, 5, 100),
            (Exercise::Running, 40, 5, 60),
            (Exercise::Deadlift, 0, 5, 50),
            (Exercise::Biceps, 0, 2, 100),
        ]
        .into_iter()
        .map(|(exercise, base, increment, max)| {
            (
                exercise,
                ExerciseProgression {
                    base,
                    increment,
                    max,
                },
            )
        })
        .collect();

        Self {
            start_date,
            cycle_days: 21,
            exercises,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeforcesProgress {
    pub current_rating: u32,
    pub solved_count: u32,
}

impl Default for CodeforcesProgress {
    fn default() -> Self {
        Self {
            current_rating: DEFAULT_RATING,
            solved_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Prayer,
    Workout,
    Coding,
    Academic,
    Kaggle,
    Overall,
}

impl BadgeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeCategory::Prayer => "prayer",
            BadgeCategory::Workout => "workout",
            BadgeCategory::Coding => "coding",
            BadgeCategory::Academic => "academic",
            BadgeCategory::Kaggle => "kaggle",
            BadgeCategory::Overall => "overall",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl BadgeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTier::Bronze => "bronze",
            BadgeTier::Silver => "silver",
            BadgeTier::Gold => "gold",
            BadgeTier::Platinum => "platinum",
            BadgeTier::Diamond => "diamond",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: BadgeCategory,
    pub tier: BadgeTier,
    pub date_earned: DateTime<Utc>,
}

impl Badge {
    pub fn badge_id(category: BadgeCategory, tier: BadgeTier) -> String {
        format!("{}-{}", category.as_str(), tier.as_str())
    }
}

/// Persisted singleton holding progression state, queued tasks and badges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserConfig {
    pub codeforces_handle: String,
    pub codeforces: CodeforcesProgress,
    pub academic_tomorrow: Vec<TodoItem>,
    pub kaggle_tomorrow: Vec<TodoItem>,
    pub badges: Vec<Badge>,
    pub workout: WorkoutProgram,
}

impl UserConfig {
    pub fn new(codeforces_handle: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            codeforces_handle: codeforces_handle.into(),
            codeforces: CodeforcesProgress::default(),
            academic_tomorrow: Vec::new(),
            kaggle_tomorrow: Vec::new(),
            badges: Vec::new(),
            workout: WorkoutProgram::starting(today),
        }
    }

    pub fn tomorrow_tasks_mut(&mut self, kind: TaskKind) -> &mut Vec<TodoItem> {
        match kind {
            TaskKind::Academic => &mut self.academic_tomorrow,
            TaskKind::Kaggle => &mut self.kaggle_tomorrow,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Academic,
    Kaggle,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TomorrowTaskRequest {
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[validate(length(min = 1, max = 500, message = "Task must be 1-500 characters"))]
    pub task: String,
}

#[derive(Debug, Serialize)]
pub struct TomorrowTasksResponse {
    pub academic: Vec<TodoItem>,
    pub kaggle: Vec<TodoItem>,
}
