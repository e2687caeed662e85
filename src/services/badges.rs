//! Milestone badges for sustained qualifying days.

use chrono::{DateTime, Utc};

use crate::models::daily_log::{DailyLog, PrayerLog, ProblemStatus};
use crate::models::user_config::{Badge, BadgeCategory, BadgeTier};

pub struct Milestone {
    pub tier: BadgeTier,
    pub days: usize,
}

pub const MILESTONES: [Milestone; 5] = [
    Milestone { tier: BadgeTier::Bronze, days: 20 },
    Milestone { tier: BadgeTier::Silver, days: 50 },
    Milestone { tier: BadgeTier::Gold, days: 100 },
    Milestone { tier: BadgeTier::Platinum, days: 200 },
    Milestone { tier: BadgeTier::Diamond, days: 365 },
];

pub struct CategoryRule {
    pub category: BadgeCategory,
    pub label: &'static str,
    pub icon: &'static str,
    pub qualifies: fn(&DailyLog) -> bool,
}

/// Overall consistency score that counts as a qualifying day.
pub const OVERALL_SCORE_THRESHOLD: u32 = 80;

fn all_prayers_kept(log: &DailyLog) -> bool {
    log.prayers.count >= PrayerLog::TOTAL
}

fn workout_done(log: &DailyLog) -> bool {
    log.workout.is_completed
}

fn coded(log: &DailyLog) -> bool {
    log.codeforces.solved_count >= 1 || log.leetcode.status == ProblemStatus::Solved
}

fn studied(log: &DailyLog) -> bool {
    log.academic.hours_done >= log.academic.hours_target
}

fn practiced_kaggle(log: &DailyLog) -> bool {
    log.kaggle.minutes_done >= log.kaggle.target_minutes
}

fn consistent(log: &DailyLog) -> bool {
    log.consistency_score >= OVERALL_SCORE_THRESHOLD
}

pub const CATEGORY_RULES: [CategoryRule; 6] = [
    CategoryRule {
        category: BadgeCategory::Prayer,
        label: "Faith Keeper",
        icon: "Moon",
        qualifies: all_prayers_kept,
    },
    CategoryRule {
        category: BadgeCategory::Workout,
        label: "Iron Will",
        icon: "Dumbbell",
        qualifies: workout_done,
    },
    CategoryRule {
        category: BadgeCategory::Coding,
        label: "Code Master",
        icon: "Terminal",
        qualifies: coded,
    },
    CategoryRule {
        category: BadgeCategory::Academic,
        label: "Scholar",
        icon: "BookOpen",
        qualifies: studied,
    },
    CategoryRule {
        category: BadgeCategory::Kaggle,
        label: "Data Wizard",
        icon: "Brain",
        qualifies: practiced_kaggle,
    },
    CategoryRule {
        category: BadgeCategory::Overall,
        label: "Consistency King",
        icon: "Crown",
        qualifies: consistent,
    },
];

/// Qualifying-day count per category, over submitted logs only.
pub fn qualifying_days(logs: &[DailyLog]) -> Vec<(BadgeCategory, usize)> {
    CATEGORY_RULES
        .iter()
        .map(|rule| {
            let days = logs
                .iter()
                .filter(|log| log.is_submitted && (rule.qualifies)(log))
                .count();
            (rule.category, days)
        })
        .collect()
}

/// Returns the badges newly earned; `existing` is never modified here.
pub fn award_badges(logs: &[DailyLog], existing: &[Badge], now: DateTime<Utc>) -> Vec<Badge> {
    let counts = qualifying_days(logs);
    let mut awarded = Vec::new();

    for (rule, (_, days)) in CATEGORY_RULES.iter().zip(counts) {
        for milestone in MILESTONES.iter().filter(|m| days >= m.days) {
            let already = existing
                .iter()
                .any(|b| b.category == rule.category && b.tier == milestone.tier);
            if already {
                continue;
            }
            awarded.push(Badge {
                id: Badge::badge_id(rule.category, milestone.tier),
                name: rule.label.to_string(),
                description: format!(
                    "Consistent in {} for {} days",
                    rule.category.as_str(),
                    milestone.days
                ),
                icon: rule.icon.to_string(),
                category: rule.category,
                tier: milestone.tier,
                date_earned: now,
            });
        }
    }

    awarded
}
