//! Daily rollover: creates today's log once, seeded from config, the judge
//! and the log from a week ago.

use std::collections::BTreeMap;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::db::Store;
use crate::error::AppResult;
use crate::models::daily_log::{DailyLog, ProblemStatus, TrackedProblem};
use crate::models::user_config::{Exercise, TodoItem, UserConfig, WorkoutProgram};
use crate::services::judge::{progress_rating, solved_set, CodingJudge};
use crate::services::tracker::Tracker;

/// Days back the revision set is copied from.
pub const REVISION_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverOutcome {
    Created,
    AlreadyExists,
}

pub fn is_rest_day(date: NaiveDate, rest_days: &[Weekday]) -> bool {
    rest_days.contains(&date.weekday())
}

/// Level is whole cycles since the program start; targets are capped per exercise.
pub fn workout_targets(program: &WorkoutProgram, today: NaiveDate) -> (u32, BTreeMap<Exercise, u32>) {
    let days = (today - program.start_date).num_days().max(0) as u32;
    let level = days / program.cycle_days.max(1);
    let targets = program
        .exercises
        .iter()
        .map(|(exercise, p)| {
            let target = p.base.saturating_add(level.saturating_mul(p.increment)).min(p.max);
            (*exercise, target)
        })
        .collect();
    (level, targets)
}

/// Loads the singleton config, creating a default one on first use.
pub async fn load_or_init_config(
    store: &dyn Store,
    handle: &str,
    today: NaiveDate,
) -> AppResult<UserConfig> {
    match store.load_user_config().await? {
        Some(config) => Ok(config),
        None => {
            let config = UserConfig::new(handle, today);
            store.save_user_config(&config).await?;
            tracing::info!(handle = handle, "Initialized user config");
            Ok(config)
        }
    }
}

/// Outcome of one trip to the judge for the day's coding targets.
#[derive(Debug, Default)]
pub struct DailyTargets {
    pub problems: Vec<TrackedProblem>,
    /// Level and solves at that level, when the history was reachable.
    pub progress: Option<(u32, u32)>,
}

impl DailyTargets {
    pub fn record_progress(&self, config: &mut UserConfig) {
        if let Some((rating, solved)) = self.progress {
            config.codeforces.current_rating = rating;
            config.codeforces.solved_count = solved;
        }
    }
}

/// Rating progression then a fresh candidate set, from a single download
/// of the handle's history. Fails soft: no history means no targets.
pub async fn fetch_daily_targets(
    judge: &dyn CodingJudge,
    handle: &str,
    current_rating: u32,
) -> DailyTargets {
    let history = match judge.fetch_all_submissions(handle).await {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "Submission history unavailable; starting the day without targets");
            return DailyTargets::default();
        }
    };

    let (rating, solved_count) = progress_rating(&history, current_rating);
    if rating != current_rating {
        tracing::info!(from = current_rating, to = rating, "Codeforces level raised");
    }

    let problems = match judge
        .fetch_candidate_problems(rating, &solved_set(&history))
        .await
    {
        Ok(problems) => problems.into_iter().map(TrackedProblem::from).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Candidate fetch failed; starting the day without targets");
            Vec::new()
        }
    };

    DailyTargets {
        problems,
        progress: Some((rating, solved_count)),
    }
}

/// Creates today's log if it is missing. Callers serialize writes.
pub async fn generate_daily_log(
    store: &dyn Store,
    judge: &dyn CodingJudge,
    handle: &str,
    rest_days: &[Weekday],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> AppResult<RolloverOutcome> {
    if store.get_daily_log(today).await?.is_some() {
        return Ok(RolloverOutcome::AlreadyExists);
    }

    let mut config = load_or_init_config(store, handle, today).await?;
    let rest = is_rest_day(today, rest_days);
    let mut log = DailyLog::new(today, rest, now);

    let (level, targets) = workout_targets(&config.workout, today);
    log.workout.level = level;
    if !rest {
        log.workout.checklist = targets.keys().map(|e| (*e, false)).collect();
        log.workout.targets = targets;
    }

    let targets = fetch_daily_targets(
        judge,
        &config.codeforces_handle,
        config.codeforces.current_rating,
    )
    .await;
    targets.record_progress(&mut config);
    log.codeforces.target_problems = targets.problems;

    let week_ago = today - Duration::days(REVISION_LOOKBACK_DAYS);
    if let Some(old) = store.get_daily_log(week_ago).await? {
        log.revision.problems = old
            .codeforces
            .target_problems
            .into_iter()
            .map(|p| TrackedProblem {
                status: ProblemStatus::Pending,
                ..p
            })
            .collect();
    }

    log.academic.todo_list = std::mem::take(&mut config.academic_tomorrow)
        .into_iter()
        .map(|t| TodoItem::new(t.task))
        .collect();
    log.kaggle.todo_list = std::mem::take(&mut config.kaggle_tomorrow)
        .into_iter()
        .map(|t| TodoItem::new(t.task))
        .collect();

    if !store.insert_daily_log(&log).await? {
        return Ok(RolloverOutcome::AlreadyExists);
    }
    store.save_user_config(&config).await?;

    tracing::info!(
        date = %today,
        rest_day = rest,
        workout_level = level,
        targets = log.codeforces.target_problems.len(),
        revisions = log.revision.problems.len(),
        "Daily log generated"
    );
    Ok(RolloverOutcome::Created)
}

// ── Rollover Worker ──────────────────────────────────────────────────────────

pub fn spawn_rollover_worker(tracker: Tracker, every: StdDuration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match tracker.rollover(Utc::now()).await {
                Ok(RolloverOutcome::Created) => {
                    tracing::info!("Rollover worker: created today's log");
                }
                Ok(RolloverOutcome::AlreadyExists) => {
                    tracing::debug!("Rollover worker: today's log already exists");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Rollover worker error");
                }
            }
        }
    });
}
