//! Dashboard and revision operations over the store.
//!
//! Every mutation of today's log runs under one write lock as a
//! load, change, recompute, save sequence, so concurrent requests cannot
//! lose each other's updates.

use std::sync::Arc;

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::db::Store;
use crate::error::{AppError, AppResult};
use crate::models::daily_log::{
    DailyLog, Prayer, ProblemStatus, StudyPatch, SubmitDayRequest, TrackedProblem,
    UpdateDailyLogRequest,
};
use crate::models::revision::{RevisionItem, RevisionQueueResponse};
use crate::models::user_config::{
    Badge, TodoItem, TomorrowTaskRequest, TomorrowTasksResponse, UserConfig,
};
use crate::services::badges::award_badges;
use crate::services::calendar::{end_of_day, local_date, local_hour, start_of_day};
use crate::services::contests::{contest_summary, ContestSummary};
use crate::services::heatmap::{build_heatmap, HeatmapQuery, HeatmapResponse};
use crate::services::judge::{apply_submissions, CodingJudge, Submission};
use crate::services::revision_queue::validate_problem_link;
use crate::services::rollover::{
    fetch_daily_targets, generate_daily_log, load_or_init_config, DailyTargets, RolloverOutcome,
};
use crate::services::scoring::{self, ScoreBreakdown};

/// Default heatmap window when no start date is given.
pub const HEATMAP_DEFAULT_DAYS: i64 = 182;

fn ensure_open(log: &DailyLog) -> AppResult<()> {
    if log.is_submitted {
        return Err(AppError::AlreadySubmitted);
    }
    Ok(())
}

fn apply_study_patch(
    todo_list: &mut Vec<TodoItem>,
    target: &mut f64,
    done: &mut f64,
    patch: StudyPatch,
) -> AppResult<()> {
    if let Some(t) = patch.target {
        if !t.is_finite() || t < 0.0 {
            return Err(AppError::Validation("Target must be a non-negative number".into()));
        }
        *target = t;
    }
    if let Some(d) = patch.done {
        if !d.is_finite() || d < 0.0 {
            return Err(AppError::Validation("Progress must be a non-negative number".into()));
        }
        *done = d;
    }
    if let Some(list) = patch.todo_list {
        *todo_list = list;
    }
    Ok(())
}

#[derive(Clone)]
pub struct Tracker {
    store: Arc<dyn Store>,
    judge: Arc<dyn CodingJudge>,
    config: Arc<Config>,
    write_lock: Arc<Mutex<()>>,
}

impl Tracker {
    pub fn new(store: Arc<dyn Store>, judge: Arc<dyn CodingJudge>, config: Arc<Config>) -> Self {
        Self {
            store,
            judge,
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn local_today(&self, now: DateTime<Utc>) -> NaiveDate {
        local_date(now, self.config.utc_offset)
    }

    async fn rollover_unlocked(&self, now: DateTime<Utc>) -> AppResult<RolloverOutcome> {
        generate_daily_log(
            self.store.as_ref(),
            self.judge.as_ref(),
            &self.config.codeforces_handle,
            &self.config.rest_days,
            self.local_today(now),
            now,
        )
        .await
    }

    /// Today's log, created first if rollover has not run yet.
    async fn load_today(&self, now: DateTime<Utc>) -> AppResult<DailyLog> {
        let today = self.local_today(now);
        if let Some(log) = self.store.get_daily_log(today).await? {
            return Ok(log);
        }
        self.rollover_unlocked(now).await?;
        self.store
            .get_daily_log(today)
            .await?
            .ok_or_else(|| AppError::NotFound("Log not found".into()))
    }

    async fn load_config(&self, now: DateTime<Utc>) -> AppResult<UserConfig> {
        load_or_init_config(
            self.store.as_ref(),
            &self.config.codeforces_handle,
            self.local_today(now),
        )
        .await
    }

    /// The single place derived counters and the score are refreshed.
    async fn recompute_and_persist(
        &self,
        log: &mut DailyLog,
        now: DateTime<Utc>,
    ) -> AppResult<ScoreBreakdown> {
        let remaining = self
            .store
            .count_revision_due_by(end_of_day(log.date, self.config.utc_offset))
            .await?;
        let breakdown = scoring::recompute(log, remaining);
        log.updated_at = now;
        self.store.save_daily_log(log).await?;
        Ok(breakdown)
    }

    /// Today's log and the user config, read under the write lock. The
    /// judge is called after the lock is released.
    async fn snapshot(&self, now: DateTime<Utc>) -> AppResult<(DailyLog, UserConfig)> {
        let _guard = self.write_lock.lock().await;
        let log = self.load_today(now).await?;
        let config = self.load_config(now).await?;
        Ok((log, config))
    }

    /// Recent submissions for `handle`. Fails soft.
    async fn recent_submissions(&self, handle: &str) -> Vec<Submission> {
        match self.judge.fetch_recent_submissions(handle).await {
            Ok(submissions) => submissions,
            Err(e) => {
                tracing::warn!(error = %e, "Submission sync skipped");
                Vec::new()
            }
        }
    }

    fn mark_solved(&self, log: &mut DailyLog, submissions: &[Submission]) -> bool {
        let since = start_of_day(log.date, self.config.utc_offset);
        apply_submissions(log, submissions, since)
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub async fn rollover(&self, now: DateTime<Utc>) -> AppResult<RolloverOutcome> {
        let _guard = self.write_lock.lock().await;
        self.rollover_unlocked(now).await
    }

    /// Today's log with late-bound data filled in: the LeetCode daily link
    /// once it unlocks, targets if the rollover fetch failed, and solves.
    pub async fn today(&self, now: DateTime<Utc>) -> AppResult<DailyLog> {
        let (log, config) = self.snapshot(now).await?;
        if log.is_submitted {
            return Ok(log);
        }

        let unlocked = local_hour(now, self.config.utc_offset) >= self.config.leetcode_unlock_hour;
        let leetcode_link = if log.leetcode.link.is_none() && unlocked {
            match self.judge.fetch_daily_leetcode_link().await {
                Ok(link) => Some(link),
                Err(e) => {
                    tracing::warn!(error = %e, "LeetCode daily link unavailable");
                    None
                }
            }
        } else {
            None
        };
        let targets = if log.codeforces.target_problems.is_empty() {
            fetch_daily_targets(
                self.judge.as_ref(),
                &config.codeforces_handle,
                config.codeforces.current_rating,
            )
            .await
        } else {
            DailyTargets::default()
        };
        let submissions = self.recent_submissions(&config.codeforces_handle).await;

        let _guard = self.write_lock.lock().await;
        let mut log = self.load_today(now).await?;
        if log.is_submitted {
            return Ok(log);
        }
        if log.leetcode.link.is_none() {
            log.leetcode.link = leetcode_link;
        }
        if log.codeforces.target_problems.is_empty() && !targets.problems.is_empty() {
            let mut config = self.load_config(now).await?;
            targets.record_progress(&mut config);
            self.store.save_user_config(&config).await?;
            log.codeforces.target_problems = targets.problems;
        }
        self.mark_solved(&mut log, &submissions);
        self.recompute_and_persist(&mut log, now).await?;
        Ok(log)
    }

    pub async fn toggle_prayer(&self, prayer: Prayer, now: DateTime<Utc>) -> AppResult<DailyLog> {
        let _guard = self.write_lock.lock().await;
        let mut log = self.load_today(now).await?;
        ensure_open(&log)?;

        log.prayers.toggle(prayer);
        self.recompute_and_persist(&mut log, now).await?;
        Ok(log)
    }

    pub async fn update(
        &self,
        req: UpdateDailyLogRequest,
        now: DateTime<Utc>,
    ) -> AppResult<DailyLog> {
        req.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut log = self.load_today(now).await?;
        ensure_open(&log)?;

        if let Some(prayers) = req.prayers {
            for (prayer, done) in prayers {
                log.prayers.set(prayer, done);
            }
        }
        if let Some(status) = req.leetcode_status {
            log.leetcode.status = status;
        }
        if let Some(patch) = req.academic {
            let a = &mut log.academic;
            apply_study_patch(&mut a.todo_list, &mut a.hours_target, &mut a.hours_done, patch)?;
        }
        if let Some(patch) = req.kaggle {
            let k = &mut log.kaggle;
            apply_study_patch(
                &mut k.todo_list,
                &mut k.target_minutes,
                &mut k.minutes_done,
                patch,
            )?;
        }
        if let Some(workout) = req.workout {
            if let Some(checklist) = workout.checklist {
                log.workout.checklist.extend(checklist);
            }
            if let Some(done) = workout.is_completed {
                log.workout.is_completed = done;
            }
        }
        if let Some(comment) = req.comment {
            log.comment = comment;
        }

        self.recompute_and_persist(&mut log, now).await?;
        Ok(log)
    }

    pub async fn refresh_status(&self, now: DateTime<Utc>) -> AppResult<DailyLog> {
        let (log, config) = self.snapshot(now).await?;
        ensure_open(&log)?;
        let submissions = self.recent_submissions(&config.codeforces_handle).await;

        let _guard = self.write_lock.lock().await;
        let mut log = self.load_today(now).await?;
        ensure_open(&log)?;
        if self.mark_solved(&mut log, &submissions) {
            tracing::info!(date = %log.date, "Submission sync marked problems solved");
        }
        self.recompute_and_persist(&mut log, now).await?;
        Ok(log)
    }

    pub async fn add_tomorrow_task(
        &self,
        req: TomorrowTaskRequest,
        now: DateTime<Utc>,
    ) -> AppResult<TomorrowTasksResponse> {
        req.validate()?;
        let task = req.task.trim();
        if task.is_empty() {
            return Err(AppError::Validation("Task must not be blank".into()));
        }

        let _guard = self.write_lock.lock().await;
        if let Some(log) = self.store.get_daily_log(self.local_today(now)).await? {
            ensure_open(&log)?;
        }

        let mut config = self.load_config(now).await?;
        config.tomorrow_tasks_mut(req.kind).push(TodoItem::new(task));
        self.store.save_user_config(&config).await?;

        Ok(TomorrowTasksResponse {
            academic: config.academic_tomorrow,
            kaggle: config.kaggle_tomorrow,
        })
    }

    pub async fn tomorrow_tasks(&self) -> AppResult<TomorrowTasksResponse> {
        let config = self.store.load_user_config().await?;
        Ok(config
            .map(|c| TomorrowTasksResponse {
                academic: c.academic_tomorrow,
                kaggle: c.kaggle_tomorrow,
            })
            .unwrap_or(TomorrowTasksResponse {
                academic: Vec::new(),
                kaggle: Vec::new(),
            }))
    }

    /// Finalizes today's log, fixing its score, then runs the badge engine.
    pub async fn submit_day(
        &self,
        req: SubmitDayRequest,
        now: DateTime<Utc>,
    ) -> AppResult<(DailyLog, Vec<Badge>)> {
        req.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut log = self.load_today(now).await?;
        ensure_open(&log)?;

        if let Some(comment) = req.comment {
            log.comment = comment;
        }
        log.is_submitted = true;
        let breakdown = self.recompute_and_persist(&mut log, now).await?;

        let logs = self.store.list_submitted_daily_logs().await?;
        let mut config = self.load_config(now).await?;
        let new_badges = award_badges(&logs, &config.badges, now);
        if !new_badges.is_empty() {
            config.badges.extend(new_badges.iter().cloned());
            self.store.save_user_config(&config).await?;
        }

        tracing::info!(
            date = %log.date,
            score = log.consistency_score,
            weighted = breakdown.weighted_sum,
            new_badges = new_badges.len(),
            "Day submitted"
        );
        Ok((log, new_badges))
    }

    pub async fn badges(&self) -> AppResult<Vec<Badge>> {
        Ok(self
            .store
            .load_user_config()
            .await?
            .map(|c| c.badges)
            .unwrap_or_default())
    }

    /// Logs in range, ascending, with unsubmitted scores hidden.
    pub async fn history(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<DailyLog>> {
        let start = start.unwrap_or_default();
        let end = end.unwrap_or_else(|| self.local_today(now));
        let logs = self.store.list_daily_logs(start, end).await?;
        Ok(logs.iter().map(DailyLog::masked).collect())
    }

    pub async fn heatmap(&self, query: HeatmapQuery, now: DateTime<Utc>) -> AppResult<HeatmapResponse> {
        let today = self.local_today(now);
        let end = query.end_date.unwrap_or(today);
        let start = query
            .start_date
            .unwrap_or(end - Duration::days(HEATMAP_DEFAULT_DAYS));
        if start > end {
            return Err(AppError::Validation(
                "start_date must not be after end_date".into(),
            ));
        }
        let logs = self.store.list_daily_logs(start, end).await?;
        Ok(build_heatmap(&logs, query.category, today))
    }

    pub async fn day_details(&self, date: NaiveDate) -> AppResult<DailyLog> {
        self.store
            .get_daily_log(date)
            .await?
            .map(|log| log.masked())
            .ok_or_else(|| AppError::NotFound("Log not found".into()))
    }

    /// Contest calendar and participation streaks for the stored handle.
    /// Judge failures yield an empty summary.
    pub async fn contests(&self, now: DateTime<Utc>) -> AppResult<ContestSummary> {
        let handle = self
            .store
            .load_user_config()
            .await?
            .map(|c| c.codeforces_handle)
            .unwrap_or_else(|| self.config.codeforces_handle.clone());

        let fetched = async {
            let contests = self.judge.fetch_contests().await?;
            let attended = self.judge.fetch_rating_history(&handle).await?;
            anyhow::Ok((contests, attended))
        };
        match fetched.await {
            Ok((contests, attended)) => {
                let attended: HashSet<u32> = attended.into_iter().collect();
                Ok(contest_summary(contests, &attended, now))
            }
            Err(e) => {
                tracing::warn!(error = %e, handle = %handle, "Contest data unavailable");
                Ok(ContestSummary::default())
            }
        }
    }

    // =========================================================================
    // Revision queue
    // =========================================================================

    pub async fn enqueue(&self, link: &str, now: DateTime<Utc>) -> AppResult<RevisionItem> {
        let link = validate_problem_link(link)?;
        let item = self
            .store
            .insert_revision_item(RevisionItem::new(link, now))
            .await?;
        tracing::info!(id = %item.id, due_at = %item.due_at, "Revision queued");
        Ok(item)
    }

    pub async fn list_queue(&self) -> AppResult<RevisionQueueResponse> {
        let data = self.store.list_revision_items().await?;
        Ok(RevisionQueueResponse {
            count: data.len(),
            data,
        })
    }

    pub async fn peek(&self) -> AppResult<RevisionItem> {
        self.store
            .peek_revision_item()
            .await?
            .ok_or(AppError::EmptyQueue)
    }

    /// Pops the earliest item and records it as a solved revision in
    /// today's log.
    pub async fn pop(&self, now: DateTime<Utc>) -> AppResult<(RevisionItem, DailyLog)> {
        let _guard = self.write_lock.lock().await;
        let mut log = self.load_today(now).await?;
        ensure_open(&log)?;

        let item = self
            .store
            .pop_revision_item()
            .await?
            .ok_or(AppError::EmptyQueue)?;

        log.revision.problems.push(TrackedProblem {
            problem_id: item.id.to_string(),
            name: item.problem_link.clone(),
            link: item.problem_link.clone(),
            status: ProblemStatus::Solved,
        });
        self.recompute_and_persist(&mut log, now).await?;

        tracing::info!(id = %item.id, "Revision popped and logged");
        Ok((item, log))
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<RevisionItem> {
        self.store
            .delete_revision_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".into()))
    }
}
