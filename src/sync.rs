//! Persisting recomputed progress.
//!
//! After every load or leaf mutation the tree is recomputed and each node
//! whose value moved gets exactly one update call. Values already in the
//! tree are the "previously known" ones, so syncing an unchanged tree is a
//! no-op. A failed update is logged and dropped; the in-memory value is kept.

use async_trait::async_trait;
use momentum_core::models::{
    ActivityStatus, Goal, ParentKind, Routine, UpdateGoalInput, UpdateSubGoalInput,
};
use momentum_core::progress::{
    self, ProgressChange, ProgressTarget, RoutineProgressChange, RoutineTarget,
};

use crate::api::{ApiClient, ApiResult};

#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn persist_goal_progress(&self, goal_id: u64, progress: u8) -> ApiResult<()>;

    async fn persist_sub_goal_progress(
        &self,
        sub_goal_id: u64,
        parent: ParentKind,
        progress: u8,
    ) -> ApiResult<()>;

    async fn persist_sub_routine_progress(
        &self,
        routine_id: u64,
        sub_routine_id: u64,
        progress: u8,
    ) -> ApiResult<()>;
}

#[async_trait]
impl ProgressSink for ApiClient {
    async fn persist_goal_progress(&self, goal_id: u64, progress: u8) -> ApiResult<()> {
        let input = UpdateGoalInput {
            progress: Some(progress),
            ..Default::default()
        };
        self.update_goal(goal_id, &input).await.map(|_| ())
    }

    async fn persist_sub_goal_progress(
        &self,
        sub_goal_id: u64,
        parent: ParentKind,
        progress: u8,
    ) -> ApiResult<()> {
        let input = UpdateSubGoalInput {
            progress: Some(progress),
            ..Default::default()
        };
        self.update_sub_goal(sub_goal_id, parent, &input)
            .await
            .map(|_| ())
    }

    async fn persist_sub_routine_progress(
        &self,
        routine_id: u64,
        sub_routine_id: u64,
        progress: u8,
    ) -> ApiResult<()> {
        self.update_sub_routine_progress(routine_id, sub_routine_id, progress)
            .await
    }
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub changes: Vec<ProgressChange>,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct RoutineSyncReport {
    pub changes: Vec<RoutineProgressChange>,
    pub failed: usize,
}

pub async fn sync_goal<S>(goal: &mut Goal, sink: &S) -> SyncReport
where
    S: ProgressSink + ?Sized,
{
    let changes = progress::recompute(goal);
    let mut failed = 0;

    for change in &changes {
        let result = match change.target {
            ProgressTarget::Goal(id) => sink.persist_goal_progress(id, change.current).await,
            ProgressTarget::SubGoal { id, parent } => {
                sink.persist_sub_goal_progress(id, parent, change.current)
                    .await
            }
        };
        if let Err(e) = result {
            failed += 1;
            tracing::warn!(node = ?change.target, progress = change.current, error = %e, "failed to persist progress");
        }
    }

    if !changes.is_empty() {
        tracing::debug!(goal = goal.id, changed = changes.len(), failed, "goal progress synced");
    }
    SyncReport { changes, failed }
}

/// Routine progress itself is derived server-side; only sub-routines are
/// written back.
pub async fn sync_routine<S>(routine: &mut Routine, sink: &S) -> RoutineSyncReport
where
    S: ProgressSink + ?Sized,
{
    let changes = progress::recompute_routine(routine);
    let mut failed = 0;

    for change in &changes {
        let RoutineTarget::SubRoutine { routine_id, id } = change.target else {
            continue;
        };
        if let Err(e) = sink
            .persist_sub_routine_progress(routine_id, id, change.current)
            .await
        {
            failed += 1;
            tracing::warn!(routine = routine_id, sub_routine = id, error = %e, "failed to persist sub-routine progress");
        }
    }

    RoutineSyncReport { changes, failed }
}

/// Write a sub-goal's completed flag, then roll the goal up and persist what
/// moved. Returns `None` without sending anything when the goal has no such
/// sub-goal.
pub async fn set_sub_goal_completed(
    client: &ApiClient,
    goal: &mut Goal,
    sub_goal_id: u64,
    completed: bool,
) -> ApiResult<Option<SyncReport>> {
    let Some(parent) = goal.parent_kind_of(sub_goal_id) else {
        return Ok(None);
    };

    let input = UpdateSubGoalInput {
        completed: Some(completed),
        progress: goal
            .find_sub_goal(sub_goal_id)
            .filter(|sg| sg.is_leaf())
            .map(|_| if completed { 100 } else { 0 }),
        ..Default::default()
    };
    client.update_sub_goal(sub_goal_id, parent, &input).await?;

    goal.set_completed(sub_goal_id, completed);
    Ok(Some(sync_goal(goal, client).await))
}

/// Write an activity's status, then persist the sub-routine progress that
/// moved. Returns `None` without sending anything when the routine has no
/// such activity.
pub async fn set_activity_status(
    client: &ApiClient,
    routine: &mut Routine,
    sub_routine_id: u64,
    activity_id: u64,
    status: ActivityStatus,
) -> ApiResult<Option<RoutineSyncReport>> {
    let known = routine
        .sub_routine(sub_routine_id)
        .is_some_and(|sr| sr.activities.iter().any(|a| a.id == activity_id));
    if !known {
        return Ok(None);
    }

    client
        .update_activity_status(routine.id, sub_routine_id, activity_id, status)
        .await?;

    routine.set_activity_status(sub_routine_id, activity_id, status);
    Ok(Some(sync_routine(routine, client).await))
}
