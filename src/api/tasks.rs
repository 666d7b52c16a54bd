use momentum_core::models::{ActivityStatus, Task, TaskSource, UpdateSubGoalInput};

use super::{ApiClient, ApiResult};

impl ApiClient {
    /// Route a task's completion back to the endpoint that owns it.
    pub async fn complete_task(&self, task: &Task) -> ApiResult<()> {
        match task.source {
            TaskSource::Goal {
                sub_goal_id,
                parent,
                ..
            } => {
                let input = UpdateSubGoalInput {
                    completed: Some(true),
                    progress: Some(100),
                    ..Default::default()
                };
                self.update_sub_goal(sub_goal_id, parent, &input).await?;
            }
            TaskSource::Routine {
                routine_id,
                sub_routine_id,
                activity_id,
            } => {
                self.update_activity_status(
                    routine_id,
                    sub_routine_id,
                    activity_id,
                    ActivityStatus::Completed,
                )
                .await?;
            }
        }
        tracing::info!(task = task.id, title = %task.title, "task completed");
        Ok(())
    }
}
