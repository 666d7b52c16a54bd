use momentum_core::models::{
    CreateGoalInput, CreateSubGoalInput, Goal, ParentKind, SubGoal, UpdateGoalInput,
    UpdateSubGoalInput,
};
use momentum_core::transform::{transform_goal, transform_sub_goal, WireGoal, WireSubGoal};
use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiResult};

/// Sub-goal bodies always carry `parent_type`, `null` included.
#[derive(Serialize)]
struct WithParentType<'a, T> {
    #[serde(flatten)]
    input: &'a T,
    parent_type: Option<&'static str>,
}

impl ApiClient {
    pub async fn list_goals(&self) -> ApiResult<Vec<Goal>> {
        let wire: Vec<WireGoal> = self.send(self.request(Method::GET, "/goals")?).await?;
        Ok(wire.iter().map(transform_goal).collect())
    }

    pub async fn get_goal(&self, id: u64) -> ApiResult<Goal> {
        let path = format!("/goals/{}", id);
        let wire: WireGoal = self.send(self.request(Method::GET, &path)?).await?;
        Ok(transform_goal(&wire))
    }

    pub async fn create_goal(&self, input: &CreateGoalInput) -> ApiResult<Goal> {
        let builder = self.request(Method::POST, "/goals")?.json(input);
        let wire: WireGoal = self.send(builder).await?;
        Ok(transform_goal(&wire))
    }

    pub async fn update_goal(&self, id: u64, input: &UpdateGoalInput) -> ApiResult<Goal> {
        let path = format!("/goals/{}", id);
        let builder = self.request(Method::PUT, &path)?.json(input);
        let wire: WireGoal = self.send(builder).await?;
        Ok(transform_goal(&wire))
    }

    pub async fn delete_goal(&self, id: u64) -> ApiResult<()> {
        let path = format!("/goals/{}", id);
        self.send_empty(self.request(Method::DELETE, &path)?).await
    }

    pub async fn get_sub_goal(&self, id: u64) -> ApiResult<SubGoal> {
        let path = format!("/goals/subgoals/{}", id);
        let wire: WireSubGoal = self.send(self.request(Method::GET, &path)?).await?;
        Ok(transform_sub_goal(&wire))
    }

    /// Attach a sub-goal directly under a goal.
    pub async fn create_sub_goal(
        &self,
        goal_id: u64,
        input: &CreateSubGoalInput,
    ) -> ApiResult<SubGoal> {
        let path = format!("/goals/{}/subgoals", goal_id);
        let body = WithParentType {
            input,
            parent_type: ParentKind::Goal.parent_type(),
        };
        let builder = self.request(Method::POST, &path)?.json(&body);
        let wire: WireSubGoal = self.send(builder).await?;
        Ok(transform_sub_goal(&wire))
    }

    /// Attach a sub-goal under another sub-goal.
    pub async fn create_nested_sub_goal(
        &self,
        parent_id: u64,
        input: &CreateSubGoalInput,
    ) -> ApiResult<SubGoal> {
        let path = format!("/goals/subgoals/{}/nested", parent_id);
        let body = WithParentType {
            input,
            parent_type: ParentKind::SubGoal.parent_type(),
        };
        let builder = self.request(Method::POST, &path)?.json(&body);
        let wire: WireSubGoal = self.send(builder).await?;
        Ok(transform_sub_goal(&wire))
    }

    pub async fn update_sub_goal(
        &self,
        id: u64,
        parent: ParentKind,
        input: &UpdateSubGoalInput,
    ) -> ApiResult<SubGoal> {
        let path = format!("/goals/subgoals/{}", id);
        let body = WithParentType {
            input,
            parent_type: parent.parent_type(),
        };
        let builder = self.request(Method::PUT, &path)?.json(&body);
        let wire: WireSubGoal = self.send(builder).await?;
        Ok(transform_sub_goal(&wire))
    }

    pub async fn delete_sub_goal(&self, id: u64) -> ApiResult<()> {
        let path = format!("/goals/subgoals/{}", id);
        self.send_empty(self.request(Method::DELETE, &path)?).await
    }
}
