use momentum_core::models::{
    Activity, ActivityStatus, CreateActivityInput, CreateRoutineInput, CreateSubRoutineInput,
    Routine, SubRoutine,
};
use momentum_core::transform::{
    transform_activity, transform_routine, transform_sub_routine, WireActivity, WireRoutine,
    WireSubRoutine,
};
use reqwest::Method;
use serde_json::json;

use super::{ApiClient, ApiResult};

impl ApiClient {
    pub async fn list_routines(&self) -> ApiResult<Vec<Routine>> {
        let wire: Vec<WireRoutine> = self.send(self.request(Method::GET, "/routines")?).await?;
        Ok(wire.iter().map(transform_routine).collect())
    }

    pub async fn get_routine(&self, id: u64) -> ApiResult<Routine> {
        let path = format!("/routines/{}", id);
        let wire: WireRoutine = self.send(self.request(Method::GET, &path)?).await?;
        Ok(transform_routine(&wire))
    }

    pub async fn create_routine(&self, input: &CreateRoutineInput) -> ApiResult<Routine> {
        let builder = self.request(Method::POST, "/routines")?.json(input);
        let wire: WireRoutine = self.send(builder).await?;
        Ok(transform_routine(&wire))
    }

    pub async fn delete_routine(&self, id: u64) -> ApiResult<()> {
        let path = format!("/routines/{}", id);
        self.send_empty(self.request(Method::DELETE, &path)?).await
    }

    pub async fn create_sub_routine(
        &self,
        routine_id: u64,
        input: &CreateSubRoutineInput,
    ) -> ApiResult<SubRoutine> {
        let path = format!("/routines/{}/subroutines", routine_id);
        let builder = self.request(Method::POST, &path)?.json(input);
        let wire: WireSubRoutine = self.send(builder).await?;
        Ok(transform_sub_routine(&wire, routine_id))
    }

    pub async fn update_sub_routine_progress(
        &self,
        routine_id: u64,
        sub_routine_id: u64,
        progress: u8,
    ) -> ApiResult<()> {
        let path = format!(
            "/routines/{}/subroutines/{}/progress",
            routine_id, sub_routine_id
        );
        let builder = self
            .request(Method::PATCH, &path)?
            .json(&json!({ "progress": progress }));
        self.send_empty(builder).await
    }

    pub async fn delete_sub_routine(&self, routine_id: u64, sub_routine_id: u64) -> ApiResult<()> {
        let path = format!("/routines/{}/subroutines/{}", routine_id, sub_routine_id);
        self.send_empty(self.request(Method::DELETE, &path)?).await
    }

    pub async fn create_activity(
        &self,
        routine_id: u64,
        sub_routine_id: u64,
        input: &CreateActivityInput,
    ) -> ApiResult<Activity> {
        let path = format!(
            "/routines/{}/subroutines/{}/activities",
            routine_id, sub_routine_id
        );
        let builder = self.request(Method::POST, &path)?.json(input);
        let wire: WireActivity = self.send(builder).await?;
        Ok(transform_activity(&wire, sub_routine_id))
    }

    pub async fn update_activity_status(
        &self,
        routine_id: u64,
        sub_routine_id: u64,
        activity_id: u64,
        status: ActivityStatus,
    ) -> ApiResult<()> {
        let path = format!(
            "/routines/{}/subroutines/{}/activities/{}/status",
            routine_id, sub_routine_id, activity_id
        );
        let builder = self
            .request(Method::PATCH, &path)?
            .json(&json!({ "status": status.as_str() }));
        self.send_empty(builder).await
    }

    pub async fn delete_activity(
        &self,
        routine_id: u64,
        sub_routine_id: u64,
        activity_id: u64,
    ) -> ApiResult<()> {
        let path = format!(
            "/routines/{}/subroutines/{}/activities/{}",
            routine_id, sub_routine_id, activity_id
        );
        self.send_empty(self.request(Method::DELETE, &path)?).await
    }
}
