use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::hhmm;
use super::Priority;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub progress: u8,
    pub sub_routines: Vec<SubRoutine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRoutine {
    pub id: u64,
    pub routine_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub progress: u8,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: u64,
    pub sub_routine_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: ActivityStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub duration: Option<u32>,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Pending,
    Completed,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" | "complete" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Activity {
    pub fn is_completed(&self) -> bool {
        self.status == ActivityStatus::Completed
    }
}

impl Routine {
    pub fn sub_routine(&self, id: u64) -> Option<&SubRoutine> {
        self.sub_routines.iter().find(|sr| sr.id == id)
    }

    pub fn sub_routine_mut(&mut self, id: u64) -> Option<&mut SubRoutine> {
        self.sub_routines.iter_mut().find(|sr| sr.id == id)
    }

    /// Returns false when the sub-routine or activity does not exist.
    pub fn set_activity_status(
        &mut self,
        sub_routine_id: u64,
        activity_id: u64,
        status: ActivityStatus,
    ) -> bool {
        let activity = self
            .sub_routine_mut(sub_routine_id)
            .and_then(|sr| sr.activities.iter_mut().find(|a| a.id == activity_id));

        match activity {
            Some(activity) => {
                activity.status = status;
                true
            }
            None => false,
        }
    }

    pub fn remove_sub_routine(&mut self, id: u64) -> Option<SubRoutine> {
        let pos = self.sub_routines.iter().position(|sr| sr.id == id)?;
        Some(self.sub_routines.remove(pos))
    }
}

impl SubRoutine {
    pub fn remove_activity(&mut self, id: u64) -> Option<Activity> {
        let pos = self.activities.iter().position(|a| a.id == id)?;
        Some(self.activities.remove(pos))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRoutineInput {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSubRoutineInput {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateActivityInput {
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    #[serde(serialize_with = "hhmm::serialize")]
    pub start_time: Option<NaiveTime>,
    #[serde(serialize_with = "hhmm::serialize")]
    pub end_time: Option<NaiveTime>,
    pub duration: Option<u32>,
    #[serde(default)]
    pub priority: Priority,
}
