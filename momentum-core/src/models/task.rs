use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{ParentKind, Priority};

/// Display/scheduling projection of an end sub-goal or a routine activity.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub duration: Option<u32>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub parent_title: String,
    pub source: TaskSource,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Back-reference used to route a completion to the right service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TaskSource {
    #[serde(rename_all = "camelCase")]
    Goal {
        goal_id: u64,
        sub_goal_id: u64,
        parent: ParentKind,
    },
    #[serde(rename_all = "camelCase")]
    Routine {
        routine_id: u64,
        sub_routine_id: u64,
        activity_id: u64,
    },
}
