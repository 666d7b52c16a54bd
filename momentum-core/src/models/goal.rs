use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::hhmm;
use super::Priority;

/// Polymorphic parent type the backend expects for sub-goals attached under
/// another sub-goal.
pub const SUB_GOAL_PARENT_TYPE: &str = "App\\Models\\SubGoal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub progress: u8,
    pub sub_goals: Vec<SubGoal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubGoal {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub progress: u8,
    pub due_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Minutes.
    pub duration: Option<u32>,
    pub sub_goals: Vec<SubGoal>,
    pub priority: Priority,
    pub parent: Option<ParentRef>,
    pub is_temporary: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRef {
    pub id: u64,
    pub kind: ParentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentKind {
    Goal,
    SubGoal,
}

impl ParentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goal => "Goal",
            Self::SubGoal => "SubGoal",
        }
    }

    /// The `parent_type` value sent with sub-goal create/update requests.
    /// Goal parents are sent as `null`.
    pub fn parent_type(&self) -> Option<&'static str> {
        match self {
            Self::Goal => None,
            Self::SubGoal => Some(SUB_GOAL_PARENT_TYPE),
        }
    }

    pub fn from_parent_type(parent_type: Option<&str>) -> Self {
        match parent_type {
            Some(t) if t.rsplit('\\').next() == Some("SubGoal") => Self::SubGoal,
            _ => Self::Goal,
        }
    }
}

impl SubGoal {
    /// A sub-goal without children is an end sub-goal: the unit of actual work.
    pub fn is_leaf(&self) -> bool {
        self.sub_goals.is_empty()
    }
}

impl Goal {
    pub fn find_sub_goal(&self, id: u64) -> Option<&SubGoal> {
        find_in(&self.sub_goals, id)
    }

    pub fn find_sub_goal_mut(&mut self, id: u64) -> Option<&mut SubGoal> {
        find_in_mut(&mut self.sub_goals, id)
    }

    /// Kind of the parent that owns sub-goal `id` within this tree.
    pub fn parent_kind_of(&self, id: u64) -> Option<ParentKind> {
        if self.sub_goals.iter().any(|sg| sg.id == id) {
            return Some(ParentKind::Goal);
        }
        self.find_sub_goal(id).map(|_| ParentKind::SubGoal)
    }

    /// Ancestor chain from the top-level sub-goal down to `id`, inclusive.
    pub fn path_to(&self, id: u64) -> Option<Vec<&SubGoal>> {
        let mut path = Vec::new();
        if path_in(&self.sub_goals, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Mark a sub-goal completed or not. For leaves the progress follows the flag.
    /// Returns false when no sub-goal with that id exists.
    pub fn set_completed(&mut self, id: u64, completed: bool) -> bool {
        match self.find_sub_goal_mut(id) {
            Some(sub_goal) => {
                sub_goal.completed = completed;
                if sub_goal.is_leaf() {
                    sub_goal.progress = if completed { 100 } else { 0 };
                }
                true
            }
            None => false,
        }
    }

    /// Remove a sub-goal (and its descendants) wherever it sits in the tree.
    /// Siblings keep their ids and order.
    pub fn remove_sub_goal(&mut self, id: u64) -> Option<SubGoal> {
        remove_in(&mut self.sub_goals, id)
    }
}

fn find_in(nodes: &[SubGoal], id: u64) -> Option<&SubGoal> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.sub_goals, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut(nodes: &mut [SubGoal], id: u64) -> Option<&mut SubGoal> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.sub_goals, id) {
            return Some(found);
        }
    }
    None
}

fn path_in<'a>(nodes: &'a [SubGoal], id: u64, path: &mut Vec<&'a SubGoal>) -> bool {
    for node in nodes {
        path.push(node);
        if node.id == id || path_in(&node.sub_goals, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn remove_in(nodes: &mut Vec<SubGoal>, id: u64) -> Option<SubGoal> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(pos));
    }
    nodes
        .iter_mut()
        .find_map(|node| remove_in(&mut node.sub_goals, id))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGoalInput {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGoalInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSubGoalInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(serialize_with = "hhmm::serialize")]
    pub start_time: Option<NaiveTime>,
    #[serde(serialize_with = "hhmm::serialize")]
    pub end_time: Option<NaiveTime>,
    pub duration: Option<u32>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_temporary: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubGoalInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "hhmm::serialize"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "hhmm::serialize"
    )]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}
