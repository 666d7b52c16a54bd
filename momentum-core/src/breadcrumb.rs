//! Breadcrumb trail for drilling through a goal's sub-goal tree.
//!
//! The implicit "Home" crumb (the goal list) is never stored. Entry `0` is
//! the top-level goal view, entry `i` the view `i` levels below it, so the
//! trail length always equals the current nesting depth.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Goal, SubGoal};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("sub-goal {0} is not a child of the current view")]
    NotAChild(u64),
    #[error("sub-goal {0} has no children to drill into")]
    NotDrillable(u64),
    #[error("breadcrumb index {index} out of range (depth {depth})")]
    OutOfRange { index: usize, depth: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crumb {
    pub id: u64,
    pub title: String,
    pub goal_id: u64,
    pub sub_goals: Vec<SubGoal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breadcrumbs {
    entries: Vec<Crumb>,
}

impl Breadcrumbs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, crumb: Crumb) {
        self.entries.push(crumb);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Crumb] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Crumb> {
        self.entries.get(index)
    }

    /// Tap on crumb `index`: pop back `len - index` levels so that exactly
    /// `index` entries remain. Returns the number of levels popped.
    pub fn jump_to(&mut self, index: usize) -> Result<usize, NavigationError> {
        let depth = self.entries.len();
        if index >= depth {
            return Err(NavigationError::OutOfRange { index, depth });
        }
        self.entries.truncate(index);
        Ok(depth - index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Owns one goal tree and the position of the current view inside it.
#[derive(Debug, Clone)]
pub struct GoalNavigator {
    goal: Goal,
    breadcrumbs: Breadcrumbs,
    /// Ids of the sub-goals drilled into, outermost first.
    path: Vec<u64>,
}

impl GoalNavigator {
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            breadcrumbs: Breadcrumbs::new(),
            path: Vec::new(),
        }
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn goal_mut(&mut self) -> &mut Goal {
        &mut self.goal
    }

    pub fn breadcrumbs(&self) -> &Breadcrumbs {
        &self.breadcrumbs
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The sub-goal currently viewed, `None` at the goal level.
    pub fn current(&self) -> Option<&SubGoal> {
        let mut nodes = &self.goal.sub_goals;
        let mut current = None;
        for id in &self.path {
            let node = nodes.iter().find(|n| n.id == *id)?;
            nodes = &node.sub_goals;
            current = Some(node);
        }
        current
    }

    pub fn current_title(&self) -> &str {
        match self.current() {
            Some(node) => &node.title,
            None => &self.goal.title,
        }
    }

    pub fn current_children(&self) -> &[SubGoal] {
        match self.current() {
            Some(node) => &node.sub_goals,
            None => &self.goal.sub_goals,
        }
    }

    /// Drill into a child of the current view. The current view is appended
    /// to the trail first. End sub-goals cannot be drilled into.
    pub fn drill_into(&mut self, child_id: u64) -> Result<&[SubGoal], NavigationError> {
        let child = self
            .current_children()
            .iter()
            .find(|c| c.id == child_id)
            .ok_or(NavigationError::NotAChild(child_id))?;
        if child.is_leaf() {
            return Err(NavigationError::NotDrillable(child_id));
        }

        let crumb = match self.current() {
            Some(node) => Crumb {
                id: node.id,
                title: node.title.clone(),
                goal_id: self.goal.id,
                sub_goals: node.sub_goals.clone(),
            },
            None => Crumb {
                id: self.goal.id,
                title: self.goal.title.clone(),
                goal_id: self.goal.id,
                sub_goals: self.goal.sub_goals.clone(),
            },
        };
        self.breadcrumbs.push(crumb);
        self.path.push(child_id);

        tracing::debug!(goal = self.goal.id, sub_goal = child_id, depth = self.depth(), "drilled into sub-goal");
        Ok(self.current_children())
    }

    /// Jump back to breadcrumb `index`. Returns the number of levels popped.
    pub fn jump_to(&mut self, index: usize) -> Result<usize, NavigationError> {
        let popped = self.breadcrumbs.jump_to(index)?;
        self.path.truncate(index);
        Ok(popped)
    }

    /// Swap in a freshly loaded tree, keeping as much of the current path as
    /// still exists in it.
    pub fn replace_goal(&mut self, goal: Goal) {
        self.goal = goal;
        let path = std::mem::take(&mut self.path);
        self.breadcrumbs.clear();
        for id in path {
            if self.drill_into(id).is_err() {
                break;
            }
        }
    }
}
