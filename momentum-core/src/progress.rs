//! Progress roll-up for goal and routine trees.
//!
//! Goal trees use a flat completion ratio over a whole subtree: the
//! denominator counts end sub-goals (a node with children contributes its
//! children instead of itself), the numerator counts every node flagged
//! `completed` at any depth. An intermediate node that is itself marked
//! completed therefore counts on top of its descendants; the ratio is capped
//! at 100.
//!
//! Routine trees average instead: a sub-routine is the share of completed
//! activities, a routine is the mean of its sub-routines.

use serde::Serialize;

use crate::models::{Goal, ParentKind, Routine, SubGoal, SubRoutine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProgressTarget {
    Goal(u64),
    SubGoal { id: u64, parent: ParentKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressChange {
    pub target: ProgressTarget,
    pub previous: u8,
    pub current: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoutineTarget {
    Routine(u64),
    SubRoutine { routine_id: u64, id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoutineProgressChange {
    pub target: RoutineTarget,
    pub previous: u8,
    pub current: u8,
}

/// Number of end sub-goals below `nodes`, at every depth.
pub fn total_count(nodes: &[SubGoal]) -> usize {
    nodes
        .iter()
        .map(|node| {
            if node.is_leaf() {
                1
            } else {
                total_count(&node.sub_goals)
            }
        })
        .sum()
}

/// Number of nodes flagged completed below `nodes`, intermediate ones included.
pub fn completed_count(nodes: &[SubGoal]) -> usize {
    nodes
        .iter()
        .map(|node| usize::from(node.completed) + completed_count(&node.sub_goals))
        .sum()
}

/// `round(completed / total * 100)`, 0 for an empty subtree.
pub fn aggregate_progress(nodes: &[SubGoal]) -> u8 {
    percent_of(completed_count(nodes), total_count(nodes))
}

pub fn percent_of(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let ratio = part as f64 / whole as f64 * 100.0;
    ratio.round().min(100.0) as u8
}

impl Goal {
    /// Count used for the goal card: every end sub-goal in the tree.
    pub fn sub_goals_count(&self) -> usize {
        total_count(&self.sub_goals)
    }

    pub fn completed_count(&self) -> usize {
        completed_count(&self.sub_goals)
    }
}

/// Recompute every progress value in the tree, bottom-up.
///
/// Leaves follow their `completed` flag; every other node and the goal itself
/// take the aggregate of their subtree. Returns one change per node whose
/// value moved, descendants before ancestors and the goal last.
pub fn recompute(goal: &mut Goal) -> Vec<ProgressChange> {
    let mut changes = Vec::new();
    recompute_nodes(&mut goal.sub_goals, ParentKind::Goal, &mut changes);

    let current = aggregate_progress(&goal.sub_goals);
    if current != goal.progress {
        changes.push(ProgressChange {
            target: ProgressTarget::Goal(goal.id),
            previous: goal.progress,
            current,
        });
        goal.progress = current;
    }

    changes
}

fn recompute_nodes(nodes: &mut [SubGoal], parent: ParentKind, changes: &mut Vec<ProgressChange>) {
    for node in nodes.iter_mut() {
        recompute_nodes(&mut node.sub_goals, ParentKind::SubGoal, changes);

        let current = if node.is_leaf() {
            if node.completed {
                100
            } else {
                0
            }
        } else {
            aggregate_progress(&node.sub_goals)
        };

        if current != node.progress {
            changes.push(ProgressChange {
                target: ProgressTarget::SubGoal {
                    id: node.id,
                    parent,
                },
                previous: node.progress,
                current,
            });
            node.progress = current;
        }
    }
}

pub fn sub_routine_progress(sub_routine: &SubRoutine) -> u8 {
    let done = sub_routine
        .activities
        .iter()
        .filter(|a| a.is_completed())
        .count();
    percent_of(done, sub_routine.activities.len())
}

/// Mean of the sub-routines' progress, rounded. 0 without sub-routines.
pub fn routine_progress(routine: &Routine) -> u8 {
    if routine.sub_routines.is_empty() {
        return 0;
    }
    let sum: u32 = routine
        .sub_routines
        .iter()
        .map(|sr| u32::from(sub_routine_progress(sr)))
        .sum();
    (f64::from(sum) / routine.sub_routines.len() as f64).round() as u8
}

pub fn recompute_routine(routine: &mut Routine) -> Vec<RoutineProgressChange> {
    let mut changes = Vec::new();

    for sub_routine in routine.sub_routines.iter_mut() {
        let current = sub_routine_progress(sub_routine);
        if current != sub_routine.progress {
            changes.push(RoutineProgressChange {
                target: RoutineTarget::SubRoutine {
                    routine_id: routine.id,
                    id: sub_routine.id,
                },
                previous: sub_routine.progress,
                current,
            });
            sub_routine.progress = current;
        }
    }

    let current = routine_progress(routine);
    if current != routine.progress {
        changes.push(RoutineProgressChange {
            target: RoutineTarget::Routine(routine.id),
            previous: routine.progress,
            current,
        });
        routine.progress = current;
    }

    changes
}
