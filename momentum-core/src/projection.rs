//! Flattening goal and routine trees into schedulable [`Task`]s.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::models::{
    ActivityStatus, Goal, ParentKind, Routine, SubGoal, Task, TaskSource, TaskStatus,
};

/// Every end sub-goal of `goal`, depth-first. The parent title is the nearest
/// ancestor's title (the goal's for top-level sub-goals).
pub fn tasks_for_goal(goal: &Goal) -> Vec<Task> {
    let mut tasks = Vec::new();
    collect_leaves(goal, &goal.sub_goals, &goal.title, ParentKind::Goal, &mut tasks);
    tasks
}

fn collect_leaves(
    goal: &Goal,
    nodes: &[SubGoal],
    parent_title: &str,
    parent: ParentKind,
    tasks: &mut Vec<Task>,
) {
    for node in nodes {
        if !node.is_leaf() {
            collect_leaves(goal, &node.sub_goals, &node.title, ParentKind::SubGoal, tasks);
            continue;
        }

        tasks.push(Task {
            id: node.id,
            title: node.title.clone(),
            scheduled_date: node.due_date,
            scheduled_time: node.start_time,
            duration: node.duration.or_else(|| span_minutes(node.start_time, node.end_time)),
            priority: node.priority,
            status: if node.completed {
                TaskStatus::Completed
            } else {
                TaskStatus::Pending
            },
            parent_title: parent_title.to_string(),
            source: TaskSource::Goal {
                goal_id: goal.id,
                sub_goal_id: node.id,
                parent,
            },
        });
    }
}

pub fn tasks_for_routine(routine: &Routine) -> Vec<Task> {
    routine
        .sub_routines
        .iter()
        .flat_map(|sr| {
            sr.activities.iter().map(move |activity| Task {
                id: activity.id,
                title: activity.title.clone(),
                scheduled_date: activity.scheduled_date,
                scheduled_time: activity.start_time,
                duration: activity
                    .duration
                    .or_else(|| span_minutes(activity.start_time, activity.end_time)),
                priority: activity.priority,
                status: match activity.status {
                    ActivityStatus::Completed => TaskStatus::Completed,
                    ActivityStatus::Pending => TaskStatus::Pending,
                },
                parent_title: sr.title.clone(),
                source: TaskSource::Routine {
                    routine_id: routine.id,
                    sub_routine_id: sr.id,
                    activity_id: activity.id,
                },
            })
        })
        .collect()
}

fn span_minutes(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<u32> {
    let minutes = (end? - start?).num_minutes();
    u32::try_from(minutes).ok().filter(|m| *m > 0)
}

/// Unscheduled tasks sort last; ties go to higher priority.
pub fn sort_by_schedule(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| {
        (
            t.scheduled_date.is_none(),
            t.scheduled_date,
            t.scheduled_time.is_none(),
            t.scheduled_time,
            t.priority,
        )
    });
}

/// The pending task whose scheduled window contains `now`. Tasks without a
/// date are treated as scheduled for every day.
pub fn active_task(tasks: &[Task], now: NaiveDateTime) -> Option<&Task> {
    tasks.iter().find(|task| {
        if task.status == TaskStatus::Completed {
            return false;
        }
        let (Some(start), Some(duration)) = (task.scheduled_time, task.duration) else {
            return false;
        };
        let date: NaiveDate = task.scheduled_date.unwrap_or(now.date());
        let begins = date.and_time(start);
        let ends = begins + TimeDelta::minutes(i64::from(duration));
        begins <= now && now < ends
    })
}
