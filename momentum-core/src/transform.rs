//! Wire-format to client-format conversion.
//!
//! The backend speaks snake_case JSON with nullable date/time strings and,
//! depending on the endpoint, nests children under either `sub_goals` or
//! `subGoals`. Everything is normalized here, once, so the rest of the crate
//! only ever sees the typed client shapes from [`crate::models`].

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{
    Activity, ActivityStatus, Goal, ParentKind, ParentRef, Priority, Routine, SubGoal, SubRoutine,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireGoal {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_goals: Option<Vec<WireSubGoal>>,
    #[serde(default, rename = "subGoals", skip_serializing_if = "Option::is_none")]
    pub sub_goals_camel: Option<Vec<WireSubGoal>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireSubGoal {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub progress: Option<f64>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub goal_id: Option<u64>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub parent_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_flag")]
    pub is_temporary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_goals: Option<Vec<WireSubGoal>>,
    #[serde(default, rename = "subGoals", skip_serializing_if = "Option::is_none")]
    pub sub_goals_camel: Option<Vec<WireSubGoal>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireRoutine {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_routines: Option<Vec<WireSubRoutine>>,
    #[serde(default, rename = "subRoutines", skip_serializing_if = "Option::is_none")]
    pub sub_routines_camel: Option<Vec<WireSubRoutine>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireSubRoutine {
    pub id: u64,
    #[serde(default)]
    pub routine_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub progress: Option<f64>,
    #[serde(default)]
    pub activities: Option<Vec<WireActivity>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireActivity {
    pub id: u64,
    #[serde(default)]
    pub sub_routine_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_flag")]
    pub completed: Option<bool>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl WireGoal {
    pub fn children(&self) -> &[WireSubGoal] {
        first_non_empty(&self.sub_goals, &self.sub_goals_camel)
    }
}

impl WireSubGoal {
    pub fn children(&self) -> &[WireSubGoal] {
        first_non_empty(&self.sub_goals, &self.sub_goals_camel)
    }
}

impl WireRoutine {
    pub fn children(&self) -> &[WireSubRoutine] {
        first_non_empty(&self.sub_routines, &self.sub_routines_camel)
    }
}

fn first_non_empty<'a, T>(primary: &'a Option<Vec<T>>, alternate: &'a Option<Vec<T>>) -> &'a [T] {
    [primary, alternate]
        .into_iter()
        .flatten()
        .find(|children| !children.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn transform_goal(wire: &WireGoal) -> Goal {
    Goal {
        id: wire.id,
        title: wire.title.clone(),
        description: wire.description.clone(),
        color: wire.color.clone(),
        icon: wire.icon.clone(),
        progress: percent(wire.progress),
        sub_goals: wire.children().iter().map(transform_sub_goal).collect(),
    }
}

pub fn transform_sub_goal(wire: &WireSubGoal) -> SubGoal {
    SubGoal {
        id: wire.id,
        title: wire.title.clone(),
        description: wire.description.clone(),
        completed: wire.completed,
        progress: percent(wire.progress),
        due_date: parse_date(wire.due_date.as_deref(), wire.id),
        start_time: parse_time(wire.start_time.as_deref(), wire.id),
        end_time: parse_time(wire.end_time.as_deref(), wire.id),
        duration: minutes(wire.duration),
        sub_goals: wire.children().iter().map(transform_sub_goal).collect(),
        priority: parse_priority(wire.priority.as_deref()),
        parent: parent_ref(wire),
        is_temporary: wire.is_temporary,
    }
}

pub fn transform_routine(wire: &WireRoutine) -> Routine {
    Routine {
        id: wire.id,
        title: wire.title.clone(),
        description: wire.description.clone(),
        color: wire.color.clone(),
        icon: wire.icon.clone(),
        progress: percent(wire.progress),
        sub_routines: wire
            .children()
            .iter()
            .map(|sr| transform_sub_routine(sr, wire.id))
            .collect(),
    }
}

pub fn transform_sub_routine(wire: &WireSubRoutine, routine_id: u64) -> SubRoutine {
    SubRoutine {
        id: wire.id,
        routine_id: wire.routine_id.unwrap_or(routine_id),
        title: wire.title.clone(),
        description: wire.description.clone(),
        progress: percent(wire.progress),
        activities: wire
            .activities
            .iter()
            .flatten()
            .map(|a| transform_activity(a, wire.id))
            .collect(),
    }
}

pub fn transform_activity(wire: &WireActivity, sub_routine_id: u64) -> Activity {
    let status = match (wire.status.as_deref(), wire.completed) {
        (Some(s), _) => ActivityStatus::from_str(s).unwrap_or_else(|| {
            tracing::warn!(activity = wire.id, status = s, "unknown activity status, treating as pending");
            ActivityStatus::Pending
        }),
        (None, Some(true)) => ActivityStatus::Completed,
        (None, _) => ActivityStatus::Pending,
    };

    Activity {
        id: wire.id,
        sub_routine_id: wire.sub_routine_id.unwrap_or(sub_routine_id),
        title: wire.title.clone(),
        description: wire.description.clone(),
        status,
        scheduled_date: parse_date(wire.scheduled_date.as_deref(), wire.id),
        start_time: parse_time(wire.start_time.as_deref(), wire.id),
        end_time: parse_time(wire.end_time.as_deref(), wire.id),
        duration: minutes(wire.duration),
        priority: parse_priority(wire.priority.as_deref()),
    }
}

fn parent_ref(wire: &WireSubGoal) -> Option<ParentRef> {
    match (wire.parent_id, wire.goal_id) {
        (Some(id), _) => Some(ParentRef {
            id,
            kind: ParentKind::from_parent_type(wire.parent_type.as_deref()),
        }),
        (None, Some(goal_id)) => Some(ParentRef {
            id: goal_id,
            kind: ParentKind::Goal,
        }),
        (None, None) => None,
    }
}

fn percent(value: Option<f64>) -> u8 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

fn minutes(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u32)
}

fn parse_priority(raw: Option<&str>) -> Priority {
    match raw {
        Some(s) => Priority::from_str(s).unwrap_or_else(|| {
            tracing::warn!(priority = s, "unknown priority, defaulting to MEDIUM");
            Priority::Medium
        }),
        None => Priority::Medium,
    }
}

/// Accepts `YYYY-MM-DD` as well as timestamps that start with it
/// (`2024-03-01T00:00:00.000000Z`, `2024-03-01 00:00:00`).
pub fn parse_date(raw: Option<&str>, node: u64) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = raw
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    if parsed.is_none() {
        tracing::warn!(node, value = raw, "unparseable date, dropping");
    }
    parsed
}

/// Accepts `HH:MM:SS` and `HH:MM`.
pub fn parse_time(raw: Option<&str>, node: u64) -> Option<NaiveTime> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok();
    if parsed.is_none() {
        tracing::warn!(node, value = raw, "unparseable time, dropping");
    }
    parsed
}

/// The backend is not consistent about scalar encodings: flags arrive as
/// booleans, 0/1 or "0"/"1", and decimals as numbers or strings.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn as_flag(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => match s.trim() {
                "1" | "true" => Some(true),
                "0" | "false" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(as_flag(&value).unwrap_or(false))
    }

    pub fn opt_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(as_flag(&value))
    }

    pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_flags_accept_numeric_encodings() {
        let wire: WireSubGoal =
            serde_json::from_str(r#"{"id": 1, "title": "a", "completed": 1, "is_temporary": "0"}"#)
                .unwrap();
        assert!(wire.completed);
        assert_eq!(wire.is_temporary, Some(false));
    }

    #[test]
    fn progress_strings_are_rounded() {
        let wire: WireGoal =
            serde_json::from_str(r#"{"id": 1, "title": "g", "progress": "66.67"}"#).unwrap();
        assert_eq!(transform_goal(&wire).progress, 67);
    }

    #[test]
    fn null_scalars_stay_absent() {
        let wire: WireSubGoal = serde_json::from_str(
            r#"{"id": 1, "title": "a", "completed": null, "progress": null, "duration": null, "due_date": null}"#,
        )
        .unwrap();
        let sub_goal = transform_sub_goal(&wire);
        assert!(!sub_goal.completed);
        assert_eq!(sub_goal.progress, 0);
        assert_eq!(sub_goal.duration, None);
        assert_eq!(sub_goal.due_date, None);
    }

    #[test]
    fn parses_timestamp_prefixed_dates() {
        assert_eq!(
            parse_date(Some("2024-03-01T00:00:00.000000Z"), 1),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_date(Some("soon"), 1), None);
        assert_eq!(parse_date(Some(""), 1), None);
    }

    #[test]
    fn parses_short_and_long_times() {
        assert_eq!(parse_time(Some("09:30"), 1), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_time(Some("09:30:15"), 1), NaiveTime::from_hms_opt(9, 30, 15));
        assert_eq!(parse_time(Some("9.30am"), 1), None);
    }
}
