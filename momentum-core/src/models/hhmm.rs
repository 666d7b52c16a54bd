//! Serde helpers for optional wall-clock times sent to the backend as `HH:MM`.

use chrono::NaiveTime;
use serde::Serializer;

pub const FORMAT: &str = "%H:%M";

pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}
