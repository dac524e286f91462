//! Stored documents come from older app versions and other backends, so every field is optional
//! and the stored `status` is never trusted. Everything that leaves this module is a well-formed
//! [DailyRecord].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::utils::time::record_name_to_date;

use super::entities::{DailyRecord, History, TaskSnapshot};

#[derive(Debug, Default, Deserialize)]
pub struct StoredRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub completed: Option<Value>,
    #[serde(default)]
    pub tasks: Option<Vec<Value>>,
}

impl StoredRecord {
    /// Applies the defaulting policy: missing `completed` is 0, missing `total` is the number of
    /// stored tasks, `completed` never exceeds `total`.
    pub fn normalize(self, date: NaiveDate) -> DailyRecord {
        let tasks = self
            .tasks
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<TaskSnapshot>(v) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!("Skipping malformed task on {date}: {e}");
                    None
                }
            })
            .collect::<Vec<_>>();

        let total = self
            .total
            .as_ref()
            .and_then(count)
            .unwrap_or(tasks.len() as u32);
        let completed = self.completed.as_ref().and_then(count).unwrap_or(0);

        DailyRecord::with_tasks(date, total, completed, tasks)
    }
}

fn count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| v.min(u32::MAX as u64) as u32)
            .or_else(|| n.as_f64().map(|v| v.max(0.) as u32)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses one stored document. `key` is the authoritative date; the embedded `date` field is only
/// used to report mismatches.
pub fn parse_record(key: &str, document: Value) -> Option<DailyRecord> {
    let Some(date) = record_name_to_date(key) else {
        warn!("Ignoring history entry with non-date key {key:?}");
        return None;
    };
    if document.is_null() {
        return None;
    }
    match serde_json::from_value::<StoredRecord>(document) {
        Ok(stored) => {
            if let Some(embedded) = stored.date.as_deref().filter(|d| *d != key) {
                warn!("History entry {key} carries mismatching date {embedded}");
            }
            Some(stored.normalize(date))
        }
        Err(e) => {
            warn!("Ignoring malformed history entry {key}: {e}");
            None
        }
    }
}

/// Parses a whole history document (a map from ISO date to record). `null` is an empty history.
pub fn parse_history(document: Value) -> History {
    let entries = match document {
        Value::Object(map) => map,
        Value::Null => return History::new(),
        other => {
            warn!("History document isn't an object, found {}", kind(&other));
            return History::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(key, value)| parse_record(&key, value).map(|r| (r.date(), r)))
        .collect::<BTreeMap<_, _>>()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::history::entities::Status;

    use super::{parse_history, parse_record};

    #[test]
    fn missing_fields_default() {
        let record = parse_record("2026-03-01", json!({ "total": 3 })).unwrap();
        assert_eq!(record.completed(), 0);
        assert_eq!(record.status(), Status::Red);

        let record = parse_record(
            "2026-03-02",
            json!({ "tasks": [
                { "title": "a", "status": "completed" },
                { "title": "b", "status": "upcoming" }
            ] }),
        )
        .unwrap();
        assert_eq!(record.total(), 2);
        assert_eq!(record.completed(), 0);
    }

    #[test]
    fn stored_status_is_rederived() {
        let record = parse_record(
            "2026-03-01",
            json!({ "total": 4, "completed": 4, "status": "red" }),
        )
        .unwrap();
        assert_eq!(record.status(), Status::Green);
    }

    #[test]
    fn bad_keys_and_documents_are_skipped() {
        let history = parse_history(json!({
            "2026-03-01": { "total": 4, "completed": 4 },
            "yesterday": { "total": 1, "completed": 1 },
            "2026-03-02": "garbage",
            "2026-03-03": { "total": 3, "completed": 1, "tasks": [{ "bogus": true }] },
        }));
        assert_eq!(history.len(), 2);
        let blue = &history[&NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()];
        assert_eq!(blue.status(), Status::Blue);
        assert!(blue.tasks().is_empty());
    }

    #[test]
    fn null_history_is_empty() {
        assert!(parse_history(serde_json::Value::Null).is_empty());
    }
}
