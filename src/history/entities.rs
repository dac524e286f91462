use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Completion tier of a day. It's always derived from the task counts, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Green,
    Blue,
    Red,
}

impl Status {
    /// Fixed order used by rollups and pie slices.
    pub const ALL: [Status; 3] = [Status::Green, Status::Blue, Status::Red];

    pub fn from_counts(total: u32, completed: u32) -> Self {
        if total > 0 && completed == total {
            Status::Green
        } else if completed > 0 && completed < total {
            Status::Blue
        } else {
            Status::Red
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Status::Green => "green",
            Status::Blue => "blue",
            Status::Red => "red",
        }
    }

    pub fn color_token(&self) -> &'static str {
        match self {
            Status::Green => "#22c55e",
            Status::Blue => "#3b82f6",
            Status::Red => "#ef4444",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    /// Older records also carry `current` for the task in progress.
    #[default]
    #[serde(alias = "current")]
    Upcoming,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Completed => TaskStatus::Upcoming,
            TaskStatus::Upcoming => TaskStatus::Completed,
        }
    }
}

/// Copy of a task at the moment its day was last written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    #[serde(default)]
    pub id: u64,
    pub title: Arc<str>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Arc<str>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Arc<str>>,
}

impl TaskSnapshot {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Summary of one day. Fields are private so `status` can't drift from the counts. Reading goes
/// through [StoredRecord](super::normalize::StoredRecord) instead of `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    date: NaiveDate,
    total: u32,
    completed: u32,
    status: Status,
    tasks: Vec<TaskSnapshot>,
}

impl DailyRecord {
    /// Builds a record from raw counts. `completed` is clamped to `total`.
    pub fn from_counts(date: NaiveDate, total: u32, completed: u32) -> Self {
        Self::with_tasks(date, total, completed, vec![])
    }

    /// Builds a record from the task list of a day.
    pub fn from_tasks(date: NaiveDate, tasks: Vec<TaskSnapshot>) -> Self {
        let total = tasks.len() as u32;
        let completed = tasks.iter().filter(|t| t.is_completed()).count() as u32;
        Self::with_tasks(date, total, completed, tasks)
    }

    pub(crate) fn with_tasks(
        date: NaiveDate,
        total: u32,
        completed: u32,
        tasks: Vec<TaskSnapshot>,
    ) -> Self {
        let completed = completed.min(total);
        Self {
            date,
            total,
            completed,
            status: Status::from_counts(total, completed),
            tasks,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn tasks(&self) -> &[TaskSnapshot] {
        &self.tasks
    }
}

/// Every recorded day keyed by its calendar date.
pub type History = BTreeMap<NaiveDate, DailyRecord>;

/// Immutable view of a [History] handed to the aggregation layer. `version` changes whenever the
/// producer delivers new content and is what memoization keys on.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    version: u64,
    records: Arc<History>,
}

impl HistorySnapshot {
    pub fn new(version: u64, records: History) -> Self {
        Self {
            version,
            records: Arc::new(records),
        }
    }

    /// An absent history is an empty one.
    pub fn from_optional(version: u64, records: Option<History>) -> Self {
        Self::new(version, records.unwrap_or_default())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn records(&self) -> &History {
        &self.records
    }

    /// Produces the next snapshot with `record` written over its date.
    pub fn with_record(&self, record: DailyRecord) -> Self {
        let mut records = History::clone(&self.records);
        records.insert(record.date(), record);
        Self {
            version: self.version + 1,
            records: Arc::new(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DailyRecord, Status, TaskSnapshot, TaskStatus};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn status_derivation() {
        assert_eq!(Status::from_counts(4, 4), Status::Green);
        assert_eq!(Status::from_counts(3, 1), Status::Blue);
        assert_eq!(Status::from_counts(3, 0), Status::Red);
        assert_eq!(Status::from_counts(0, 0), Status::Red);
    }

    #[test]
    fn status_matches_counts_for_small_values() {
        for total in 0..6 {
            for completed in 0..=total {
                let status = DailyRecord::from_counts(date(), total, completed).status();
                let green = total > 0 && completed == total;
                assert_eq!(status == Status::Green, green, "{completed}/{total}");
                if !green {
                    assert_eq!(status == Status::Red, completed == 0 || total == 0);
                }
            }
        }
    }

    #[test]
    fn completed_is_clamped() {
        let record = DailyRecord::from_counts(date(), 2, 7);
        assert_eq!(record.completed(), 2);
        assert_eq!(record.status(), Status::Green);
    }

    #[test]
    fn record_from_tasks() {
        let tasks = vec![
            TaskSnapshot {
                id: 1,
                title: "Morning Standup".into(),
                status: TaskStatus::Completed,
                time: Some("09:00".into()),
                category: Some("work".into()),
            },
            TaskSnapshot {
                id: 2,
                title: "Lunch Break".into(),
                status: TaskStatus::Upcoming,
                time: None,
                category: None,
            },
        ];
        let record = DailyRecord::from_tasks(date(), tasks);
        assert_eq!(record.total(), 2);
        assert_eq!(record.completed(), 1);
        assert_eq!(record.status(), Status::Blue);
    }

    #[test]
    fn legacy_current_status_reads_as_upcoming() {
        let task: TaskSnapshot =
            serde_json::from_str(r#"{"id":2,"title":"Deep Work","status":"current"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Upcoming);
    }
}
