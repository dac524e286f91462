//! Editing of a single day's task list. Every change is turned back into a [DailyRecord] and
//! written through the repository, the record's counts and status are derived from the tasks.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::history::{
    entities::{DailyRecord, TaskSnapshot, TaskStatus},
    repository::HistoryRepository,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    date: NaiveDate,
    tasks: Vec<TaskSnapshot>,
}

impl DayPlan {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            tasks: vec![],
        }
    }

    pub fn from_record(record: &DailyRecord) -> Self {
        Self {
            date: record.date(),
            tasks: record.tasks().to_vec(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tasks(&self) -> &[TaskSnapshot] {
        &self.tasks
    }

    /// Adds an upcoming task and keeps the list ordered by time. Tasks without a time go last.
    pub fn add_task(
        &mut self,
        title: &str,
        time: Option<&str>,
        category: Option<&str>,
    ) -> Result<u64> {
        let title = title.trim();
        if title.is_empty() {
            return Err(anyhow!("Task title can't be empty"));
        }
        let id = self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.tasks.push(TaskSnapshot {
            id,
            title: title.into(),
            status: TaskStatus::Upcoming,
            time: time.map(Arc::from),
            category: category.map(Arc::from),
        });
        self.tasks
            .sort_by(|a, b| match (a.time.as_deref(), b.time.as_deref()) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
        Ok(id)
    }

    /// Flips a task between completed and upcoming, returns the new status.
    pub fn toggle_task(&mut self, id: u64) -> Result<TaskStatus> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow!("No task with id {id} on {}", self.date))?;
        task.status = task.status.toggled();
        Ok(task.status)
    }

    pub fn remove_task(&mut self, id: u64) -> Result<TaskSnapshot> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| anyhow!("No task with id {id} on {}", self.date))?;
        Ok(self.tasks.remove(index))
    }

    pub fn to_record(&self) -> DailyRecord {
        DailyRecord::from_tasks(self.date, self.tasks.clone())
    }
}

/// Bridges [DayPlan] edits and a [HistoryRepository].
pub struct Tracker<R: HistoryRepository> {
    repository: R,
}

impl<R: HistoryRepository> Tracker<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn open(&self, date: NaiveDate) -> Result<DayPlan> {
        let plan = match self.repository.get_record(date).await? {
            Some(record) => DayPlan::from_record(&record),
            None => DayPlan::empty(date),
        };
        debug!("Opened {date} with {} tasks", plan.tasks.len());
        Ok(plan)
    }

    pub async fn commit(&self, plan: &DayPlan) -> Result<DailyRecord> {
        let record = plan.to_record();
        self.repository.save_daily_record(&record).await?;
        info!(
            "Committed {} ({}/{} {})",
            record.date(),
            record.completed(),
            record.total(),
            record.status()
        );
        Ok(record)
    }
}
