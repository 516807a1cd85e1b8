// File: src/store.rs
//! In-memory working set of tasks and every operation on it.
//!
//! A `TaskStore` is built from whatever `LocalStorage::load` returned, mutated
//! by exactly one command, and handed back to `LocalStorage::save`. It never
//! touches the filesystem itself.
use crate::error::{TaskError, TaskResult};
use crate::model::validate::{
    check_interval, format_day, now, parse_date, parse_day, require_text, today,
    validate_future_date_at, validate_priority,
};
use crate::model::{NewTask, Task, TaskEdit, TaskField};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 0) {
    Some(t) => t,
    None => panic!("Invalid end of day"),
};

/// Which tasks `list` shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    /// Start time or deadline written on the current local date.
    Today,
    Done,
    Pending,
    /// Inclusive calendar days; `to` is widened to 23:59.
    DateRange { from: NaiveDate, to: NaiveDate },
}

impl TaskFilter {
    /// Builds a range filter from two `DD-MM-YYYY` strings.
    pub fn date_range(from_text: &str, to_text: &str) -> TaskResult<Self> {
        let from = parse_day(from_text)?;
        let to = parse_day(to_text)?;
        let filter = TaskFilter::DateRange { from, to };
        filter.check()?;
        Ok(filter)
    }

    fn check(&self) -> TaskResult<()> {
        if let TaskFilter::DateRange { from, to } = self
            && to < from
        {
            return Err(TaskError::InvalidRange {
                from: format_day(from),
                to: format_day(to),
            });
        }
        Ok(())
    }

    fn matches(&self, task: &Task, today: &NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Today => task.is_on_day(today),
            TaskFilter::Done => task.done,
            TaskFilter::Pending => !task.done,
            TaskFilter::DateRange { from, to } => {
                task.touches_range(&from.and_time(NaiveTime::MIN), &to.and_time(END_OF_DAY))
            }
        }
    }
}

/// Per-field outcome of an edit. Rejected fields kept their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditReport {
    pub applied: Vec<TaskField>,
    pub rejected: Vec<(TaskField, TaskError)>,
}

impl EditReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn error_for(&self, field: TaskField) -> Option<&TaskError> {
        self.rejected
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, e)| e)
    }

    fn record<T>(&mut self, field: TaskField, result: TaskResult<T>, slot: &mut T) {
        match result {
            Ok(value) => {
                *slot = value;
                self.applied.push(field);
            }
            Err(e) => self.rejected.push((field, e)),
        }
    }
}

/// 1 for an empty set, otherwise one past the highest id present.
pub fn next_id(tasks: &[Task]) -> TaskResult<u32> {
    match tasks.iter().map(|t| t.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(TaskError::IdsExhausted { max }),
    }
}

pub fn find_by_id(tasks: &[Task], id: u32) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

/// Applies each supplied field on its own. A bad field is reported and left
/// untouched while the others still go through. Start and end are judged as
/// one interval and revert together.
pub fn edit(task: &mut Task, changes: &TaskEdit, now: NaiveDateTime) -> EditReport {
    let mut report = EditReport::default();

    if let Some(raw) = &changes.title {
        report.record(TaskField::Title, require_text(raw, "Title"), &mut task.title);
    }
    if let Some(raw) = &changes.description {
        report.record(
            TaskField::Description,
            require_text(raw, "Description"),
            &mut task.description,
        );
    }
    if let Some(raw) = &changes.deadline {
        report.record(
            TaskField::Deadline,
            validate_future_date_at(raw, now),
            &mut task.deadline,
        );
    }

    if changes.start_time.is_some() || changes.end_time.is_some() {
        let interval = edited_interval(task, changes);
        let mut slot = (task.start_time, task.end_time);
        report.record(TaskField::Schedule, interval, &mut slot);
        (task.start_time, task.end_time) = slot;
    }

    if let Some(raw) = &changes.priority {
        report.record(
            TaskField::Priority,
            validate_priority(raw),
            &mut task.priority,
        );
    }

    report
}

fn edited_interval(
    task: &Task,
    changes: &TaskEdit,
) -> TaskResult<(NaiveDateTime, NaiveDateTime)> {
    let start = match &changes.start_time {
        Some(raw) => parse_date(raw)?,
        None => task.start_time,
    };
    let end = match &changes.end_time {
        Some(raw) => parse_date(raw)?,
        None => task.end_time,
    };
    check_interval(start, end)
}

/// One-way completion. A second call changes nothing and says so.
pub fn mark_done(task: &mut Task) -> TaskResult<()> {
    if task.done {
        return Err(TaskError::AlreadyDone { id: task.id });
    }
    task.done = true;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    pub tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_id(&self) -> TaskResult<u32> {
        next_id(&self.tasks)
    }

    pub fn get_task(&self, id: u32) -> Option<&Task> {
        find_by_id(&self.tasks, id)
    }

    pub fn get_task_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn require_task_mut(&mut self, id: u32) -> TaskResult<&mut Task> {
        self.get_task_mut(id).ok_or(TaskError::NotFound { id })
    }

    pub fn add_task(&mut self, fields: &NewTask) -> TaskResult<Task> {
        self.add_task_at(fields, now())
    }

    /// Validates every field, then appends. Nothing is added on failure.
    pub fn add_task_at(&mut self, fields: &NewTask, now: NaiveDateTime) -> TaskResult<Task> {
        let title = require_text(&fields.title, "Title")?;
        let description = require_text(&fields.description, "Description")?;
        let deadline = validate_future_date_at(&fields.deadline, now)?;
        let start = parse_date(&fields.start_time)?;
        let end = parse_date(&fields.end_time)?;
        let (start_time, end_time) = check_interval(start, end)?;
        let priority = validate_priority(&fields.priority)?;
        let id = self.next_id()?;

        let task = Task {
            id,
            title,
            description,
            deadline,
            start_time,
            end_time,
            priority,
            done: false,
        };
        log::info!("Adding task #{} '{}'", task.id, task.title);
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn edit_task(&mut self, id: u32, changes: &TaskEdit) -> TaskResult<EditReport> {
        self.edit_task_at(id, changes, now())
    }

    pub fn edit_task_at(
        &mut self,
        id: u32,
        changes: &TaskEdit,
        now: NaiveDateTime,
    ) -> TaskResult<EditReport> {
        let task = self.require_task_mut(id)?;
        let report = edit(task, changes, now);
        log::debug!(
            "Edited task #{}: applied {:?}, rejected {:?}",
            id,
            report.applied,
            report.rejected
        );
        Ok(report)
    }

    pub fn mark_done(&mut self, id: u32) -> TaskResult<Task> {
        let task = self.require_task_mut(id)?;
        mark_done(task)?;
        log::info!("Marked task #{} done", id);
        Ok(task.clone())
    }

    /// Removes the task. Confirmation is the caller's job.
    pub fn delete_task(&mut self, id: u32) -> TaskResult<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound { id })?;
        let removed = self.tasks.remove(idx);
        log::info!("Deleted task #{} '{}'", removed.id, removed.title);
        Ok(removed)
    }

    pub fn filter(&self, filter: &TaskFilter) -> TaskResult<Vec<&Task>> {
        self.filter_at(filter, today())
    }

    /// Keeps stored order; never re-sorts.
    pub fn filter_at(&self, filter: &TaskFilter, today: NaiveDate) -> TaskResult<Vec<&Task>> {
        filter.check()?;
        Ok(self
            .tasks
            .iter()
            .filter(|t| filter.matches(t, &today))
            .collect())
    }
}
