// File: src/controller.rs
//! Command layer. Each method is one user command: load the whole task set,
//! run one `TaskStore` operation, write the whole set back if it changed.
//! Nothing is written when the operation fails.
use crate::error::{CommandResult, TaskError};
use crate::model::{NewTask, Task, TaskEdit};
use crate::storage::LocalStorage;
use crate::store::{EditReport, TaskFilter, TaskStore};

#[derive(Debug, Clone)]
pub struct TaskController {
    storage: LocalStorage,
}

impl TaskController {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    fn load_store(&self) -> CommandResult<TaskStore> {
        Ok(TaskStore::from_tasks(self.storage.load()?))
    }

    /// One read of the whole set, for callers that inspect it more than once.
    pub fn snapshot(&self) -> CommandResult<TaskStore> {
        self.load_store()
    }

    fn commit(&self, store: &TaskStore) -> CommandResult<()> {
        self.storage.save(&store.tasks)?;
        Ok(())
    }

    /// Returns matching tasks in stored order.
    pub fn list(&self, filter: &TaskFilter) -> CommandResult<Vec<Task>> {
        let store = self.load_store()?;
        let tasks = store.filter(filter)?.into_iter().cloned().collect();
        Ok(tasks)
    }

    pub fn find(&self, id: u32) -> CommandResult<Option<Task>> {
        Ok(self.load_store()?.get_task(id).cloned())
    }

    pub fn show(&self, id: u32) -> CommandResult<Task> {
        self.find(id)?
            .ok_or_else(|| TaskError::NotFound { id }.into())
    }

    pub fn add_task(&self, fields: &NewTask) -> CommandResult<Task> {
        let mut store = self.load_store()?;
        let task = store.add_task(fields)?;
        self.commit(&store)?;
        Ok(task)
    }

    /// Saves whatever subset of the edit was valid.
    pub fn edit_task(&self, id: u32, changes: &TaskEdit) -> CommandResult<EditReport> {
        let mut store = self.load_store()?;
        let report = store.edit_task(id, changes)?;
        if !report.applied.is_empty() {
            self.commit(&store)?;
        }
        Ok(report)
    }

    pub fn mark_done(&self, id: u32) -> CommandResult<Task> {
        let mut store = self.load_store()?;
        let task = store.mark_done(id)?;
        self.commit(&store)?;
        Ok(task)
    }

    pub fn delete_task(&self, id: u32) -> CommandResult<Task> {
        let mut store = self.load_store()?;
        let removed = store.delete_task(id)?;
        self.commit(&store)?;
        Ok(removed)
    }
}
