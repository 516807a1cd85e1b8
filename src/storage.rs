// Manages the on-disk JSON task file.
//
// The file is a bare JSON array of task objects. It is always rewritten in
// full; there is no append or patch path.
use crate::context::AppContext;
use crate::model::Task;
use crate::model::validate::check_interval;
use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};

pub const TASKS_FILENAME: &str = "tasks.json";

/// Handle on one task file. `load` and `save` are its only I/O.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Task file inside the context's data directory.
    pub fn from_context(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self::new(ctx.get_tasks_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut ext = ext.to_os_string();
            ext.push(".lock");
            lock_path.set_extension(ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive advisory lock next to `file_path`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()
            .with_context(|| format!("Failed to lock {:?}", lock_path))?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write {:?}", tmp_path))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace {:?}", path))?;
        Ok(())
    }

    /// Reads the whole task set. A missing file is an empty set; an unreadable
    /// or malformed one is an error.
    pub fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            log::debug!("No task file at {:?}, starting empty", self.path);
            return Ok(vec![]);
        }
        let tasks = Self::with_lock(&self.path, || {
            let json = fs::read_to_string(&self.path)
                .with_context(|| format!("Failed to read task file {:?}", self.path))?;
            let tasks: Vec<Task> = serde_json::from_str(&json)
                .with_context(|| format!("Task file {:?} is corrupt", self.path))?;
            for task in &tasks {
                check_interval(task.start_time, task.end_time).with_context(|| {
                    format!("Task file {:?} is corrupt at task #{}", self.path, task.id)
                })?;
            }
            Ok(tasks)
        })?;
        log::debug!("Loaded {} task(s) from {:?}", tasks.len(), self.path);
        Ok(tasks)
    }

    /// Replaces the file with exactly `tasks`, in order.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        Self::with_lock(&self.path, || {
            let json = serde_json::to_string_pretty(tasks)?;
            Self::atomic_write(&self.path, json)
        })?;
        log::debug!("Saved {} task(s) to {:?}", tasks.len(), self.path);
        Ok(())
    }
}
