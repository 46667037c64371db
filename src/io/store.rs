use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::host::{RemoteStore, TaskRow};
use crate::model::TaskId;

/// Save task rows to a JSON file.
pub fn save_rows(rows: &[TaskRow], path: &Path) -> Result<(), String> {
    write_rows(rows, path).map_err(|e| e.to_string())
}

/// Load task rows from a JSON file.
pub fn load_rows(path: &Path) -> Result<Vec<TaskRow>, String> {
    read_rows(path).map_err(|e| e.to_string())
}

fn write_rows(rows: &[TaskRow], path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<TaskRow>, StoreError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn replace_periods(
    rows: &mut [TaskRow],
    task: TaskId,
    blob: Option<String>,
) -> Result<(), StoreError> {
    let row = rows
        .iter_mut()
        .find(|r| r.id == task)
        .ok_or(StoreError::MissingRow(task))?;
    row.periods = blob;
    Ok(())
}

/// Store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<TaskRow>,
    offline: bool,
}

impl MemoryStore {
    pub fn new(rows: Vec<TaskRow>) -> Self {
        Self {
            rows,
            offline: false,
        }
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// While offline every call fails with an I/O error.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "store is offline",
            )));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn load_rows(&self) -> Result<Vec<TaskRow>, StoreError> {
        self.check_online()?;
        Ok(self.rows.clone())
    }

    fn save_periods(&mut self, task: TaskId, blob: Option<String>) -> Result<(), StoreError> {
        self.check_online()?;
        replace_periods(&mut self.rows, task, blob)
    }
}

/// Store backed by one JSON document of task rows.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RemoteStore for FileStore {
    fn load_rows(&self) -> Result<Vec<TaskRow>, StoreError> {
        read_rows(&self.path)
    }

    fn save_periods(&mut self, task: TaskId, blob: Option<String>) -> Result<(), StoreError> {
        let mut rows = read_rows(&self.path)?;
        replace_periods(&mut rows, task, blob)?;
        write_rows(&rows, &self.path)
    }
}
