use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{StoreError, StoreResult};
use crate::models::{ChatMessage, NewTask, Task, TaskPatch, User};

const TASKS_FILE: &str = "tasks.json";
const CHAT_FILE: &str = "chat.json";
const USER_FILE: &str = "user.json";

/// JSON file store for tasks, the coach transcript and the local profile.
///
/// Every task operation is scoped by owner: tasks belonging to someone else
/// behave as if they did not exist.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Store> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Store { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Loads every task regardless of owner.
    pub fn load_all_tasks(&self) -> StoreResult<Vec<Task>> {
        read_json(&self.path(TASKS_FILE))
    }

    /// Overwrites the tasks file.
    pub fn save_all_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        write_json(&self.path(TASKS_FILE), tasks)
    }

    /// Lists the tasks owned by `owner`, in insertion order.
    pub fn list(&self, owner: &str) -> StoreResult<Vec<Task>> {
        let mut tasks = self.load_all_tasks()?;
        tasks.retain(|t| t.user_id == owner);
        Ok(tasks)
    }

    /// Loads a single task by its ID.
    pub fn get(&self, owner: &str, id: u64) -> StoreResult<Task> {
        self.list(owner)?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Creates a task; the store assigns id, owner and creation time.
    pub fn create(&self, owner: &str, new: NewTask) -> StoreResult<Task> {
        let mut tasks = self.load_all_tasks()?;
        let task = Task {
            id: next_id(&tasks),
            user_id: owner.to_string(),
            title: new.title,
            category: new.category,
            priority: new.priority,
            due_date: new.due_date,
            time_slot: new.time_slot,
            completed: false,
            created_at: Local::now().to_rfc3339(),
        };
        tasks.push(task.clone());
        self.save_all_tasks(&tasks)?;
        debug!(id = task.id, owner, "task created");
        Ok(task)
    }

    /// Applies `patch` to the task and returns the updated record.
    pub fn update(&self, owner: &str, id: u64, patch: TaskPatch) -> StoreResult<Task> {
        self.modify(owner, id, |t| {
            if let Some(title) = patch.title {
                t.title = title;
            }
            if let Some(c) = patch.category {
                t.category = c;
            }
            if let Some(p) = patch.priority {
                t.priority = p;
            }
            if let Some(d) = patch.due_date {
                t.due_date = d;
            }
            if let Some(slot) = patch.time_slot {
                t.time_slot = slot;
            }
        })
    }

    /// Flips the completion status.
    pub fn toggle(&self, owner: &str, id: u64) -> StoreResult<Task> {
        self.modify(owner, id, |t| t.completed = !t.completed)
    }

    /// Removes a task and returns it.
    pub fn delete(&self, owner: &str, id: u64) -> StoreResult<Task> {
        let mut tasks = self.load_all_tasks()?;
        let pos = tasks
            .iter()
            .position(|t| t.id == id && t.user_id == owner)
            .ok_or_else(|| not_found(id))?;
        let removed = tasks.remove(pos);
        self.save_all_tasks(&tasks)?;
        debug!(id, owner, "task deleted");
        Ok(removed)
    }

    /// Adds externally produced tasks under `owner`, renumbering them.
    ///
    /// Returns the number of tasks imported.
    pub fn import(&self, owner: &str, incoming: Vec<Task>) -> StoreResult<usize> {
        let mut tasks = self.load_all_tasks()?;
        let count = incoming.len();
        for mut t in incoming {
            t.id = next_id(&tasks);
            t.user_id = owner.to_string();
            tasks.push(t);
        }
        self.save_all_tasks(&tasks)?;
        debug!(count, owner, "tasks imported");
        Ok(count)
    }

    fn modify<F>(&self, owner: &str, id: u64, f: F) -> StoreResult<Task>
    where
        F: FnOnce(&mut Task),
    {
        let mut tasks = self.load_all_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
            .ok_or_else(|| not_found(id))?;
        f(task);
        let updated = task.clone();
        self.save_all_tasks(&tasks)?;
        debug!(id, owner, "task updated");
        Ok(updated)
    }

    /// Loads the coach transcript.
    pub fn load_chat(&self) -> StoreResult<Vec<ChatMessage>> {
        read_json(&self.path(CHAT_FILE))
    }

    pub fn save_chat(&self, messages: &[ChatMessage]) -> StoreResult<()> {
        write_json(&self.path(CHAT_FILE), messages)
    }

    pub fn clear_chat(&self) -> StoreResult<()> {
        remove_if_exists(&self.path(CHAT_FILE))
    }

    /// Loads the local profile, if one was created.
    pub fn load_user(&self) -> StoreResult<Option<User>> {
        read_json_opt(&self.path(USER_FILE))
    }

    pub fn save_user(&self, user: &User) -> StoreResult<()> {
        write_json(&self.path(USER_FILE), user)
    }

    pub fn clear_user(&self) -> StoreResult<()> {
        remove_if_exists(&self.path(USER_FILE))
    }

    /// Deletes every data file.
    pub fn reset(&self) -> StoreResult<()> {
        for file in [TASKS_FILE, CHAT_FILE, USER_FILE] {
            remove_if_exists(&self.path(file))?;
        }
        Ok(())
    }
}

fn next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

fn not_found(id: u64) -> StoreError {
    warn!(id, "task not found");
    StoreError::TaskNotFound { id }
}

/// Reads a JSON file. A missing file yields `T::default()`.
fn read_json<T>(path: &Path) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    Ok(read_json_opt(path)?.unwrap_or_default())
}

fn read_json_opt<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    debug!(path = %path.display(), "loaded data file");
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let s = serde_json::to_string_pretty(value).map_err(StoreError::Serialize)?;
    fs::write(path, s).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn remove_if_exists(path: &Path) -> StoreResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
