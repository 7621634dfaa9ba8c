use chrono::{
  DateTime,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  warn
};
use uuid::Uuid;

use crate::storage::{
  self,
  Storage
};
use crate::task::{
  Task,
  TaskDraft
};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted form of the task list.
#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskSnapshot {
  pub version: u32,
  pub tasks:   Vec<Task>
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredTasks {
  Versioned(TaskSnapshot),
  Legacy(Vec<Task>)
}

/// Ordered in-memory task list.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct TaskRepository {
  tasks: Vec<Task>
}

impl TaskRepository {
  pub fn new(tasks: Vec<Task>) -> Self {
    Self {
      tasks
    }
  }

  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  pub fn get(
    &self,
    id: Uuid
  ) -> Option<&Task> {
    self
      .tasks
      .iter()
      .find(|task| task.id == id)
  }

  pub fn create(
    &mut self,
    draft: TaskDraft,
    now: DateTime<Utc>
  ) -> &Task {
    let mut task =
      Task::from_draft(draft, now);
    while self.get(task.id).is_some() {
      task.id = Uuid::new_v4();
    }
    debug!(id = %task.id, title = %task.title, "created task");
    let idx = self.tasks.len();
    self.tasks.push(task);
    &self.tasks[idx]
  }

  /// Flips `completed`; returns whether a task matched.
  pub fn toggle(
    &mut self,
    id: Uuid
  ) -> bool {
    match self
      .tasks
      .iter_mut()
      .find(|task| task.id == id)
    {
      | Some(task) => {
        task.completed = !task.completed;
        debug!(
          %id,
          completed = task.completed,
          "toggled task"
        );
        true
      }
      | None => {
        debug!(%id, "toggle: no such task");
        false
      }
    }
  }

  /// Removes the task with `id`; returns whether a task matched.
  pub fn delete(
    &mut self,
    id: Uuid
  ) -> bool {
    let before = self.tasks.len();
    self
      .tasks
      .retain(|task| task.id != id);
    let removed =
      self.tasks.len() != before;
    debug!(%id, removed, "delete task");
    removed
  }

  #[tracing::instrument(skip(storage))]
  pub fn load<S>(
    storage: &S,
    key: &str
  ) -> Self
  where
    S: Storage + ?Sized
  {
    let stored: Option<StoredTasks> =
      storage::load(storage, key, None);

    let tasks = match stored {
      | None => Vec::new(),
      | Some(StoredTasks::Legacy(
        tasks
      )) => {
        debug!(
          count = tasks.len(),
          "loaded unversioned task list"
        );
        tasks
      }
      | Some(StoredTasks::Versioned(
        snapshot
      )) if snapshot.version
        > SNAPSHOT_VERSION =>
      {
        warn!(
          version = snapshot.version,
          supported = SNAPSHOT_VERSION,
          "stored task list is from a \
           newer version; starting empty"
        );
        Vec::new()
      }
      | Some(StoredTasks::Versioned(
        snapshot
      )) => snapshot.tasks
    };

    Self::new(tasks)
  }

  #[tracing::instrument(skip(
    self, storage
  ), fields(count = self.tasks.len()))]
  pub fn save<S>(
    &self,
    storage: &mut S,
    key: &str
  ) -> anyhow::Result<()>
  where
    S: Storage + ?Sized
  {
    let snapshot = TaskSnapshot {
      version: SNAPSHOT_VERSION,
      tasks:   self.tasks.clone()
    };
    storage::save(storage, key, &snapshot)
  }
}
