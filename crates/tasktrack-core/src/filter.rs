use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::task::Task;

pub const EMPTY_STATE_HEADING: &str =
  "No tasks found";

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum StatusFilter {
  #[default]
  All,
  Active,
  Completed
}

impl StatusFilter {
  pub const ALL: [StatusFilter; 3] = [
    StatusFilter::All,
    StatusFilter::Active,
    StatusFilter::Completed
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Active => "active",
      | Self::Completed => "completed"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::All => "All",
      | Self::Active => "Active",
      | Self::Completed => "Completed"
    }
  }

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Active => !task.completed,
      | Self::Completed => task.completed
    }
  }

  /// Message shown under the empty-state heading.
  pub fn empty_message(
    self
  ) -> &'static str {
    match self {
      | Self::All => {
        "You haven't created any tasks \
         yet"
      }
      | Self::Active => "No active tasks",
      | Self::Completed => {
        "No completed tasks"
      }
    }
  }
}

impl fmt::Display for StatusFilter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for StatusFilter {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim() {
      | "all" => Ok(Self::All),
      | "active" => Ok(Self::Active),
      | "completed" => {
        Ok(Self::Completed)
      }
      | other => {
        Err(anyhow!(
          "unknown status filter: \
           {other}"
        ))
      }
    }
  }
}

/// Either the `all` sentinel or one category id.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub enum CategoryFilter {
  #[default]
  All,
  Id(String)
}

impl CategoryFilter {
  pub const ALL_VALUE: &'static str =
    "all";

  /// Maps a category `<select>` value back to a filter.
  pub fn from_value(
    value: &str
  ) -> Self {
    let value = value.trim();
    if value.is_empty()
      || value == Self::ALL_VALUE
    {
      Self::All
    } else {
      Self::Id(value.to_string())
    }
  }

  pub fn value(&self) -> &str {
    match self {
      | Self::All => Self::ALL_VALUE,
      | Self::Id(id) => id
    }
  }

  pub fn matches(
    &self,
    task: &Task
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Id(id) => {
        task.category == *id
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct StatusCounts {
  pub all:       usize,
  pub active:    usize,
  pub completed: usize
}

impl StatusCounts {
  pub fn get(
    &self,
    filter: StatusFilter
  ) -> usize {
    match filter {
      | StatusFilter::All => self.all,
      | StatusFilter::Active => {
        self.active
      }
      | StatusFilter::Completed => {
        self.completed
      }
    }
  }
}

/// Tasks passing both filters, in repository order.
pub fn visible<'a>(
  tasks: &'a [Task],
  status: StatusFilter,
  category: &CategoryFilter
) -> Vec<&'a Task> {
  tasks
    .iter()
    .filter(|task| {
      status.matches(task)
        && category.matches(task)
    })
    .collect()
}

pub fn counts(
  tasks: &[Task]
) -> StatusCounts {
  let completed = tasks
    .iter()
    .filter(|task| task.completed)
    .count();
  StatusCounts {
    all: tasks.len(),
    active: tasks.len() - completed,
    completed
  }
}
