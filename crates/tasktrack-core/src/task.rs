use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High
}

impl Priority {
  pub const ALL: [Priority; 3] = [
    Priority::Low,
    Priority::Medium,
    Priority::High
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Low => "low",
      | Self::Medium => "medium",
      | Self::High => "high"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Low => "Low",
      | Self::Medium => "Medium",
      | Self::High => "High"
    }
  }

  /// Badge class used by the task card.
  pub fn badge_class(
    self
  ) -> &'static str {
    match self {
      | Self::Low => "priority-low",
      | Self::Medium => {
        "priority-medium"
      }
      | Self::High => "priority-high"
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Priority {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim() {
      | "low" => Ok(Self::Low),
      | "medium" => Ok(Self::Medium),
      | "high" => Ok(Self::High),
      | other => {
        Err(anyhow!(
          "unknown priority: {other}"
        ))
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub id:          Uuid,
  pub title:       String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub completed:   bool,
  #[serde(default)]
  pub priority:    Priority,
  pub category:    String,
  pub due_date:    NaiveDate,
  pub created_at:  DateTime<Utc>
}

impl Task {
  pub fn from_draft(
    draft: TaskDraft,
    now: DateTime<Utc>
  ) -> Self {
    Self {
      id:          Uuid::new_v4(),
      title:       draft.title,
      description: draft.description,
      completed:   false,
      priority:    draft.priority,
      category:    draft.category,
      due_date:    draft.due_date,
      created_at:  now
    }
  }

  /// Short US-style display of the due date, e.g. `Mar 1, 2024`.
  pub fn due_label(&self) -> String {
    self
      .due_date
      .format("%b %-d, %Y")
      .to_string()
  }
}

/// A validated task payload that has not been assigned an id yet.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct TaskDraft {
  pub title:       String,
  pub description: String,
  pub priority:    Priority,
  pub category:    String,
  pub due_date:    NaiveDate
}

/// Raw form fields as typed by the user.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct DraftInput {
  pub title:       String,
  pub description: String,
  pub priority:    String,
  pub category:    String,
  pub due_date:    String
}

impl DraftInput {
  /// Fresh form state: medium priority and the given default category.
  pub fn with_defaults(
    default_category: Option<&str>
  ) -> Self {
    Self {
      priority: Priority::default()
        .as_str()
        .to_string(),
      category: default_category
        .unwrap_or_default()
        .to_string(),
      ..Self::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    TimeZone,
    Utc
  };

  use super::*;

  fn draft() -> TaskDraft {
    TaskDraft {
      title:       "Pay bills"
        .to_string(),
      description: String::new(),
      priority:    Priority::High,
      category:    "2".to_string(),
      due_date:    NaiveDate::from_ymd_opt(
        2024, 3, 1
      )
      .unwrap()
    }
  }

  #[test]
  fn from_draft_starts_incomplete() {
    let now = Utc
      .with_ymd_and_hms(
        2024, 2, 20, 9, 30, 0
      )
      .unwrap();
    let task =
      Task::from_draft(draft(), now);

    assert!(!task.completed);
    assert_eq!(task.created_at, now);
    assert_eq!(task.category, "2");
    assert_eq!(task.due_label(), "Mar 1, 2024");
  }

  #[test]
  fn serializes_with_camel_case_fields()
  {
    let now = Utc
      .with_ymd_and_hms(
        2024, 2, 20, 9, 30, 0
      )
      .unwrap();
    let task =
      Task::from_draft(draft(), now);
    let value =
      serde_json::to_value(&task)
        .unwrap();

    assert_eq!(value["dueDate"], "2024-03-01");
    assert_eq!(value["priority"], "high");
    assert_eq!(value["completed"], false);
    assert!(
      value["createdAt"]
        .as_str()
        .unwrap()
        .starts_with("2024-02-20T09:30:00")
    );
  }

  #[test]
  fn reads_records_written_by_the_old_frontend()
   {
    let raw = r#"{
      "id": "0f8b7c2e-4a8e-4a55-9f57-3d8f2c3f0a11",
      "title": "Run",
      "description": "5k",
      "completed": true,
      "priority": "low",
      "category": "4",
      "dueDate": "2024-05-12",
      "createdAt": "2024-05-01T08:00:00.000Z"
    }"#;
    let task: Task =
      serde_json::from_str(raw).unwrap();

    assert!(task.completed);
    assert_eq!(task.priority, Priority::Low);
    assert_eq!(task.due_label(), "May 12, 2024");
  }

  #[test]
  fn priority_parses_form_values() {
    assert_eq!(
      "high".parse::<Priority>().unwrap(),
      Priority::High
    );
    assert!(
      "urgent".parse::<Priority>().is_err()
    );
    assert_eq!(
      DraftInput::with_defaults(Some("1"))
        .priority,
      "medium"
    );
  }
}
