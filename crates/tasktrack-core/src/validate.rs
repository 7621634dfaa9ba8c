use std::fmt;

use chrono::NaiveDate;

use crate::category::CategoryRegistry;
use crate::task::{
  DraftInput,
  Priority,
  TaskDraft
};

pub const DUE_DATE_FORMAT: &str =
  "%Y-%m-%d";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub enum Field {
  Title,
  Priority,
  Category,
  DueDate
}

impl Field {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Title => "title",
      | Self::Priority => "priority",
      | Self::Category => "category",
      | Self::DueDate => "due date"
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum FieldError {
  Required,
  InvalidDate(String),
  UnknownPriority(String),
  UnknownCategory(String),
  NoCategoriesConfigured
}

impl fmt::Display for FieldError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Self::Required => {
        f.write_str("is required")
      }
      | Self::InvalidDate(raw) => {
        write!(
          f,
          "'{raw}' is not a date \
           (expected YYYY-MM-DD)"
        )
      }
      | Self::UnknownPriority(raw) => {
        write!(
          f,
          "'{raw}' is not a priority"
        )
      }
      | Self::UnknownCategory(raw) => {
        write!(
          f,
          "'{raw}' is not a known \
           category"
        )
      }
      | Self::NoCategoriesConfigured => {
        f.write_str(
          "cannot be chosen: no \
           categories configured"
        )
      }
    }
  }
}

/// Every problem found in one form submission.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct ValidationErrors {
  errors: Vec<(Field, FieldError)>
}

impl ValidationErrors {
  fn push(
    &mut self,
    field: Field,
    error: FieldError
  ) {
    self.errors.push((field, error));
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn len(&self) -> usize {
    self.errors.len()
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = &(Field, FieldError)>
  {
    self.errors.iter()
  }

  pub fn get(
    &self,
    field: Field
  ) -> Option<&FieldError> {
    self
      .errors
      .iter()
      .find(|(f, _)| *f == field)
      .map(|(_, error)| error)
  }

  pub fn has(
    &self,
    field: Field
  ) -> bool {
    self.get(field).is_some()
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    for (idx, (field, error)) in
      self.errors.iter().enumerate()
    {
      if idx > 0 {
        f.write_str("; ")?;
      }
      write!(
        f,
        "{} {error}",
        field.as_str()
      )?;
    }
    Ok(())
  }
}

impl std::error::Error
  for ValidationErrors
{
}

/// Checks raw form input and builds a draft from it.
#[tracing::instrument(skip_all)]
pub fn validate_draft(
  input: &DraftInput,
  registry: &CategoryRegistry
) -> Result<TaskDraft, ValidationErrors>
{
  let mut errors =
    ValidationErrors::default();

  let title = input.title.trim();
  if title.is_empty() {
    errors.push(
      Field::Title,
      FieldError::Required
    );
  }

  let priority = match input
    .priority
    .trim()
  {
    | "" => Some(Priority::default()),
    | raw => {
      match raw.parse::<Priority>() {
        | Ok(priority) => Some(priority),
        | Err(_) => {
          errors.push(
            Field::Priority,
            FieldError::UnknownPriority(
              raw.to_string()
            )
          );
          None
        }
      }
    }
  };

  let category = input.category.trim();
  if registry.is_empty() {
    errors.push(
      Field::Category,
      FieldError::NoCategoriesConfigured
    );
  } else if category.is_empty() {
    errors.push(
      Field::Category,
      FieldError::Required
    );
  } else if !registry.contains(category)
  {
    errors.push(
      Field::Category,
      FieldError::UnknownCategory(
        category.to_string()
      )
    );
  }

  let due_raw = input.due_date.trim();
  let due_date = if due_raw.is_empty() {
    errors.push(
      Field::DueDate,
      FieldError::Required
    );
    None
  } else {
    match NaiveDate::parse_from_str(
      due_raw,
      DUE_DATE_FORMAT
    ) {
      | Ok(date) => Some(date),
      | Err(_) => {
        errors.push(
          Field::DueDate,
          FieldError::InvalidDate(
            due_raw.to_string()
          )
        );
        None
      }
    }
  };

  match (priority, due_date) {
    | (Some(priority), Some(due_date))
      if errors.is_empty() =>
    {
      Ok(TaskDraft {
        title: title.to_string(),
        description: input
          .description
          .clone(),
        priority,
        category: category.to_string(),
        due_date
      })
    }
    | _ => {
      tracing::debug!(
        count = errors.len(),
        %errors,
        "draft rejected"
      );
      Err(errors)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::category::Category;

  fn input() -> DraftInput {
    DraftInput {
      title:       "Pay bills"
        .to_string(),
      description: "electricity  \n"
        .to_string(),
      priority:    "high".to_string(),
      category:    "2".to_string(),
      due_date:    "2024-03-01"
        .to_string()
    }
  }

  #[test]
  fn accepts_complete_input() {
    let draft = validate_draft(
      &input(),
      &CategoryRegistry::default()
    )
    .unwrap();

    assert_eq!(draft.title, "Pay bills");
    assert_eq!(
      draft.description,
      "electricity  \n"
    );
    assert_eq!(draft.priority, Priority::High);
    assert_eq!(
      draft.due_date,
      NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
    );
  }

  #[test]
  fn blank_title_and_missing_date_are_both_reported()
   {
    let mut raw = input();
    raw.title = "   ".to_string();
    raw.due_date.clear();

    let errors = validate_draft(
      &raw,
      &CategoryRegistry::default()
    )
    .unwrap_err();

    assert_eq!(errors.len(), 2);
    assert_eq!(
      errors.get(Field::Title),
      Some(&FieldError::Required)
    );
    assert_eq!(
      errors.get(Field::DueDate),
      Some(&FieldError::Required)
    );
    assert_eq!(
      errors.to_string(),
      "title is required; due date is \
       required"
    );
  }

  #[test]
  fn malformed_date_is_rejected() {
    let mut raw = input();
    raw.due_date = "03/01/2024".to_string();

    let errors = validate_draft(
      &raw,
      &CategoryRegistry::default()
    )
    .unwrap_err();
    assert!(matches!(
      errors.get(Field::DueDate),
      Some(FieldError::InvalidDate(_))
    ));
  }

  #[test]
  fn empty_registry_blocks_submission() {
    let mut raw = input();
    raw.category.clear();

    let errors = validate_draft(
      &raw,
      &CategoryRegistry::new(vec![])
    )
    .unwrap_err();
    assert_eq!(
      errors.get(Field::Category),
      Some(
        &FieldError::NoCategoriesConfigured
      )
    );
  }

  #[test]
  fn category_must_be_registered() {
    let registry =
      CategoryRegistry::new(vec![
        Category {
          id:    "1".to_string(),
          name:  "Home".to_string(),
          color: "#000000".to_string()
        },
      ]);

    let errors =
      validate_draft(&input(), &registry)
        .unwrap_err();
    assert_eq!(
      errors.get(Field::Category),
      Some(&FieldError::UnknownCategory(
        "2".to_string()
      ))
    );
    assert!(!errors.has(Field::Title));
  }

  #[test]
  fn blank_priority_falls_back_to_medium()
  {
    let mut raw = input();
    raw.priority.clear();
    let draft = validate_draft(
      &raw,
      &CategoryRegistry::default()
    )
    .unwrap();
    assert_eq!(draft.priority, Priority::Medium);

    raw.priority = "urgent".to_string();
    assert!(
      validate_draft(
        &raw,
        &CategoryRegistry::default()
      )
      .unwrap_err()
      .has(Field::Priority)
    );
  }
}
