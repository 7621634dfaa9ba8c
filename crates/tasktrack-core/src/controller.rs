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
  error,
  info
};
use uuid::Uuid;

use crate::category::CategoryRegistry;
use crate::config::{
  StorageKeys,
  TrackerConfig
};
use crate::filter::{
  self,
  CategoryFilter,
  StatusCounts,
  StatusFilter
};
use crate::repository::TaskRepository;
use crate::storage::{
  self,
  Storage
};
use crate::task::{
  DraftInput,
  Task,
  TaskDraft
};
use crate::validate::{
  ValidationErrors,
  validate_draft
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark
}

impl Theme {
  pub fn as_class(self) -> &'static str {
    match self {
      | Self::Light => "theme-light",
      | Self::Dark => "theme-dark"
    }
  }

  pub fn next(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Light
    }
  }

  pub fn toggle_label(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "Dark Mode",
      | Self::Dark => "Light Mode"
    }
  }
}

/// State of the "add task" modal.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub enum AddFlow {
  #[default]
  Closed,
  Open {
    errors: ValidationErrors
  }
}

impl AddFlow {
  pub fn is_open(&self) -> bool {
    matches!(self, Self::Open { .. })
  }

  pub fn errors(
    &self
  ) -> Option<&ValidationErrors> {
    match self {
      | Self::Open {
        errors
      } if !errors.is_empty() => {
        Some(errors)
      }
      | _ => None
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum Action {
  Submit(DraftInput, DateTime<Utc>),
  Toggle(Uuid),
  Delete(Uuid),
  SetStatusFilter(StatusFilter),
  SetCategoryFilter(CategoryFilter),
  OpenForm,
  CloseForm,
  ToggleTheme,
  DismissError
}

/// Owns the task list and all view state. The methods below are the
/// only way to change either; every task mutation is written through
/// to the storage port before returning.
#[derive(Debug, Clone)]
pub struct Tracker<S> {
  storage:         S,
  keys:            StorageKeys,
  repo:            TaskRepository,
  categories:      CategoryRegistry,
  status_filter:   StatusFilter,
  category_filter: CategoryFilter,
  add_flow:        AddFlow,
  theme:           Theme,
  tasks_error:     Option<String>,
  theme_error:     Option<String>
}

#[derive(Debug, Clone, Copy)]
enum Slot {
  Tasks,
  Theme
}

fn has_value<S>(
  storage: &S,
  key: &str
) -> bool
where
  S: Storage + ?Sized
{
  matches!(storage.read(key), Ok(Some(_)))
}

impl<S: Storage> Tracker<S> {
  #[tracing::instrument(skip_all)]
  pub fn open(
    storage: S,
    config: &TrackerConfig
  ) -> Self {
    let keys = config.storage.clone();
    let legacy = &keys.legacy_tasks_key;
    let migrate = !legacy.is_empty()
      && *legacy != keys.tasks_key
      && !has_value(&storage, &keys.tasks_key)
      && has_value(&storage, legacy);
    let repo = if migrate {
      info!(
        from = %legacy,
        to = %keys.tasks_key,
        "migrating task list from legacy \
         slot"
      );
      TaskRepository::load(&storage, legacy)
    } else {
      TaskRepository::load(
        &storage,
        &keys.tasks_key
      )
    };
    let theme = storage::load(
      &storage,
      &keys.theme_key,
      config.default_theme
    );

    info!(
      tasks = repo.len(),
      categories = config.categories.len(),
      ?theme,
      "opened tracker"
    );

    let mut tracker = Self {
      storage,
      keys,
      repo,
      categories: config.registry(),
      status_filter: StatusFilter::default(),
      category_filter:
        CategoryFilter::default(),
      add_flow: AddFlow::default(),
      theme,
      tasks_error: None,
      theme_error: None
    };
    if migrate && !tracker.repo.is_empty() {
      tracker.persist_tasks();
    }
    tracker
  }

  pub fn tasks(&self) -> &[Task] {
    self.repo.tasks()
  }

  pub fn categories(
    &self
  ) -> &CategoryRegistry {
    &self.categories
  }

  pub fn status_filter(
    &self
  ) -> StatusFilter {
    self.status_filter
  }

  pub fn category_filter(
    &self
  ) -> &CategoryFilter {
    &self.category_filter
  }

  pub fn add_flow(&self) -> &AddFlow {
    &self.add_flow
  }

  pub fn theme(&self) -> Theme {
    self.theme
  }

  pub fn persist_error(
    &self
  ) -> Option<&str> {
    self
      .tasks_error
      .as_deref()
      .or(self.theme_error.as_deref())
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  pub fn visible(&self) -> Vec<&Task> {
    filter::visible(
      self.repo.tasks(),
      self.status_filter,
      &self.category_filter
    )
  }

  pub fn counts(&self) -> StatusCounts {
    filter::counts(self.repo.tasks())
  }

  #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
  pub fn create(
    &mut self,
    draft: TaskDraft,
    now: DateTime<Utc>
  ) -> Uuid {
    let id = self.repo.create(draft, now).id;
    self.persist_tasks();
    id
  }

  /// Validates form input and creates the task. On failure the form
  /// stays open with the errors attached.
  #[tracing::instrument(skip(self, input))]
  pub fn submit(
    &mut self,
    input: &DraftInput,
    now: DateTime<Utc>
  ) -> Result<Uuid, ValidationErrors> {
    match validate_draft(
      input,
      &self.categories
    ) {
      | Ok(draft) => {
        let id = self.create(draft, now);
        self.add_flow = AddFlow::Closed;
        Ok(id)
      }
      | Err(errors) => {
        self.add_flow = AddFlow::Open {
          errors: errors.clone()
        };
        Err(errors)
      }
    }
  }

  #[tracing::instrument(skip(self))]
  pub fn toggle(&mut self, id: Uuid) -> bool {
    let changed = self.repo.toggle(id);
    if changed {
      self.persist_tasks();
    }
    changed
  }

  #[tracing::instrument(skip(self))]
  pub fn delete(&mut self, id: Uuid) -> bool {
    let changed = self.repo.delete(id);
    if changed {
      self.persist_tasks();
    }
    changed
  }

  pub fn set_status_filter(
    &mut self,
    status: StatusFilter
  ) {
    debug!(%status, "status filter");
    self.status_filter = status;
  }

  pub fn set_category_filter(
    &mut self,
    category: CategoryFilter
  ) {
    debug!(
      category = category.value(),
      "category filter"
    );
    self.category_filter = category;
  }

  pub fn open_form(&mut self) {
    self.add_flow = AddFlow::Open {
      errors: ValidationErrors::default()
    };
  }

  pub fn close_form(&mut self) {
    self.add_flow = AddFlow::Closed;
  }

  pub fn toggle_theme(&mut self) -> Theme {
    self.theme = self.theme.next();
    let result = storage::save(
      &mut self.storage,
      &self.keys.theme_key,
      &self.theme
    );
    self.record_persist(Slot::Theme, result);
    self.theme
  }

  pub fn dismiss_error(&mut self) {
    self.tasks_error = None;
    self.theme_error = None;
  }

  pub fn dispatch(
    &mut self,
    action: Action
  ) {
    match action {
      | Action::Submit(input, now) => {
        let _ = self.submit(&input, now);
      }
      | Action::Toggle(id) => {
        self.toggle(id);
      }
      | Action::Delete(id) => {
        self.delete(id);
      }
      | Action::SetStatusFilter(
        status
      ) => self.set_status_filter(status),
      | Action::SetCategoryFilter(
        category
      ) => {
        self.set_category_filter(category)
      }
      | Action::OpenForm => {
        self.open_form()
      }
      | Action::CloseForm => {
        self.close_form()
      }
      | Action::ToggleTheme => {
        self.toggle_theme();
      }
      | Action::DismissError => {
        self.dismiss_error()
      }
    }
  }

  fn persist_tasks(&mut self) {
    let result = self.repo.save(
      &mut self.storage,
      &self.keys.tasks_key
    );
    self.record_persist(Slot::Tasks, result);
  }

  /// A success only clears the error of the slot it wrote; an older
  /// task-save failure stays visible after the theme saves fine.
  fn record_persist(
    &mut self,
    slot: Slot,
    result: anyhow::Result<()>
  ) {
    let outcome = match result {
      | Ok(()) => None,
      | Err(err) => {
        let detail = format!("{err:#}");
        error!(
          error = %detail,
          ?slot,
          "failed to persist tracker \
           state"
        );
        Some(detail)
      }
    };
    match slot {
      | Slot::Tasks => {
        self.tasks_error = outcome
      }
      | Slot::Theme => {
        self.theme_error = outcome
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use anyhow::anyhow;
  use chrono::TimeZone;

  use super::*;
  use crate::storage::MemoryStorage;
  use crate::validate::Field;

  fn now() -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(
        2024, 2, 20, 9, 30, 0
      )
      .unwrap()
  }

  fn input(
    title: &str,
    category: &str
  ) -> DraftInput {
    DraftInput {
      title:       title.to_string(),
      description: String::new(),
      priority:    "high".to_string(),
      category:    category.to_string(),
      due_date:    "2024-03-01"
        .to_string()
    }
  }

  fn tracker() -> Tracker<MemoryStorage> {
    Tracker::open(
      MemoryStorage::new(),
      &TrackerConfig::default()
    )
  }

  #[derive(Debug, Clone, Default)]
  struct FailingStorage;

  impl Storage for FailingStorage {
    fn read(
      &self,
      _key: &str
    ) -> anyhow::Result<Option<String>>
    {
      Ok(None)
    }

    fn write(
      &mut self,
      key: &str,
      _value: &str
    ) -> anyhow::Result<()> {
      Err(anyhow!("quota exceeded for {key}"))
    }
  }

  #[test]
  fn add_flow_opens_and_closes() {
    let mut t = tracker();
    assert!(!t.add_flow().is_open());

    t.dispatch(Action::OpenForm);
    assert!(t.add_flow().is_open());
    assert!(t.add_flow().errors().is_none());

    t.dispatch(Action::CloseForm);
    assert_eq!(t.add_flow(), &AddFlow::Closed);
    assert!(t.tasks().is_empty());
  }

  #[test]
  fn invalid_submit_keeps_form_open() {
    let mut t = tracker();
    t.dispatch(Action::OpenForm);
    t.dispatch(Action::Submit(
      input("", "2"),
      now()
    ));

    assert!(t.tasks().is_empty());
    let errors =
      t.add_flow().errors().unwrap();
    assert!(errors.has(Field::Title));
    assert!(
      t.storage()
        .get("tasktrack.tasks")
        .is_none()
    );
  }

  #[test]
  fn valid_submit_creates_persists_and_closes()
   {
    let mut t = tracker();
    t.dispatch(Action::OpenForm);
    let id = t
      .submit(&input("Pay bills", "2"), now())
      .unwrap();

    assert_eq!(t.add_flow(), &AddFlow::Closed);
    assert_eq!(t.tasks().len(), 1);
    let task = &t.tasks()[0];
    assert_eq!(task.id, id);
    assert!(!task.completed);
    assert_eq!(task.created_at, now());
    assert_eq!(t.visible().len(), 1);
    assert!(
      t.storage()
        .get("tasktrack.tasks")
        .unwrap()
        .contains("Pay bills")
    );
  }

  #[test]
  fn reopen_restores_tasks_and_theme() {
    let mut t = tracker();
    let a = t
      .submit(&input("a", "1"), now())
      .unwrap();
    t.submit(&input("b", "2"), now())
      .unwrap();
    t.dispatch(Action::Toggle(a));
    t.dispatch(Action::ToggleTheme);

    let reopened = Tracker::open(
      t.storage().clone(),
      &TrackerConfig::default()
    );
    assert_eq!(reopened.tasks(), t.tasks());
    assert_eq!(reopened.theme(), Theme::Dark);
    assert_eq!(
      reopened.status_filter(),
      StatusFilter::All
    );
  }

  #[test]
  fn filters_drive_visible_set() {
    let mut t = tracker();
    let first = t
      .submit(&input("first", "1"), now())
      .unwrap();
    t.submit(&input("second", "2"), now())
      .unwrap();

    t.dispatch(Action::SetCategoryFilter(
      CategoryFilter::Id("1".to_string())
    ));
    let ids: Vec<Uuid> = t
      .visible()
      .iter()
      .map(|task| task.id)
      .collect();
    assert_eq!(ids, vec![first]);

    t.dispatch(Action::SetCategoryFilter(
      CategoryFilter::All
    ));
    t.dispatch(Action::Toggle(first));
    t.dispatch(Action::SetStatusFilter(
      StatusFilter::Active
    ));
    assert_eq!(t.visible().len(), 1);
    assert_eq!(t.visible()[0].title, "second");
    assert_eq!(t.counts().completed, 1);
  }

  #[test]
  fn missing_ids_do_not_touch_storage() {
    let mut t = tracker();
    assert!(!t.toggle(Uuid::new_v4()));
    assert!(!t.delete(Uuid::new_v4()));
    assert!(
      t.storage()
        .get("tasktrack.tasks")
        .is_none()
    );
  }

  #[test]
  fn write_failure_is_surfaced_not_fatal() {
    let mut t = Tracker::open(
      FailingStorage,
      &TrackerConfig::default()
    );
    let id = t.create(
      TaskDraft {
        title:       "x".to_string(),
        description: String::new(),
        priority:    Default::default(),
        category:    "1".to_string(),
        due_date:    now().date_naive()
      },
      now()
    );

    assert!(t.tasks().iter().any(|task| task.id == id));
    assert!(
      t.persist_error()
        .unwrap()
        .contains("quota exceeded")
    );

    t.dispatch(Action::DismissError);
    assert!(t.persist_error().is_none());
  }

  /// Fails only for `key`; everything else lands in memory.
  #[derive(Debug, Clone, Default)]
  struct FailingKey {
    key:   String,
    inner: MemoryStorage
  }

  impl Storage for FailingKey {
    fn read(
      &self,
      key: &str
    ) -> anyhow::Result<Option<String>>
    {
      self.inner.read(key)
    }

    fn write(
      &mut self,
      key: &str,
      value: &str
    ) -> anyhow::Result<()> {
      if key == self.key {
        return Err(anyhow!(
          "quota exceeded for {key}"
        ));
      }
      self.inner.write(key, value)
    }
  }

  const LEGACY_ARRAY: &str = r#"[{"id":"0f8b7c2e-4a8e-4a55-9f57-3d8f2c3f0a11","title":"Run","description":"","completed":true,"priority":"medium","category":"4","dueDate":"2024-05-12","createdAt":"2024-05-01T08:00:00.000Z"}]"#;

  #[test]
  fn legacy_tasks_slot_is_read_and_migrated()
   {
    let mut storage = MemoryStorage::new();
    storage.insert("tasks", LEGACY_ARRAY);

    let t = Tracker::open(
      storage,
      &TrackerConfig::embedded()
    );
    assert_eq!(t.tasks().len(), 1);
    assert_eq!(t.tasks()[0].title, "Run");
    assert!(t.tasks()[0].completed);
    assert!(t.persist_error().is_none());

    let migrated = t
      .storage()
      .get("tasktrack.tasks")
      .unwrap();
    assert!(
      migrated.starts_with(r#"{"version":1"#)
    );
    assert_eq!(
      t.storage().get("tasks"),
      Some(LEGACY_ARRAY)
    );

    let reopened = Tracker::open(
      t.storage().clone(),
      &TrackerConfig::embedded()
    );
    assert_eq!(reopened.tasks(), t.tasks());
  }

  #[test]
  fn current_slot_wins_over_legacy_slot() {
    let mut t = tracker();
    t.submit(&input("fresh", "1"), now())
      .unwrap();
    let mut storage = t.storage().clone();
    storage.insert("tasks", LEGACY_ARRAY);

    let reopened = Tracker::open(
      storage,
      &TrackerConfig::default()
    );
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(
      reopened.tasks()[0].title,
      "fresh"
    );
  }

  #[test]
  fn theme_save_keeps_task_save_error() {
    let storage = FailingKey {
      key:   "tasktrack.tasks".to_string(),
      inner: MemoryStorage::new()
    };
    let mut t = Tracker::open(
      storage,
      &TrackerConfig::default()
    );
    t.submit(&input("kept", "2"), now())
      .unwrap();
    assert!(t.persist_error().is_some());

    t.dispatch(Action::ToggleTheme);
    assert_eq!(t.theme(), Theme::Dark);
    assert!(
      t.persist_error()
        .unwrap()
        .contains("tasktrack.tasks")
    );

    t.dispatch(Action::DismissError);
    assert!(t.persist_error().is_none());
  }

  #[test]
  fn theme_error_clears_once_theme_saves() {
    let storage = FailingKey {
      key:   "tasktrack.theme".to_string(),
      inner: MemoryStorage::new()
    };
    let mut t = Tracker::open(
      storage,
      &TrackerConfig::default()
    );
    t.dispatch(Action::ToggleTheme);
    assert!(t.persist_error().is_some());

    t.submit(&input("a", "1"), now())
      .unwrap();
    assert!(
      t.persist_error()
        .unwrap()
        .contains("tasktrack.theme")
    );
  }

  /// Small deterministic generator so the sequence test needs no extra
  /// crates and replays identically.
  struct Lcg(u64);

  impl Lcg {
    fn next(&mut self) -> u64 {
      self.0 = self
        .0
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
      self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
      (self.next() % n as u64) as usize
    }
  }

  #[test]
  fn random_mutation_sequences_survive_reopen()
   {
    for seed in 1..=16_u64 {
      let mut rng = Lcg(seed);
      let mut t = tracker();
      for step in 0..40 {
        let ids: Vec<Uuid> = t
          .tasks()
          .iter()
          .map(|task| task.id)
          .collect();
        match rng.below(4) {
          | 0 | 1 => {
            let category =
              ["1", "2", "4"][rng.below(3)];
            t.submit(
              &input(
                &format!("task {step}"),
                category
              ),
              now()
            )
            .unwrap();
          }
          | 2 if !ids.is_empty() => {
            let id = ids[rng.below(ids.len())];
            assert!(t.toggle(id));
          }
          | 3 if !ids.is_empty() => {
            let id = ids[rng.below(ids.len())];
            assert!(t.delete(id));
            assert!(t.tasks().iter().all(
              |task| task.id != id
            ));
          }
          | _ => {
            assert!(!t.toggle(Uuid::new_v4()));
          }
        }

        let reopened = Tracker::open(
          t.storage().clone(),
          &TrackerConfig::default()
        );
        assert_eq!(
          reopened.tasks(),
          t.tasks(),
          "seed {seed} step {step}"
        );
        let counts = reopened.counts();
        assert_eq!(
          counts.active + counts.completed,
          counts.all
        );
      }
    }
  }
}
