use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::{
  error,
  info,
  warn
};

use crate::category::{
  Category,
  CategoryRegistry
};
use crate::controller::Theme;

const EMBEDDED_CONFIG_TOML: &str =
  include_str!("../assets/tracker.toml");

fn default_tasks_key() -> String {
  "tasktrack.tasks".to_string()
}

fn default_theme_key() -> String {
  "tasktrack.theme".to_string()
}

fn default_legacy_tasks_key() -> String {
  "tasks".to_string()
}

#[derive(
  Debug, Clone, PartialEq, Eq, Deserialize,
)]
pub struct StorageKeys {
  #[serde(default = "default_tasks_key")]
  pub tasks_key: String,
  #[serde(default = "default_theme_key")]
  pub theme_key: String,
  /// Slot the first frontend wrote its bare task array to. Read once
  /// when `tasks_key` is empty, then migrated.
  #[serde(
    default = "default_legacy_tasks_key"
  )]
  pub legacy_tasks_key: String
}

impl Default for StorageKeys {
  fn default() -> Self {
    Self {
      tasks_key: default_tasks_key(),
      theme_key: default_theme_key(),
      legacy_tasks_key:
        default_legacy_tasks_key()
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, Deserialize,
)]
pub struct TrackerConfig {
  #[serde(default)]
  pub version:       u32,
  #[serde(default)]
  pub default_theme: Theme,
  #[serde(default)]
  pub storage:       StorageKeys,
  #[serde(default)]
  pub categories:    Vec<Category>
}

impl Default for TrackerConfig {
  fn default() -> Self {
    Self {
      version:       1,
      default_theme: Theme::default(),
      storage:       StorageKeys::default(),
      categories:    CategoryRegistry::default()
        .all()
        .to_vec()
    }
  }
}

impl TrackerConfig {
  /// Config shipped with the app.
  pub fn embedded() -> Self {
    Self::from_toml_str(
      EMBEDDED_CONFIG_TOML
    )
  }

  /// Parses `raw`; falls back to built-in defaults on any error.
  pub fn from_toml_str(
    raw: &str
  ) -> Self {
    match toml::from_str::<Self>(raw) {
      | Ok(mut config) => {
        config.sanitize();
        info!(
          version = config.version,
          categories =
            config.categories.len(),
          theme = ?config.default_theme,
          "loaded tracker config"
        );
        config
      }
      | Err(error) => {
        error!(%error, "failed parsing tracker config; using defaults");
        Self::default()
      }
    }
  }

  pub fn registry(
    &self
  ) -> CategoryRegistry {
    CategoryRegistry::new(
      self.categories.clone()
    )
  }

  fn sanitize(&mut self) {
    if self.storage.tasks_key.trim().is_empty()
    {
      self.storage.tasks_key =
        default_tasks_key();
    }
    if self.storage.theme_key.trim().is_empty()
    {
      self.storage.theme_key =
        default_theme_key();
    }

    let mut seen = BTreeSet::new();
    self.categories.retain(|category| {
      let id = category.id.trim();
      if id.is_empty()
        || category.name.trim().is_empty()
      {
        warn!(
          ?category,
          "dropping category without id \
           or name"
        );
        return false;
      }
      if !seen.insert(id.to_string()) {
        warn!(
          id,
          "dropping duplicate category id"
        );
        return false;
      }
      true
    });

    for category in &mut self.categories {
      category.id =
        category.id.trim().to_string();
      if !is_hex_color(&category.color) {
        warn!(
          id = %category.id,
          color = %category.color,
          "invalid category color; using \
           neutral grey"
        );
        category.color =
          crate::category::UNKNOWN_CATEGORY_COLOR
            .to_string();
      }
    }

    if self.categories.is_empty() {
      warn!(
        "tracker config has no \
         categories; using fallback set"
      );
      self.categories =
        CategoryRegistry::default()
          .all()
          .to_vec();
    }
  }
}

fn is_hex_color(value: &str) -> bool {
  let Some(hex) = value.strip_prefix('#')
  else {
    return false;
  };
  matches!(hex.len(), 3 | 6)
    && hex
      .chars()
      .all(|c| c.is_ascii_hexdigit())
}
