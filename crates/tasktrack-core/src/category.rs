use serde::{
  Deserialize,
  Serialize
};

pub const UNKNOWN_CATEGORY_NAME: &str =
  "Unknown category";
pub const UNKNOWN_CATEGORY_COLOR: &str =
  "#6B7280";

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Category {
  pub id:    String,
  pub name:  String,
  pub color: String
}

impl Category {
  fn new(
    id: &str,
    name: &str,
    color: &str
  ) -> Self {
    Self {
      id:    id.to_string(),
      name:  name.to_string(),
      color: color.to_string()
    }
  }
}

/// Result of resolving a task's category id against the registry.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CategoryRef<'a> {
  Known(&'a Category),
  Unknown
}

impl CategoryRef<'_> {
  pub fn name(&self) -> &str {
    match self {
      | Self::Known(category) => {
        &category.name
      }
      | Self::Unknown => {
        UNKNOWN_CATEGORY_NAME
      }
    }
  }

  pub fn color(&self) -> &str {
    match self {
      | Self::Known(category) => {
        &category.color
      }
      | Self::Unknown => {
        UNKNOWN_CATEGORY_COLOR
      }
    }
  }

  pub fn is_known(&self) -> bool {
    matches!(self, Self::Known(_))
  }

  pub fn to_badge(&self) -> CategoryBadge {
    CategoryBadge {
      name:  self.name().to_string(),
      color: self.color().to_string(),
      known: self.is_known()
    }
  }
}

/// Owned label and color for rendering a task's category.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct CategoryBadge {
  pub name:  String,
  pub color: String,
  pub known: bool
}

/// Fixed set of categories, read-only once the app has started.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct CategoryRegistry {
  categories: Vec<Category>
}

impl Default for CategoryRegistry {
  fn default() -> Self {
    Self {
      categories: vec![
        Category::new(
          "1", "Personnel", "#3B82F6"
        ),
        Category::new(
          "2", "Travail", "#EF4444"
        ),
        Category::new(
          "4", "Sport", "#8B5CF6"
        ),
      ]
    }
  }
}

impl CategoryRegistry {
  pub fn new(
    categories: Vec<Category>
  ) -> Self {
    Self {
      categories
    }
  }

  pub fn all(&self) -> &[Category] {
    &self.categories
  }

  pub fn is_empty(&self) -> bool {
    self.categories.is_empty()
  }

  pub fn get(
    &self,
    id: &str
  ) -> Option<&Category> {
    self
      .categories
      .iter()
      .find(|category| category.id == id)
  }

  pub fn contains(
    &self,
    id: &str
  ) -> bool {
    self.get(id).is_some()
  }

  pub fn resolve(
    &self,
    id: &str
  ) -> CategoryRef<'_> {
    match self.get(id) {
      | Some(category) => {
        CategoryRef::Known(category)
      }
      | None => {
        tracing::trace!(
          category = id,
          "category not in registry"
        );
        CategoryRef::Unknown
      }
    }
  }

  pub fn badge(
    &self,
    id: &str
  ) -> CategoryBadge {
    self.resolve(id).to_badge()
  }

  /// Id preselected by the task form.
  pub fn default_id(
    &self
  ) -> Option<&str> {
    self
      .categories
      .first()
      .map(|category| {
        category.id.as_str()
      })
  }
}
