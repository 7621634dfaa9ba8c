pub mod category;
pub mod config;
pub mod controller;
pub mod filter;
pub mod repository;
pub mod storage;
pub mod task;
pub mod validate;

pub use category::{
  Category,
  CategoryBadge,
  CategoryRef,
  CategoryRegistry
};
pub use config::TrackerConfig;
pub use controller::{
  Action,
  AddFlow,
  Theme,
  Tracker
};
pub use filter::{
  CategoryFilter,
  StatusFilter
};
pub use storage::{
  FileStorage,
  MemoryStorage,
  Storage
};
pub use task::{
  DraftInput,
  Priority,
  Task,
  TaskDraft
};
pub use validate::{
  Field,
  FieldError,
  ValidationErrors
};
