mod empty_state;
mod filter_bar;
mod task_card;
mod task_form;

pub use empty_state::EmptyState;
pub use filter_bar::FilterBar;
pub use task_card::TaskCard;
pub use task_form::TaskForm;
