use tasktrack_core::StatusFilter;
use tasktrack_core::filter::EMPTY_STATE_HEADING;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct EmptyStateProps {
  pub status: StatusFilter
}

#[function_component(EmptyState)]
pub fn empty_state(
  props: &EmptyStateProps
) -> Html {
  html! {
      <div class="empty-state">
          <div class="empty-icon">{ "✓" }</div>
          <h3>{ EMPTY_STATE_HEADING }</h3>
          <p>{ props.status.empty_message() }</p>
      </div>
  }
}
