use tasktrack_core::filter::StatusCounts;
use tasktrack_core::{
  Category,
  CategoryFilter,
  StatusFilter
};
use web_sys::HtmlSelectElement;
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub status:      StatusFilter,
  pub counts:      StatusCounts,
  pub categories:  Vec<Category>,
  pub category:    CategoryFilter,
  pub on_status:   Callback<StatusFilter>,
  pub on_category:
    Callback<CategoryFilter>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  let on_category_change = {
    let on_category =
      props.on_category.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: HtmlSelectElement =
          e.target_unchecked_into();
        on_category.emit(
          CategoryFilter::from_value(
            &select.value()
          )
        );
      }
    )
  };
  let selected = props.category.value();

  html! {
      <div class="filter-bar">
          <div class="status-filters">
              {
                  for StatusFilter::ALL.iter().copied().map(|status| {
                      let on_status = props.on_status.clone();
                      let class = if props.status == status { "filter active" } else { "filter" };
                      html! {
                          <button {class} onclick={move |_| on_status.emit(status)}>
                              <span>{ status.label() }</span>
                              <span class="badge">{ props.counts.get(status) }</span>
                          </button>
                      }
                  })
              }
          </div>
          <select class="category-filter" onchange={on_category_change}>
              <option value={CategoryFilter::ALL_VALUE} selected={selected == CategoryFilter::ALL_VALUE}>
                  { "All Categories" }
              </option>
              {
                  for props.categories.iter().map(|category| html! {
                      <option value={category.id.clone()} selected={selected == category.id}>
                          { &category.name }
                      </option>
                  })
              }
          </select>
      </div>
  }
}
