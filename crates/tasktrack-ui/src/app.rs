use std::rc::Rc;

use chrono::Utc;
use gloo::console::log;
use tasktrack_core::{
  Action,
  CategoryFilter,
  DraftInput,
  StatusFilter,
  Theme,
  Tracker,
  TrackerConfig
};
use uuid::Uuid;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  Reducible,
  classes,
  function_component,
  html,
  use_effect_with,
  use_reducer
};

use crate::components::{
  EmptyState,
  FilterBar,
  TaskCard,
  TaskForm
};
use crate::storage::AppStorage;

#[derive(Debug, Clone)]
struct AppState {
  tracker: Tracker<AppStorage>
}

impl AppState {
  fn open(config: &TrackerConfig) -> Self {
    Self {
      tracker: Tracker::open(
        AppStorage::detect(),
        config
      )
    }
  }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
  pub config: TrackerConfig
}

impl Reducible for AppState {
  type Action = Action;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    ui_debug(
      "dispatch",
      &format!("{action:?}")
    );
    let mut next = (*self).clone();
    next.tracker.dispatch(action);
    Rc::new(next)
  }
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
  let state = {
    let config = props.config.clone();
    use_reducer(move || {
      AppState::open(&config)
    })
  };
  let tracker = &state.tracker;
  let theme = tracker.theme();

  use_effect_with(theme, |theme| {
    apply_body_theme(*theme);
  });

  let on_add_click = {
    let state = state.clone();
    Callback::from(move |_: MouseEvent| {
      state.dispatch(Action::OpenForm);
    })
  };

  let on_toggle_theme = {
    let state = state.clone();
    Callback::from(move |_: MouseEvent| {
      state.dispatch(Action::ToggleTheme);
    })
  };

  let on_status = {
    let state = state.clone();
    Callback::from(
      move |status: StatusFilter| {
        state.dispatch(
          Action::SetStatusFilter(status)
        );
      }
    )
  };

  let on_category = {
    let state = state.clone();
    Callback::from(
      move |category: CategoryFilter| {
        state.dispatch(
          Action::SetCategoryFilter(
            category
          )
        );
      }
    )
  };

  let on_toggle = {
    let state = state.clone();
    Callback::from(move |id: Uuid| {
      state.dispatch(Action::Toggle(id));
    })
  };

  let on_delete = {
    let state = state.clone();
    Callback::from(move |id: Uuid| {
      state.dispatch(Action::Delete(id));
    })
  };

  let on_form_submit = {
    let state = state.clone();
    Callback::from(
      move |input: DraftInput| {
        state.dispatch(Action::Submit(
          input,
          Utc::now()
        ));
      }
    )
  };

  let on_form_close = {
    let state = state.clone();
    Callback::from(move |()| {
      state.dispatch(Action::CloseForm);
    })
  };

  let on_dismiss_error = {
    let state = state.clone();
    Callback::from(move |_: MouseEvent| {
      state.dispatch(Action::DismissError);
    })
  };

  let categories =
    tracker.categories().all().to_vec();
  let visible = tracker.visible();
  let add_flow = tracker.add_flow();
  let form_open = add_flow.is_open();

  html! {
      <div class={classes!("app", theme.as_class(), form_open.then_some("modal-open"))}>
          <header class="app-header">
              <div class="app-brand">
                  <h1>{ "Task Manager" }</h1>
              </div>
              <div class="app-actions">
                  <button class="btn" onclick={on_toggle_theme}>{ theme.toggle_label() }</button>
                  <button class="btn primary" onclick={on_add_click}>{ "Add Task" }</button>
              </div>
          </header>

          <FilterBar
              status={tracker.status_filter()}
              counts={tracker.counts()}
              categories={categories.clone()}
              category={tracker.category_filter().clone()}
              {on_status}
              {on_category}
          />

          {
              if let Some(error) = tracker.persist_error() {
                  html! {
                      <div class="banner danger">
                          <span>{ format!("Could not save to browser storage: {error}") }</span>
                          <button class="btn" onclick={on_dismiss_error}>{ "Dismiss" }</button>
                      </div>
                  }
              } else if !tracker.storage().is_persistent() {
                  html! {
                      <div class="banner">
                          { "Browser storage is unavailable; tasks will be lost on reload." }
                      </div>
                  }
              } else {
                  html! {}
              }
          }

          {
              if form_open {
                  html! {
                      <div class="modal-overlay">
                          <div class="modal">
                              <TaskForm
                                  categories={categories.clone()}
                                  errors={add_flow.errors().cloned()}
                                  on_submit={on_form_submit}
                                  on_close={on_form_close}
                              />
                          </div>
                      </div>
                  }
              } else {
                  html! {}
              }
          }

          {
              if visible.is_empty() {
                  html! { <EmptyState status={tracker.status_filter()} /> }
              } else {
                  html! {
                      <div class="task-grid">
                          {
                              for visible.into_iter().map(|task| {
                                  let category = tracker.categories().badge(&task.category);
                                  html! {
                                      <TaskCard
                                          key={task.id.to_string()}
                                          task={task.clone()}
                                          {category}
                                          on_toggle={on_toggle.clone()}
                                          on_delete={on_delete.clone()}
                                      />
                                  }
                              })
                          }
                      </div>
                  }
              }
          }
      </div>
  }
}

fn apply_body_theme(theme: Theme) {
  let Some(body) = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| document.body())
  else {
    tracing::warn!(
      "no document body; theme not \
       applied"
    );
    return;
  };
  body.set_class_name(theme.as_class());
  ui_debug("theme", theme.as_class());
}

fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
