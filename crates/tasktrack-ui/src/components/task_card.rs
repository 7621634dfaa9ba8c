use tasktrack_core::{
  CategoryBadge,
  Task
};
use uuid::Uuid;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskCardProps {
  pub task:      Task,
  pub category:  CategoryBadge,
  pub on_toggle: Callback<Uuid>,
  pub on_delete: Callback<Uuid>
}

#[function_component(TaskCard)]
pub fn task_card(
  props: &TaskCardProps
) -> Html {
  let task = &props.task;
  let id = task.id;

  let on_toggle = {
    let on_toggle =
      props.on_toggle.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_toggle.emit(id)
      }
    )
  };
  let on_delete = {
    let on_delete =
      props.on_delete.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_delete.emit(id)
      }
    )
  };

  let category = &props.category;
  let has_description =
    !task.description.trim().is_empty();

  html! {
      <div class={classes!("task-card", task.completed.then_some("completed"))}>
          <div class="task-card-head">
              <div class="task-card-text">
                  <h3 class={classes!("task-title", task.completed.then_some("done"))}>{ &task.title }</h3>
                  {
                      if has_description {
                          html! { <p class="task-subtitle">{ &task.description }</p> }
                      } else {
                          html! {}
                      }
                  }
              </div>
              <div class="task-card-actions">
                  <button
                      class={classes!("icon-btn", task.completed.then_some("ok"))}
                      title={if task.completed { "Mark as active" } else { "Mark as completed" }}
                      onclick={on_toggle}
                  >
                      { "✓" }
                  </button>
                  <button class="icon-btn danger" title="Delete task" onclick={on_delete}>{ "✕" }</button>
              </div>
          </div>
          <div class="task-card-meta">
              <span
                  class={classes!("badge", "category-badge", (!category.known).then_some("unknown"))}
                  style={format!("--category-color:{};", category.color)}
              >
                  { &category.name }
              </span>
              <span class={classes!("badge", task.priority.badge_class())}>{ task.priority.label() }</span>
              <span class="due">{ task.due_label() }</span>
          </div>
      </div>
  }
}
