use tasktrack_core::{
  Category,
  DraftInput,
  Field,
  Priority,
  ValidationErrors
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  HtmlTextAreaElement,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  classes,
  function_component,
  html,
  use_state
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum FormField {
  Title,
  Description,
  Priority,
  Category,
  DueDate
}

fn with_field(
  current: &DraftInput,
  field: FormField,
  value: String
) -> DraftInput {
  let mut next = current.clone();
  match field {
    | FormField::Title => {
      next.title = value
    }
    | FormField::Description => {
      next.description = value
    }
    | FormField::Priority => {
      next.priority = value
    }
    | FormField::Category => {
      next.category = value
    }
    | FormField::DueDate => {
      next.due_date = value
    }
  }
  next
}

fn field_message(
  errors: Option<&ValidationErrors>,
  field: Field,
  label: &str
) -> Option<String> {
  errors
    .and_then(|errors| errors.get(field))
    .map(|error| format!("{label} {error}"))
}

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  pub categories: Vec<Category>,
  #[prop_or_default]
  pub errors:     Option<ValidationErrors>,
  pub on_submit:  Callback<DraftInput>,
  pub on_close:   Callback<()>
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let input = {
    let default_category = props
      .categories
      .first()
      .map(|category| category.id.clone());
    use_state(move || {
      DraftInput::with_defaults(
        default_category.as_deref()
      )
    })
  };

  let on_text = |field: FormField| {
    let input = input.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let target: HtmlInputElement =
          e.target_unchecked_into();
        input.set(with_field(
          &input,
          field,
          target.value()
        ));
      }
    )
  };

  let on_description = {
    let input = input.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let target: HtmlTextAreaElement =
          e.target_unchecked_into();
        input.set(with_field(
          &input,
          FormField::Description,
          target.value()
        ));
      }
    )
  };

  let on_select = |field: FormField| {
    let input = input.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let target: HtmlSelectElement =
          e.target_unchecked_into();
        input.set(with_field(
          &input,
          field,
          target.value()
        ));
      }
    )
  };

  let onsubmit = {
    let input = input.clone();
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        on_submit.emit((*input).clone());
      }
    )
  };

  let on_close_click = {
    let on_close = props.on_close.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_close.emit(())
      }
    )
  };

  let errors = props.errors.as_ref();
  let title_error = field_message(
    errors,
    Field::Title,
    "Title"
  );
  let category_error = field_message(
    errors,
    Field::Category,
    "Category"
  );
  let priority_error = field_message(
    errors,
    Field::Priority,
    "Priority"
  );
  let due_error = field_message(
    errors,
    Field::DueDate,
    "Due date"
  );
  let error_line =
    |message: Option<String>| match message
    {
      | Some(message) => {
        html! { <div class="field-error">{ message }</div> }
      }
      | None => html! {}
    };

  html! {
      <form class="task-form" novalidate={true} {onsubmit}>
          <div class="task-form-head">
              <h2>{ "Add New Task" }</h2>
              <button type="button" class="icon-btn" title="Close" onclick={on_close_click}>{ "✕" }</button>
          </div>

          <input
              type="text"
              class={classes!("field", title_error.is_some().then_some("invalid"))}
              placeholder="Task title"
              value={input.title.clone()}
              oninput={on_text(FormField::Title)}
          />
          { error_line(title_error) }

          <textarea
              class="field"
              placeholder="Description"
              value={input.description.clone()}
              oninput={on_description}
          />

          <div class="task-form-row">
              <select class="field" onchange={on_select(FormField::Priority)}>
                  {
                      for Priority::ALL.iter().copied().map(|priority| html! {
                          <option value={priority.as_str()} selected={input.priority == priority.as_str()}>
                              { format!("{} Priority", priority.label()) }
                          </option>
                      })
                  }
              </select>
              <select
                  class={classes!("field", category_error.is_some().then_some("invalid"))}
                  onchange={on_select(FormField::Category)}
              >
                  {
                      for props.categories.iter().map(|category| html! {
                          <option value={category.id.clone()} selected={input.category == category.id}>
                              { &category.name }
                          </option>
                      })
                  }
              </select>
          </div>
          { error_line(priority_error) }
          { error_line(category_error) }

          <input
              type="date"
              class={classes!("field", due_error.is_some().then_some("invalid"))}
              value={input.due_date.clone()}
              oninput={on_text(FormField::DueDate)}
          />
          { error_line(due_error) }

          <button type="submit" class="btn primary wide">{ "Add Task" }</button>
      </form>
  }
}
