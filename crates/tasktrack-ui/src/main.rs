mod app;
mod components;
mod storage;

use tasktrack_core::TrackerConfig;
use web_sys::Element;

const MOUNT_ID: &str = "app";

fn mount_point() -> Option<Element> {
  web_sys::window()?
    .document()?
    .get_element_by_id(MOUNT_ID)
}

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  let config = TrackerConfig::embedded();
  tracing::info!(
    categories = config.categories.len(),
    tasks_key = %config.storage.tasks_key,
    "starting tasktrack frontend"
  );

  let Some(root) = mount_point() else {
    tracing::error!(
      id = MOUNT_ID,
      "mount element not found; nothing \
       rendered"
    );
    return;
  };

  yew::Renderer::<app::App>::with_root_and_props(
    root,
    app::AppProps {
      config
    }
  )
  .render();
}
