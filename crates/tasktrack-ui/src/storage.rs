use anyhow::anyhow;
use tasktrack_core::{
  MemoryStorage,
  Storage
};
use wasm_bindgen::JsValue;

fn js_error(
  action: &str,
  key: &str,
  value: JsValue
) -> anyhow::Error {
  anyhow!(
    "local storage {action} failed for \
     {key}: {value:?}"
  )
}

fn local_storage()
-> Option<web_sys::Storage> {
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

/// `window.localStorage`.
#[derive(Debug, Clone)]
pub struct BrowserStorage {
  inner: web_sys::Storage
}

impl Storage for BrowserStorage {
  fn read(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    self
      .inner
      .get_item(key)
      .map_err(|value| {
        js_error("read", key, value)
      })
  }

  fn write(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .inner
      .set_item(key, value)
      .map_err(|value| {
        js_error("write", key, value)
      })
  }
}

/// Local storage when the browser allows it, otherwise an in-memory
/// map that lives as long as the page.
#[derive(Debug, Clone)]
pub enum AppStorage {
  Browser(BrowserStorage),
  Memory(MemoryStorage)
}

impl AppStorage {
  pub fn detect() -> Self {
    match local_storage() {
      | Some(inner) => {
        Self::Browser(BrowserStorage {
          inner
        })
      }
      | None => {
        tracing::warn!(
          "local storage unavailable; \
           tasks will not survive a \
           reload"
        );
        Self::Memory(MemoryStorage::new())
      }
    }
  }

  pub fn is_persistent(&self) -> bool {
    matches!(self, Self::Browser(_))
  }
}

impl Storage for AppStorage {
  fn read(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    match self {
      | Self::Browser(storage) => {
        storage.read(key)
      }
      | Self::Memory(storage) => {
        storage.read(key)
      }
    }
  }

  fn write(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    match self {
      | Self::Browser(storage) => {
        storage.write(key, value)
      }
      | Self::Memory(storage) => {
        storage.write(key, value)
      }
    }
  }
}
