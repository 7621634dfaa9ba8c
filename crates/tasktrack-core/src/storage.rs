use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{
  debug,
  info,
  warn
};

/// Key-value slot the tracker persists through.
pub trait Storage {
  fn read(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn write(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;
}

/// Reads and parses `key`, falling back to `default` when the value is
/// missing, unreadable or malformed.
#[tracing::instrument(skip(
  storage, default
))]
pub fn load<S, T>(
  storage: &S,
  key: &str,
  default: T
) -> T
where
  S: Storage + ?Sized,
  T: DeserializeOwned
{
  let raw = match storage.read(key) {
    | Ok(Some(raw)) => raw,
    | Ok(None) => {
      debug!(
        key,
        "no stored value; using default"
      );
      return default;
    }
    | Err(error) => {
      warn!(
        key,
        ?error,
        "failed reading stored value; \
         using default"
      );
      return default;
    }
  };

  match serde_json::from_str::<T>(&raw)
  {
    | Ok(value) => value,
    | Err(error) => {
      warn!(
        key,
        %error,
        "failed parsing stored value; \
         using default"
      );
      default
    }
  }
}

#[tracing::instrument(skip(
  storage, value
))]
pub fn save<S, T>(
  storage: &mut S,
  key: &str,
  value: &T
) -> anyhow::Result<()>
where
  S: Storage + ?Sized,
  T: Serialize + ?Sized
{
  let json = serde_json::to_string(
    value
  )
  .with_context(|| {
    format!(
      "failed to serialize value for \
       {key}"
    )
  })?;
  storage.write(key, &json)?;
  debug!(
    key,
    bytes = json.len(),
    "saved value"
  );
  Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  entries: BTreeMap<String, String>
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    self
      .entries
      .get(key)
      .map(String::as_str)
  }

  pub fn insert(
    &mut self,
    key: &str,
    value: &str
  ) {
    self.entries.insert(
      key.to_string(),
      value.to_string()
    );
  }
}

impl Storage for MemoryStorage {
  fn read(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn write(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self.insert(key, value);
    Ok(())
  }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
  pub data_dir: PathBuf
}

impl FileStorage {
  #[tracing::instrument(skip(data_dir))]
  pub fn open(
    data_dir: &Path
  ) -> anyhow::Result<Self> {
    let data_dir =
      data_dir.to_path_buf();
    fs::create_dir_all(&data_dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          data_dir.display()
        )
      })?;

    info!(
      data_dir = %data_dir.display(),
      "opened file storage"
    );

    Ok(Self {
      data_dir
    })
  }

  pub fn path_for(
    &self,
    key: &str
  ) -> anyhow::Result<PathBuf> {
    if key.is_empty()
      || key.contains(['/', '\\'])
      || key.starts_with('.')
    {
      return Err(anyhow!(
        "invalid storage key: {key:?}"
      ));
    }
    Ok(
      self
        .data_dir
        .join(format!("{key}.json"))
    )
  }
}

impl Storage for FileStorage {
  fn read(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    let path = self.path_for(key)?;
    if !path.exists() {
      return Ok(None);
    }
    let raw = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed reading {}",
          path.display()
        )
      })?;
    Ok(Some(raw))
  }

  fn write(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    let path = self.path_for(key)?;
    debug!(
      file = %path.display(),
      bytes = value.len(),
      "writing atomically"
    );

    let mut temp =
      NamedTempFile::new_in(
        &self.data_dir
      )?;
    temp.write_all(value.as_bytes())?;
    temp.flush()?;

    temp.persist(&path).map_err(
      |err| {
        anyhow!(
          "failed to persist {}: {}",
          path.display(),
          err
        )
      }
    )?;
    Ok(())
  }
}
