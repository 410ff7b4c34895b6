use std::{fmt, io, path::PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::types::CredentialSet;

#[derive(Debug)]
pub enum StoreError {
    /// The record file does not exist yet.
    Missing(PathBuf),
    IoError(io::Error),
    ParseError(serde_json::Error),
    /// The file parsed as JSON but is not an object.
    NotAnObject,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Missing(path) => {
                write!(f, "credential store {} does not exist", path.display())
            }
            StoreError::IoError(e) => write!(f, "credential store i/o failed: {e}"),
            StoreError::ParseError(e) => write!(f, "credential store is corrupt: {e}"),
            StoreError::NotAnObject => write!(f, "credential store is not a JSON object"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(e) => Some(e),
            StoreError::ParseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::ParseError(err)
    }
}

/// Computes the shallow merge `current ∪ partial`.
///
/// Keys in `partial` replace the same keys in `current`; every other key of
/// `current` is kept as is.
pub fn merge(mut current: Map<String, Value>, partial: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in partial {
        current.insert(key, value);
    }
    current
}

/// Merge-on-write persistence of the single credential record.
///
/// The record is the whole content of one JSON file. Updates run
/// read-merge-write under an async mutex, so concurrent updates from the
/// scheduler and HTTP handlers are applied one after another and never lose
/// each other's keys. The new content is written to a sibling temp file and
/// renamed over the record.
pub struct CredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the typed view of the persisted record.
    ///
    /// # Errors
    ///
    /// [`StoreError::Missing`] if the file is absent, [`StoreError::ParseError`]
    /// or [`StoreError::NotAnObject`] if it is corrupt.
    pub async fn read(&self) -> Result<CredentialSet, StoreError> {
        let raw = self.read_raw().await?;
        Ok(serde_json::from_value(Value::Object(raw))?)
    }

    /// Returns the persisted record as a raw JSON object, unknown keys included.
    pub async fn read_raw(&self) -> Result<Map<String, Value>, StoreError> {
        let json = match async_fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()));
            }
            Err(e) => return Err(StoreError::IoError(e)),
        };

        match serde_json::from_str::<Value>(&json)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject),
        }
    }

    /// Merges `partial` into the persisted record and writes it back.
    ///
    /// An absent file counts as an empty record, so the first authorization
    /// creates it. A corrupt file is never overwritten.
    pub async fn update(&self, partial: Map<String, Value>) -> Result<CredentialSet, StoreError> {
        let _guard = self.write_lock.lock().await;

        let current = match self.read_raw().await {
            Ok(current) => current,
            Err(StoreError::Missing(_)) => Map::new(),
            Err(e) => return Err(e),
        };

        let merged = merge(current, partial);
        self.write(&merged).await?;

        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    async fn write(&self, record: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
