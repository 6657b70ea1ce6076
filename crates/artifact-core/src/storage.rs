//! File-backed snapshots of the builder's session state.
//!
//! Each snapshot lives in `<base>/<key>.json` under one of three fixed keys.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown snapshot key: {0}")]
    UnknownKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    /// The component forest on the canvas
    Canvas,
    /// Named application state variables
    AppState,
    /// Cached responses of data bindings
    ApiData,
}

impl SnapshotKey {
    pub const ALL: [SnapshotKey; 3] = [SnapshotKey::Canvas, SnapshotKey::AppState, SnapshotKey::ApiData];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKey::Canvas => "canvas",
            SnapshotKey::AppState => "appState",
            SnapshotKey::ApiData => "apiData",
        }
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotKey {
    type Err = StorageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SnapshotKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| StorageError::UnknownKey(value.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    base_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub async fn save<T: Serialize + ?Sized>(
        &self,
        key: SnapshotKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(value)?;
        fs::create_dir_all(&self.base_path).await?;
        fs::write(self.path(key), json).await?;
        log::debug!("Saved snapshot '{}' to {:?}", key, self.base_path);
        Ok(())
    }

    pub async fn load<T: DeserializeOwned>(&self, key: SnapshotKey) -> Result<Option<T>, StorageError> {
        let path = self.path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub async fn delete(&self, key: SnapshotKey) -> Result<bool, StorageError> {
        match fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    fn path(&self, key: SnapshotKey) -> PathBuf {
        self.base_path.join(format!("{}.json", key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentNode, ComponentType};
    use serde_json::{json, Value};

    #[test]
    fn keys_parse_from_wire_names() {
        assert_eq!("appState".parse::<SnapshotKey>().unwrap(), SnapshotKey::AppState);
        assert!(matches!(
            "app_state".parse::<SnapshotKey>(),
            Err(StorageError::UnknownKey(_))
        ));
    }

    #[tokio::test]
    async fn canvas_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("snapshots"));
        store.init().await.unwrap();

        let canvas = vec![ComponentNode::with_id("root", ComponentType::Container)
            .with_child(ComponentNode::with_id("t", ComponentType::Text).with_prop("children", "Hi"))];
        store.save(SnapshotKey::Canvas, &canvas).await.unwrap();

        let loaded: Vec<ComponentNode> = store.load(SnapshotKey::Canvas).await.unwrap().unwrap();
        assert_eq!(loaded, canvas);
        assert!(dir.path().join("snapshots/canvas.json").exists());
    }

    #[tokio::test]
    async fn missing_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let loaded: Option<Value> = store.load(SnapshotKey::ApiData).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store
            .save(SnapshotKey::AppState, &json!({"count": 1}))
            .await
            .unwrap();

        assert!(store.delete(SnapshotKey::AppState).await.unwrap());
        assert!(!store.delete(SnapshotKey::AppState).await.unwrap());
    }
}
