use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StorageError {}

/// Keyed JSON blobs. Keys are `/`-separated relative paths such as
/// `teamStats/natus-vincere.json`.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
    async fn read_json(&self, key: &str) -> Result<Value, StorageError>;
    /// Writes `value` pretty-printed with 2-space indentation, replacing any previous blob.
    async fn write_json(&self, key: &str, value: &Value) -> Result<(), StorageError>;
    async fn ensure_dir(&self, dir: &str) -> Result<(), StorageError>;
    async fn rename(&self, from: &str, to: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key);
        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::new(format!("stat {}: {e}", path.display())))
    }

    async fn read_json(&self, key: &str) -> Result<Value, StorageError> {
        let path = self.path_for(key);
        let contents = fs::read_to_string(&path)
            .await
            .map_err(|e| StorageError::new(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| StorageError::new(format!("parse {}: {e}", path.display())))
    }

    async fn write_json(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let body = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::new(format!("serialize {}: {e}", path.display())))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::new(format!("create {}: {e}", parent.display())))?;
        }
        fs::write(&path, body)
            .await
            .map_err(|e| StorageError::new(format!("write {}: {e}", path.display())))
    }

    async fn ensure_dir(&self, dir: &str) -> Result<(), StorageError> {
        let path = self.path_for(dir);
        fs::create_dir_all(&path)
            .await
            .map_err(|e| StorageError::new(format!("create {}: {e}", path.display())))
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), StorageError> {
        let from_path = self.path_for(from);
        let to_path = self.path_for(to);
        fs::rename(&from_path, &to_path).await.map_err(|e| {
            StorageError::new(format!(
                "rename {} -> {}: {e}",
                from_path.display(),
                to_path.display()
            ))
        })
    }
}
