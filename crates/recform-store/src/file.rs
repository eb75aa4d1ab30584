#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::{RecordStore, StoreError, StoreResult};

const FORMAT_VERSION: u32 = 1;
const FILE_NAME: &str = "records.json";

/// The whole store as written to disk.
#[derive(Serialize, Deserialize)]
struct StoreFile {
    format_version: u32,
    /// Record key to serialized record.
    entries: BTreeMap<String, String>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Every record in one JSON document.
///
/// ```json
/// {
///   "format_version": 1,
///   "entries": {
///     "pagamento": "{\"cvv\":\"123\",\"numeroCartao\":\"1234567890123456\"}"
///   }
/// }
/// ```
///
/// A mutation rewrites the document into a sibling `*.json.tmp` file, syncs
/// it and renames it over the original, so readers see either the old or the
/// new document. A failed write removes the staging file. `set` and `remove`
/// hold an async mutex across the read-modify-write cycle; concurrent writers
/// on one `FileStore` never drop each other's updates. A missing file reads
/// as an empty store.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by `path`, created on first write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// `records.json` under the per-user state directory for `app_name`:
    /// `$XDG_STATE_HOME`, else `$HOME/.local/state`, else the working
    /// directory.
    #[must_use]
    pub fn default_for_app(app_name: &str) -> Self {
        Self::new(state_dir().join(app_name).join(FILE_NAME))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    async fn load(&self) -> StoreResult<StoreFile> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(e) => return Err(e.into()),
        };

        let file: StoreFile = serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Serialization(format!("failed to parse store file: {e}"))
        })?;

        if file.format_version != FORMAT_VERSION {
            tracing::warn!(
                backend = self.name(),
                file = %self.path.display(),
                found = file.format_version,
                supported = FORMAT_VERSION,
                "refusing store file with unknown format version"
            );
            return Err(StoreError::Corruption(format!(
                "unsupported format version {}",
                file.format_version
            )));
        }

        Ok(file)
    }

    async fn save(&self, file: &StoreFile) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(file)
            .map_err(|e| StoreError::Serialization(format!("failed to serialize store: {e}")))?;

        let staging = self.staging_path();
        if let Err(e) = stage_and_replace(&staging, &self.path, &json).await {
            let _ = fs::remove_file(&staging).await;
            tracing::warn!(
                backend = self.name(),
                file = %self.path.display(),
                error = %e,
                "store file write failed"
            );
            return Err(e.into());
        }

        tracing::debug!(
            backend = self.name(),
            file = %self.path.display(),
            records = file.entries.len(),
            "store file written"
        );
        Ok(())
    }
}

async fn stage_and_replace(staging: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut out = fs::File::create(staging).await?;
    out.write_all(bytes).await?;
    out.flush().await?;
    out.sync_all().await?;
    drop(out);
    fs::rename(staging, target).await
}

fn state_dir() -> PathBuf {
    std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| Path::new(&home).join(".local/state")))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[async_trait]
impl RecordStore for FileStore {
    fn name(&self) -> &str {
        "FileStore"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut file = self.load().await?;
        Ok(file.entries.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load().await?;
        file.entries.insert(key.to_string(), value);
        self.save(&file).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load().await?;
        if file.entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&file).await
    }
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FileStore").field(&self.path).finish()
    }
}
