//! File-backed vector store.
//!
//! Each document gets its own directory under the store root:
//!
//! ```text
//! {root}/
//! ├── doc_1/
//! │   └── index.json
//! └── doc_2/
//!     └── index.json
//! ```
//!
//! `index.json` is the serialized [`DocumentIndex`]. Writes go to a temporary
//! file in the same directory, are fsynced, and then renamed over
//! `index.json`, so a reader sees either the previous or the new index in full.
//! Deletion renames the directory to a hidden tombstone before removing it.
//! Tombstones left behind by an interrupted delete are swept on the next write.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::document::{DocumentId, DocumentIndex};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "File";
const INDEX_FILE: &str = "index.json";
const TOMBSTONE_PREFIX: &str = ".doc_";
const TOMBSTONE_MARKER: &str = ".deleted-";

/// A [`VectorStore`] persisting one JSON index file per document.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{FileVectorStore, VectorStore};
///
/// let store = FileVectorStore::new("chroma_db");
/// if let Some(index) = store.load(42).await? {
///     println!("{} chunks", index.len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileVectorStore {
    root: PathBuf,
}

impl FileVectorStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the index of `document_id`.
    pub fn document_dir(&self, document_id: DocumentId) -> PathBuf {
        self.root.join(format!("doc_{document_id}"))
    }

    fn index_path(&self, document_id: DocumentId) -> PathBuf {
        self.document_dir(document_id).join(INDEX_FILE)
    }

    fn tombstone_path(&self, document_id: DocumentId) -> PathBuf {
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        self.root.join(format!("{TOMBSTONE_PREFIX}{document_id}{TOMBSTONE_MARKER}{stamp}"))
    }
}

fn store_error(message: impl Into<String>) -> RagError {
    RagError::VectorStoreError { backend: BACKEND.to_string(), message: message.into() }
}

fn io_error(context: &str, path: &Path, err: io::Error) -> RagError {
    store_error(format!("{context} {}: {err}", path.display()))
}

fn is_tombstone(name: &str) -> bool {
    name.starts_with(TOMBSTONE_PREFIX) && name.contains(TOMBSTONE_MARKER)
}

/// Remove tombstones that a crashed or failed delete left under `root`.
fn sweep_tombstones(root: &Path) {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            warn!(path = %root.display(), error = %e, "failed to scan for tombstones");
            return;
        }
    };

    for entry in entries.flatten() {
        if !entry.file_name().to_str().is_some_and(is_tombstone) {
            continue;
        }
        let path = entry.path();
        match std::fs::remove_dir_all(&path) {
            Ok(()) => debug!(path = %path.display(), "swept tombstone"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to sweep tombstone"),
        }
    }
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| io_error("failed to create", dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| io_error("failed to create temporary file in", dir, e))?;
    tmp.write_all(bytes).map_err(|e| io_error("failed to write", tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| io_error("failed to sync", tmp.path(), e))?;
    tmp.persist(target).map_err(|e| io_error("failed to replace", target, e.error))?;
    Ok(())
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn replace(&self, index: DocumentIndex) -> Result<()> {
        let document_id = index.document_id;
        let bytes = serde_json::to_vec(&index)
            .map_err(|e| store_error(format!("failed to serialize index {document_id}: {e}")))?;

        let root = self.root.clone();
        let dir = self.document_dir(document_id);
        let target = self.index_path(document_id);
        tokio::task::spawn_blocking(move || {
            sweep_tombstones(&root);
            write_atomically(&dir, &target, &bytes)
        })
        .await
        .map_err(|e| store_error(format!("write task failed: {e}")))??;

        debug!(document.id = document_id, chunk_count = index.len(), "index written");
        Ok(())
    }

    async fn load(&self, document_id: DocumentId) -> Result<Option<Arc<DocumentIndex>>> {
        let path = self.index_path(document_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("failed to read", &path, e)),
        };

        let index: DocumentIndex = serde_json::from_slice(&bytes)
            .map_err(|e| store_error(format!("corrupt index {}: {e}", path.display())))?;
        Ok(Some(Arc::new(index)))
    }

    async fn delete(&self, document_id: DocumentId) -> Result<bool> {
        let dir = self.document_dir(document_id);
        let tombstone = self.tombstone_path(document_id);

        match tokio::fs::rename(&dir, &tombstone).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(io_error("failed to detach", &dir, e)),
        }

        // The index is already unreachable; a leftover tombstone is only disk usage.
        if let Err(e) = tokio::fs::remove_dir_all(&tombstone).await {
            warn!(document.id = document_id, path = %tombstone.display(), error = %e, "failed to remove tombstone");
        }
        Ok(true)
    }

    async fn exists(&self, document_id: DocumentId) -> Result<bool> {
        let path = self.index_path(document_id);
        tokio::fs::try_exists(&path).await.map_err(|e| io_error("failed to stat", &path, e))
    }
}
