//! JSON-file-backed record store.
//!
//! A [`JsonStore`] keeps one ordered collection of records in a single file:
//!
//! ```json
//! { "kind": "image-record", "images": [ ... ] }
//! ```
//!
//! The whole file is loaded for every operation and rewritten in full on every mutation.
//! Mutations are serialised by a writer lock held across load-modify-write, and each rewrite is a
//! temporary file in the same directory renamed over the original, so readers see either the old
//! or the new document and never a partial one.
//!
//! A missing file is an empty store, and a document without a `kind` tag is read as this store's
//! own kind. A file that exists but cannot be read or parsed is reported as
//! [`StoreError::CorruptStore`]; a file written for the other record type is reported as
//! [`StoreError::SchemaMismatch`].

use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// A record type that can live in a [`JsonStore`].
///
/// Records must serialise to a JSON object whose top-level `"id"` string equals
/// [`record_id`](StoredRecord::record_id); lookups match on it before deserialising.
pub trait StoredRecord: Serialize + DeserializeOwned {
    /// Schema tag written into the store file.
    const KIND: &'static str;

    fn record_id(&self) -> &str;
}

#[derive(Deserialize)]
struct StoredDocument {
    #[serde(default)]
    kind: Option<String>,
    images: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct StoredDocumentRef<'a, R> {
    kind: &'static str,
    images: &'a [R],
}

#[derive(Debug)]
pub struct JsonStore<R> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: StoredRecord> JsonStore<R> {
    /// Creates a store over `path`. Nothing is read or written until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts `record`, replacing any existing entry with the same id.
    ///
    /// The replaced entry is removed from its position and the new one is appended at the end.
    pub fn save(&self, record: R) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.load()?;
        let before = records.len();
        records.retain(|existing| existing.record_id() != record.record_id());
        let replaced = records.len() != before;

        let id = record.record_id().to_owned();
        records.push(record);
        self.persist(&records)?;

        tracing::info!(
            path = %self.path.display(),
            id = %id,
            replaced,
            kind = R::KIND,
            "Saved record"
        );
        Ok(())
    }

    /// Returns the record with `id`, or `None` if there is none.
    ///
    /// Only the matching entry is deserialised, so a bad entry elsewhere does not block the lookup.
    pub fn find_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        let found = self
            .load_entries()?
            .into_iter()
            .find(|entry| entry.get("id").and_then(serde_json::Value::as_str) == Some(id))
            .map(|entry| self.decode(entry))
            .transpose()?;

        tracing::debug!(path = %self.path.display(), id, found = found.is_some(), "Looked up record");
        Ok(found)
    }

    /// Returns every record in on-disk order.
    pub fn find_all(&self) -> StoreResult<Vec<R>> {
        let records = self.load()?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "Listed records");
        Ok(records)
    }

    /// Removes the record with `id`.
    ///
    /// Returns `false` without touching the file when no such record exists.
    pub fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.record_id() != id);

        if records.len() == before {
            tracing::debug!(path = %self.path.display(), id, "Delete of absent record ignored");
            return Ok(false);
        }

        self.persist(&records)?;
        tracing::info!(path = %self.path.display(), id, kind = R::KIND, "Deleted record");
        Ok(true)
    }

    fn load(&self) -> StoreResult<Vec<R>> {
        self.load_entries()?
            .into_iter()
            .map(|entry| self.decode(entry))
            .collect()
    }

    fn load_entries(&self) -> StoreResult<Vec<serde_json::Value>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::CorruptStore {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let document: StoredDocument =
            serde_json::from_str(&contents).map_err(|e| self.corrupt(e))?;

        match document.kind {
            Some(kind) if kind != R::KIND => Err(StoreError::SchemaMismatch {
                path: self.path.clone(),
                expected: R::KIND,
                found: kind,
            }),
            _ => Ok(document.images),
        }
    }

    fn decode(&self, entry: serde_json::Value) -> StoreResult<R> {
        serde_json::from_value(entry).map_err(|e| self.corrupt(e))
    }

    fn persist(&self, records: &[R]) -> StoreResult<()> {
        let document = StoredDocumentRef {
            kind: R::KIND,
            images: records,
        };
        let json = serde_json::to_string_pretty(&document).map_err(StoreError::Serialization)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        Ok(())
    }

    fn corrupt(&self, error: serde_json::Error) -> StoreError {
        StoreError::CorruptStore {
            path: self.path.clone(),
            reason: error.to_string(),
        }
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
