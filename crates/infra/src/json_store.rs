//! Flat JSON-array file persistence.
//!
//! Each store owns one file holding a JSON array of records. Every operation
//! re-reads the file; there is no in-memory cache.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is a JSON array, but its records do not have the expected
    /// shape. Not recovered, so the file is never overwritten with `[]`.
    #[error("malformed records in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode records for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result of a mutation closure passed to [`JsonFileStore::update`].
#[derive(Debug)]
pub enum Change<R> {
    /// Persist the mutated list, then return the value.
    Write(R),
    /// Leave the file untouched.
    Keep(R),
}

/// A JSON array file of `T` records.
///
/// Reads are lock-free (writes replace the file atomically via rename);
/// read-modify-write cycles are serialized per store.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records.
    ///
    /// A missing file, invalid JSON or a non-array document all read as an
    /// empty list.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "data file not found, starting with an empty list");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let document: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "invalid JSON in data file, starting with an empty list");
                return Ok(Vec::new());
            }
        };

        if !document.is_array() {
            tracing::warn!(path = %self.path.display(), "data file is not a JSON array, starting with an empty list");
            return Ok(Vec::new());
        }

        serde_json::from_value(document).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file contents with `records` (pretty-printed, 2-space indent).
    /// Only called from [`Self::update`], under the write lock.
    async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.tmp_path();
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        tokio::fs::write(&tmp, &json).await.map_err(write_err)?;
        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(write_err(source));
        }

        tracing::debug!(path = %self.path.display(), records = records.len(), "data file written");
        Ok(())
    }

    /// Load, mutate and (if the closure asks for it) save, holding the store's
    /// write lock for the whole cycle.
    pub async fn update<R>(
        &self,
        mutate: impl FnOnce(&mut Vec<T>) -> Change<R>,
    ) -> Result<R, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        match mutate(&mut records) {
            Change::Write(value) => {
                self.save(&records).await?;
                Ok(value)
            }
            Change::Keep(value) => Ok(value),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".tmp.{}", uuid::Uuid::now_v7()));
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Rec {
        id: u32,
    }

    fn store(dir: &tempfile::TempDir) -> JsonFileStore<Rec> {
        JsonFileStore::new(dir.path().join("recs.json"))
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_json_and_non_arrays_read_empty() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);

        std::fs::write(s.path(), "{ not json").unwrap();
        assert!(s.load().await.unwrap().is_empty());

        std::fs::write(s.path(), r#"{"id": 1}"#).unwrap();
        assert!(s.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_records_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        std::fs::write(s.path(), r#"[{"name": "x"}]"#).unwrap();
        assert!(matches!(s.load().await, Err(StoreError::Decode { .. })));
    }

    fn file_names(dir: &tempfile::TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn write_produces_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        s.update(|recs| {
            recs.push(Rec { id: 1 });
            Change::Write(())
        })
        .await
        .unwrap();

        let text = std::fs::read_to_string(s.path()).unwrap();
        assert_eq!(text, "[\n  {\n    \"id\": 1\n  }\n]");
        assert_eq!(s.load().await.unwrap(), vec![Rec { id: 1 }]);
        assert_eq!(file_names(&dir), vec!["recs.json".to_string()]);
    }

    #[test]
    fn temp_files_are_unique_per_write() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        let (a, b) = (s.tmp_path(), s.tmp_path());
        assert_ne!(a, b);
        assert_eq!(a.parent(), s.path().parent());
        assert!(a.file_name().unwrap().to_string_lossy().starts_with("recs.json.tmp."));
    }

    #[tokio::test]
    async fn two_stores_on_one_file_leave_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = Arc::new(store(&dir));
        let b = Arc::new(store(&dir));

        let mut handles = Vec::new();
        for id in 0..8 {
            let s = if id % 2 == 0 { a.clone() } else { b.clone() };
            handles.push(tokio::spawn(async move {
                s.update(|recs| {
                    recs.push(Rec { id });
                    Change::Write(())
                })
                .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert_eq!(file_names(&dir), vec!["recs.json".to_string()]);
        assert!(!a.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keep_does_not_touch_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        let n = s
            .update(|recs| {
                recs.push(Rec { id: 1 });
                Change::Keep(recs.len())
            })
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert!(!s.path().exists());
    }

    #[tokio::test]
    async fn concurrent_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let s = Arc::new(store(&dir));

        let mut handles = Vec::new();
        for id in 0..16 {
            let s = s.clone();
            handles.push(tokio::spawn(async move {
                s.update(|recs| {
                    recs.push(Rec { id });
                    Change::Write(())
                })
                .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let mut ids: Vec<u32> = s.load().await.unwrap().into_iter().map(|r| r.id).collect();
        ids.sort();
        assert_eq!(ids, (0..16).collect::<Vec<_>>());
    }
}
