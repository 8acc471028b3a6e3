// SPDX-License-Identifier: AGPL-3.0-or-later

//! Whole-file JSON document persistence.
//!
//! Every mutation rewrites the full document: serialize to a temp file,
//! then rename over the old one so the document is valid JSON after every
//! write. Reads recover from a missing or corrupt document by treating it
//! as empty; write faults are never masked.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for document storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// JSON document store rooted at a data directory.
///
/// [`DocumentStore::open`] ensures the directory and both backing documents
/// exist; it is idempotent and safe to call repeatedly against the same
/// location.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    paths: StoragePaths,
}

impl DocumentStore {
    /// Open a document store, creating the data directory and seeding any
    /// missing document with its empty form (`{}` for accounts, `[]` for
    /// the transaction log).
    pub fn open(paths: StoragePaths) -> StorageResult<Self> {
        fs::create_dir_all(paths.root())?;

        let store = Self { paths };
        store.seed_if_missing(&store.paths.accounts_file(), &serde_json::json!({}))?;
        store.seed_if_missing(&store.paths.transactions_file(), &serde_json::json!([]))?;
        Ok(store)
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    fn seed_if_missing(&self, path: &Path, empty: &serde_json::Value) -> StorageResult<()> {
        if !path.exists() {
            self.write_document(path, empty)?;
        }
        Ok(())
    }

    /// Read a JSON document and deserialize it.
    ///
    /// A missing file or unparseable content yields `T::default()` (the
    /// empty collection); any other I/O failure propagates.
    pub fn read_document<T>(&self, path: impl AsRef<Path>) -> StorageResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("unreadable document {}: {e}", path.display());
                Ok(T::default())
            }
        }
    }

    /// Write a JSON document (atomic write via rename).
    pub fn write_document<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        let path = path.as_ref();

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::env;

    fn test_store() -> DocumentStore {
        let test_dir = env::temp_dir().join(format!("test-documents-{}", uuid::Uuid::new_v4()));
        DocumentStore::open(StoragePaths::new(&test_dir)).expect("Failed to open test store")
    }

    fn cleanup(store: &DocumentStore) {
        let _ = fs::remove_dir_all(store.paths().root());
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
    struct TestDoc {
        entries: Vec<String>,
    }

    #[test]
    fn open_seeds_empty_documents() {
        let store = test_store();

        let accounts: HashMap<String, serde_json::Value> =
            store.read_document(store.paths().accounts_file()).unwrap();
        assert!(accounts.is_empty());

        let transactions: Vec<serde_json::Value> = store
            .read_document(store.paths().transactions_file())
            .unwrap();
        assert!(transactions.is_empty());

        cleanup(&store);
    }

    #[test]
    fn open_is_idempotent() {
        let store = test_store();

        let doc = TestDoc {
            entries: vec!["kept".into()],
        };
        let path = store.paths().root().join("doc.json");
        store.write_document(&path, &doc).unwrap();

        // Re-opening the same location must not clobber existing data.
        let reopened = DocumentStore::open(store.paths().clone()).unwrap();
        let read: TestDoc = reopened.read_document(&path).unwrap();
        assert_eq!(read, doc);

        cleanup(&store);
    }

    #[test]
    fn write_and_read_round_trip() {
        let store = test_store();
        let doc = TestDoc {
            entries: vec!["a".into(), "b".into()],
        };

        let path = store.paths().root().join("doc.json");
        store.write_document(&path, &doc).unwrap();

        let read: TestDoc = store.read_document(&path).unwrap();
        assert_eq!(read, doc);

        cleanup(&store);
    }

    #[test]
    fn missing_document_reads_as_default() {
        let store = test_store();

        let read: TestDoc = store
            .read_document(store.paths().root().join("absent.json"))
            .unwrap();
        assert_eq!(read, TestDoc::default());

        cleanup(&store);
    }

    #[test]
    fn corrupt_document_reads_as_default() {
        let store = test_store();

        let path = store.paths().root().join("corrupt.json");
        fs::write(&path, b"{not json").unwrap();

        let read: TestDoc = store.read_document(&path).unwrap();
        assert_eq!(read, TestDoc::default());

        cleanup(&store);
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let store = test_store();

        let path = store.paths().root().join("doc.json");
        store
            .write_document(&path, &TestDoc::default())
            .unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        cleanup(&store);
    }
}
