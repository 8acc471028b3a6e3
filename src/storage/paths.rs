// SPDX-License-Identifier: AGPL-3.0-or-later

//! Path utilities for the JSON document layout.

use std::path::{Path, PathBuf};

use crate::config::DEFAULT_DATA_DIR;

/// Storage path utilities for the data directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the accounts document (JSON object keyed by account number).
    pub fn accounts_file(&self) -> PathBuf {
        self.root.join("accounts.json")
    }

    /// Path to the transaction log document (JSON array in append order).
    pub fn transactions_file(&self) -> PathBuf {
        self.root.join("transactions.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_is_data_dir() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("data"));
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.root(), Path::new("/tmp/test-data"));
        assert_eq!(
            paths.accounts_file(),
            PathBuf::from("/tmp/test-data/accounts.json")
        );
        assert_eq!(
            paths.transactions_file(),
            PathBuf::from("/tmp/test-data/transactions.json")
        );
    }
}
