// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! by callers when constructing a [`crate::LedgerStore`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory holding the JSON documents | `data` |
//! | `SESSION_SECRET` | HMAC key for signing session tokens | Required for the web layer |
//! | `RUST_LOG` | Log level filter | `info` |

/// Environment variable name for the data directory path.
///
/// Both backing documents (`accounts.json`, `transactions.json`) live
/// directly under this directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory, relative to the process working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Environment variable name for the session token signing secret.
pub const SESSION_SECRET_ENV: &str = "SESSION_SECRET";

/// First account number handed out. New accounts scan upward from here
/// until an unused number is found.
pub const ACCOUNT_NUMBER_BASE: u64 = 1_000_000_001;

/// Default page size for transaction history queries.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// PBKDF2 iteration count for newly hashed passwords.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Default session token lifetime in seconds (15 minutes).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 900;
