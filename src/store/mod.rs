//! Durable account storage keyed by username.
//!
//! The store only knows two operations: create a record if no record exists
//! for its username, and read a record back. Accounts are never updated or
//! deleted through it.

mod file;

pub use file::FileAccountStore;

use crate::account::Account;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account already exists: {0}")]
    AlreadyExists(String),
    #[error("account not found: {0}")]
    NotFound(String),
    #[error("empty username is not a valid storage key")]
    InvalidKey,
    #[error("storage i/o failed for {username}")]
    Io {
        username: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode or decode record for {username}")]
    Encoding {
        username: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("record stored for {username} belongs to {stored}")]
    KeyMismatch { username: String, stored: String },
}

impl StoreError {
    /// True for failures of the backing medium rather than of the request
    /// (`AlreadyExists` and `NotFound` are business answers).
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        !matches!(self, Self::AlreadyExists(_) | Self::NotFound(_))
    }
}

/// Keyed account storage with create-if-absent semantics.
pub trait AccountStore: Send + Sync {
    /// Persist `account` unless a record for its username already exists.
    ///
    /// The existence check and the write happen as one atomic step, and the
    /// record becomes visible to [`AccountStore::read`] only once complete.
    ///
    /// # Errors
    /// `AlreadyExists` when the username is taken, `InvalidKey` for an empty
    /// username, `Io`/`Encoding` when the backing medium fails.
    fn create(&self, account: &Account) -> Result<(), StoreError>;

    /// Load the account stored for `username`.
    ///
    /// # Errors
    /// `NotFound` when no record exists, `Io`/`Encoding` when the record
    /// cannot be read or decoded.
    fn read(&self, username: &str) -> Result<Account, StoreError>;
}
