//! One-JSON-file-per-account store.
//!
//! Records live at `<root>/<encoded username>.json`. A record is first written
//! to a private temp file and then published with `hard_link`, which refuses
//! to replace an existing path. That single syscall is both the existence
//! check and the write, so two registrations of the same username can never
//! both succeed, and the record path only ever names a complete file.
//!
//! Usernames whose escaped form would not fit in a file name are stored under
//! `~<sha256 hex>.json` instead. Reads check the username inside the record,
//! so a hashed name can never hand back another account.

use super::{AccountStore, StoreError};
use crate::account::Account;
use sha2::{Digest, Sha256};
use std::{
    fmt::Write as _,
    fs::{self, OpenOptions},
    io::{self, ErrorKind, Write as _},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};
use ulid::Ulid;

const RECORD_EXTENSION: &str = "json";

/// Longest escaped stem stored verbatim. Leaves room for the extension under
/// the usual 255 byte file name limit.
const MAX_STEM_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct FileAccountStore {
    root: PathBuf,
}

impl FileAccountStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!("account store root: {}", root.display());
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the storage root is still a reachable directory.
    ///
    /// # Errors
    /// Returns an error if the root is missing or not a directory.
    pub fn ping(&self) -> io::Result<()> {
        let metadata = fs::metadata(&self.root)?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "{} is not a directory",
                self.root.display()
            )))
        }
    }

    fn record_path(&self, username: &str) -> PathBuf {
        self.root
            .join(format!("{}.{RECORD_EXTENSION}", record_stem(username)))
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(format!(".{}.tmp", Ulid::new()))
    }

    fn sync_root(&self) -> io::Result<()> {
        #[cfg(unix)]
        {
            fs::File::open(&self.root)?.sync_all()?;
        }
        Ok(())
    }
}

impl AccountStore for FileAccountStore {
    #[instrument(skip_all, fields(username = %account.username))]
    fn create(&self, account: &Account) -> Result<(), StoreError> {
        if account.username.is_empty() {
            return Err(StoreError::InvalidKey);
        }

        let record = serde_json::to_vec_pretty(account).map_err(|source| StoreError::Encoding {
            username: account.username.clone(),
            source,
        })?;

        self.publish(
            account,
            &record,
            |temp, target| fs::hard_link(temp, target),
            || self.sync_root(),
        )
    }

    #[instrument(skip(self))]
    fn read(&self, username: &str) -> Result<Account, StoreError> {
        if username.is_empty() {
            return Err(StoreError::InvalidKey);
        }

        let bytes = match fs::read(self.record_path(username)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(username.to_string()));
            }
            Err(source) => {
                return Err(StoreError::Io {
                    username: username.to_string(),
                    source,
                });
            }
        };

        let account: Account =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Encoding {
                username: username.to_string(),
                source,
            })?;

        if account.username != username {
            return Err(StoreError::KeyMismatch {
                username: username.to_string(),
                stored: account.username,
            });
        }

        Ok(account)
    }
}

impl FileAccountStore {
    /// Write `record` to a temp file and link it into place.
    ///
    /// Once `link` succeeds the account exists, so a failing directory sync
    /// afterwards is only logged.
    fn publish(
        &self,
        account: &Account,
        record: &[u8],
        link: impl FnOnce(&Path, &Path) -> io::Result<()>,
        sync_dir: impl FnOnce() -> io::Result<()>,
    ) -> Result<(), StoreError> {
        let target = self.record_path(&account.username);
        let temp = self.temp_path();

        let published = write_synced(&temp, record).and_then(|()| link(&temp, &target));

        // The temp name is private to this call; drop it whatever happened.
        if let Err(e) = fs::remove_file(&temp) {
            if e.kind() != ErrorKind::NotFound {
                warn!("could not remove temp file {}: {}", temp.display(), e);
            }
        }

        match published {
            Ok(()) => {
                if let Err(e) = sync_dir() {
                    warn!("account record created but directory sync failed: {}", e);
                }
                debug!("account record created");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("account record already present");
                Err(StoreError::AlreadyExists(account.username.clone()))
            }
            Err(source) => Err(StoreError::Io {
                username: account.username.clone(),
                source,
            }),
        }
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// File stem for `username`: the escaped name, or `~` and the SHA-256 hex
/// digest when the escaped name is too long. `~` is always escaped by
/// [`encode_key`], so the two forms never collide.
fn record_stem(username: &str) -> String {
    let encoded = encode_key(username);
    if encoded.len() <= MAX_STEM_LEN {
        return encoded;
    }

    let digest = Sha256::digest(username.as_bytes());
    let mut stem = String::with_capacity(1 + digest.len() * 2);
    stem.push('~');
    for byte in digest.iter() {
        let _ = write!(stem, "{byte:02x}");
    }
    stem
}

/// Map a username to a file stem that cannot leave the root directory.
///
/// `[A-Za-z0-9_-]` is kept as is, every other byte becomes `%XX`. The mapping
/// is injective and never yields a leading dot, so record names cannot clash
/// with temp files.
fn encode_key(username: &str) -> String {
    let mut encoded = String::with_capacity(username.len());
    for byte in username.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}
