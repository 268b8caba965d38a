//! # Userbook (username/password account registry)
//!
//! `userbook` stores one record per username and authenticates logins against
//! it. The crate is split in two layers:
//!
//! - **Core:** [`store`] owns the durable, per-username records and
//!   [`service`] validates raw form fields and turns every request into a
//!   typed outcome.
//! - **Glue:** [`api`] exposes the classic HTML form endpoints (`/regUser`,
//!   `/loginUser`) and answers with redirects to static pages, and [`cli`]
//!   wires configuration, logging and the server together.
//!
//! ## Storage
//!
//! Every account lives in its own JSON file under a configurable data
//! directory. Records are published with a hard link from a fully written
//! temp file, so a username is claimed exactly once even under concurrent
//! registrations and readers never observe a half written record.
//!
//! ## Passwords
//!
//! Passwords are stored and compared as plaintext to stay compatible with
//! existing records. They are kept out of logs and `Debug` output.

pub mod account;
pub mod api;
pub mod cli;
pub mod service;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
