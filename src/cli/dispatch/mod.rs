//! Map parsed CLI arguments to the action the binary executes.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{ARG_DATA_DIR, ARG_PORT, ARG_STATIC_DIR};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let data_dir = matches
        .get_one::<PathBuf>(ARG_DATA_DIR)
        .cloned()
        .context("missing required argument: --data-dir")?;
    let static_dir = matches.get_one::<PathBuf>(ARG_STATIC_DIR).cloned();

    Ok(Action::Server(Args {
        port,
        data_dir,
        static_dir,
    }))
}
