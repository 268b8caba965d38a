use crate::{api, service::AccountService, store::FileAccountStore};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub data_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the data directory cannot be prepared or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let store = FileAccountStore::new(&args.data_dir).with_context(|| {
        format!(
            "Could not prepare data directory {}",
            args.data_dir.display()
        )
    })?;

    let accounts = AccountService::new(Arc::new(store));

    api::new(args.port, accounts, args.static_dir.as_deref()).await
}
