use crate::{api::Accounts, GIT_COMMIT_HASH};
use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::error;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub build: String,
    pub name: String,
    pub version: String,
    pub storage: String,
}

// axum handler for health
pub async fn health(Extension(accounts): Extension<Accounts>) -> impl IntoResponse {
    let root = accounts.store().root().to_path_buf();
    let ping = task::spawn_blocking(move || accounts.store().ping()).await;

    let (status, storage) = match ping {
        Ok(Ok(())) => (StatusCode::OK, "ok"),
        Ok(Err(e)) => {
            error!("Storage root {} unavailable: {}", root.display(), e);

            (StatusCode::SERVICE_UNAVAILABLE, "error")
        }
        Err(e) => {
            error!("Storage check task failed: {}", e);

            (StatusCode::SERVICE_UNAVAILABLE, "error")
        }
    };

    let body = Json(Health {
        build: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage.to_string(),
    });

    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )) {
        headers.insert("X-App", value);
    }

    (status, headers, body)
}
