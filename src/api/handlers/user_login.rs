use crate::{api::Accounts, service::LoginForm};
use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::task;
use tracing::{debug, error, instrument};

use super::redirect_or_error;

// axum handler for the login form
#[instrument(skip(accounts, payload))]
pub async fn login(accounts: Extension<Accounts>, payload: Option<Form<LoginForm>>) -> Response {
    let form = payload.map(|Form(form)| form).unwrap_or_default();

    debug!("form: {:?}", form);

    let Extension(accounts) = accounts;
    let outcome = match task::spawn_blocking(move || accounts.login(&form)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Login task failed: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error checking credentials".to_string(),
            )
                .into_response();
        }
    };

    debug!("outcome: {:?}", outcome);

    redirect_or_error(outcome.redirect_path(), "Error reading user")
}
