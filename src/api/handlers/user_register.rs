use crate::{api::Accounts, service::RegisterForm};
use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::task;
use tracing::{debug, error, instrument};

use super::redirect_or_error;

// axum handler for the registration form, fields come from the query string
// on GET and from the urlencoded body on POST
#[instrument(skip(accounts, payload))]
pub async fn register(
    accounts: Extension<Accounts>,
    payload: Option<Form<RegisterForm>>,
) -> Response {
    // an unreadable body counts as a form with every field missing
    let form = payload.map(|Form(form)| form).unwrap_or_default();

    debug!("form: {:?}", form);

    let Extension(accounts) = accounts;
    let outcome = match task::spawn_blocking(move || accounts.register(&form)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Registration task failed: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error registering user".to_string(),
            )
                .into_response();
        }
    };

    debug!("outcome: {:?}", outcome);

    redirect_or_error(outcome.redirect_path(), "Error storing user")
}
