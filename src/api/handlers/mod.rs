pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

// common functions for the handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Send the browser to the page for an outcome, or answer 500 when the
/// outcome has no page (storage failures).
pub(crate) fn redirect_or_error(path: Option<&'static str>, error: &'static str) -> Response {
    match path {
        Some(path) => Redirect::to(path).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response(),
    }
}
