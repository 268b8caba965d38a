//! Registration and login on top of an [`AccountStore`].
//!
//! Every call returns exactly one outcome value. Validation failures never
//! reach the store, and storage failures are reported as `StorageError`
//! instead of being folded into "not found" or "duplicate".

mod forms;
mod validate;

pub use forms::{LoginForm, RegisterForm};
pub use validate::{present, valid_age};

use crate::store::{AccountStore, StoreError};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Success,
    InvalidInput,
    DuplicateUsername,
    StorageError,
}

impl RegistrationOutcome {
    /// Static page the browser is sent to, `None` when no page fits.
    #[must_use]
    pub const fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::Success => Some("/reg_success.html"),
            Self::InvalidInput => Some("/reg_info_error.html"),
            Self::DuplicateUsername => Some("/have_user.html"),
            Self::StorageError => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    InvalidInput,
    NotFound,
    WrongPassword,
    StorageError,
}

impl LoginOutcome {
    /// Static page the browser is sent to, `None` when no page fits.
    ///
    /// Unknown users and wrong passwords share a page so the response does
    /// not reveal which usernames exist.
    #[must_use]
    pub const fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::Success => Some("/login_success.html"),
            Self::InvalidInput => Some("/login_info_error.html"),
            Self::NotFound | Self::WrongPassword => Some("/login_fail.html"),
            Self::StorageError => None,
        }
    }
}

#[derive(Debug)]
pub struct AccountService<S> {
    store: Arc<S>,
}

impl<S> Clone for AccountService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: AccountStore> AccountService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate a registration form and create the account exactly once.
    #[instrument(skip_all)]
    pub fn register(&self, form: &RegisterForm) -> RegistrationOutcome {
        let account = match validate::registration(form) {
            Ok(account) => account,
            Err(reason) => {
                debug!("Invalid registration: {}", reason);
                return RegistrationOutcome::InvalidInput;
            }
        };

        match self.store.create(&account) {
            Ok(()) => {
                info!(username = %account.username, "Account registered");
                RegistrationOutcome::Success
            }
            Err(StoreError::AlreadyExists(username)) => {
                debug!(%username, "Username already registered");
                RegistrationOutcome::DuplicateUsername
            }
            Err(e) => {
                error!("Error creating account: {:?}", e);
                RegistrationOutcome::StorageError
            }
        }
    }

    /// Check a login form against the stored account.
    #[instrument(skip_all)]
    pub fn login(&self, form: &LoginForm) -> LoginOutcome {
        let (username, password) = match validate::login(form) {
            Ok(credentials) => credentials,
            Err(reason) => {
                debug!("Invalid login: {}", reason);
                return LoginOutcome::InvalidInput;
            }
        };

        match self.store.read(username) {
            Ok(account) => {
                if account.password == password {
                    debug!(%username, "Login successful");
                    LoginOutcome::Success
                } else {
                    debug!(%username, "Wrong password");
                    LoginOutcome::WrongPassword
                }
            }
            Err(StoreError::NotFound(_)) => {
                debug!(%username, "User not found");
                LoginOutcome::NotFound
            }
            Err(e) => {
                error!("Error reading account: {:?}", e);
                LoginOutcome::StorageError
            }
        }
    }
}
