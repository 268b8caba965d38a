//! Raw field sets as submitted by a client.
//!
//! Every field is optional: an absent field (`None`) and an empty one
//! (`Some("")`) are kept apart here and only collapsed by validation.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize, Debug, Default)]
pub struct RegisterForm {
    pub username: Option<String>,
    #[serde(default, deserialize_with = "secret")]
    pub password: Option<SecretString>,
    pub nickname: Option<String>,
    pub age: Option<String>,
}

impl RegisterForm {
    /// Form with all four fields present.
    #[must_use]
    pub fn new(username: &str, password: &str, nickname: &str, age: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            password: Some(SecretString::from(password.to_string())),
            nickname: Some(nickname.to_string()),
            age: Some(age.to_string()),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct LoginForm {
    pub username: Option<String>,
    #[serde(default, deserialize_with = "secret")]
    pub password: Option<SecretString>,
}

impl LoginForm {
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            password: Some(SecretString::from(password.to_string())),
        }
    }
}

fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}
