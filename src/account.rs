use serde::{Deserialize, Serialize};

/// A registered account, persisted once per username and never modified.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub age: u32,
}

impl Account {
    #[must_use]
    pub fn new(username: String, password: String, nickname: String, age: u32) -> Self {
        Self {
            username,
            password,
            nickname,
            age,
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"***")
            .field("nickname", &self.nickname)
            .field("age", &self.age)
            .finish()
    }
}
