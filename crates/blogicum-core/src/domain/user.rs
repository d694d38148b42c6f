use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - an authenticated author or reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// First and last name joined, falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Overwrite the editable profile fields.
    pub fn apply(&mut self, changes: ProfileChanges) {
        self.username = changes.username;
        self.first_name = changes.first_name;
        self.last_name = changes.last_name;
        self.email = changes.email;
    }
}

/// A user that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
            date_joined: Utc::now(),
        }
    }
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
