use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location entity - an optional place tag on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub is_published: bool,
}

impl NewLocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_published: true,
        }
    }
}
