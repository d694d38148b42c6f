use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity - a named, independently publishable group of posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub is_published: bool,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, is_published: bool) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            is_published,
        }
    }
}
