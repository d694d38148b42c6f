use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Comment entity - a reader's note on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub post_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn apply(&mut self, changes: CommentChanges) {
        self.text = changes.text;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentChanges {
    pub text: String,
}

/// A comment that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub post_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

impl NewComment {
    pub fn new(post_id: i64, author_id: i64, changes: CommentChanges) -> Self {
        Self {
            text: changes.text,
            post_id,
            author_id,
            created_at: Utc::now(),
        }
    }
}

/// A comment joined with its author.
#[derive(Debug, Clone, Serialize)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author: User,
}
