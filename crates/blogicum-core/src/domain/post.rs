use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Location, User};

/// Post entity - a published or draft blog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Whether readers other than the author may see this post at `now`.
    ///
    /// Requires the post's own flag, a published category, and a
    /// publication date that is not in the future. A post without a
    /// category is never public.
    pub fn is_public_at(&self, category: Option<&Category>, now: DateTime<Utc>) -> bool {
        self.is_published && category.is_some_and(|c| c.is_published) && self.pub_date <= now
    }

    /// Overwrite the fields editable through the post form.
    pub fn apply(&mut self, changes: PostChanges) {
        self.title = changes.title;
        self.content = changes.content;
        self.pub_date = changes.pub_date;
        self.is_published = changes.is_published;
        self.category_id = changes.category_id;
        self.location_id = changes.location_id;
    }
}

/// Fields submitted through the post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
}

/// A post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Create a post owned by `author_id` from submitted form data.
    pub fn new(author_id: i64, changes: PostChanges) -> Self {
        Self {
            title: changes.title,
            content: changes.content,
            pub_date: changes.pub_date,
            is_published: changes.is_published,
            author_id,
            category_id: changes.category_id,
            location_id: changes.location_id,
            created_at: Utc::now(),
        }
    }
}

/// A post joined with its author, category and location, annotated with
/// the number of comments referencing it.
#[derive(Debug, Clone, Serialize)]
pub struct PostEntry {
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

impl PostEntry {
    pub fn is_public_at(&self, now: DateTime<Utc>) -> bool {
        self.post.is_public_at(self.category.as_ref(), now)
    }
}
