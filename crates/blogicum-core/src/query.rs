//! Filter criteria for post listings.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post};

/// Which posts a listing may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Drafts, scheduled and uncategorised posts included.
    All,
    /// Only posts passing the public visibility predicate at the given instant.
    PublicAt(DateTime<Utc>),
}

/// Criteria for a post listing. Results are always ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub visibility: Visibility,
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl PostQuery {
    /// Posts any reader may see at `now`.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            visibility: Visibility::PublicAt(now),
            author_id: None,
            category_id: None,
        }
    }

    /// Every post regardless of publication state.
    pub fn all() -> Self {
        Self {
            visibility: Visibility::All,
            author_id: None,
            category_id: None,
        }
    }

    pub fn by_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Evaluate the criteria against a single post and its category.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.author_id.is_some_and(|id| id != post.author_id) {
            return false;
        }
        if self.category_id.is_some() && self.category_id != post.category_id {
            return false;
        }
        match self.visibility {
            Visibility::All => true,
            Visibility::PublicAt(now) => post.is_public_at(category, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn post(author_id: i64, category_id: Option<i64>, is_published: bool) -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            title: "t".to_string(),
            content: "c".to_string(),
            pub_date: now - TimeDelta::minutes(5),
            is_published,
            author_id,
            category_id,
            location_id: None,
            created_at: now,
        }
    }

    fn category(id: i64, is_published: bool) -> Category {
        Category {
            id,
            name: format!("c{id}"),
            description: String::new(),
            is_published,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_all_matches_drafts_of_author() {
        let query = PostQuery::all().by_author(3);

        assert!(query.matches(&post(3, None, false), None));
        assert!(!query.matches(&post(4, None, false), None));
    }

    #[test]
    fn test_public_excludes_hidden_category() {
        let query = PostQuery::public(Utc::now());

        assert!(query.matches(&post(1, Some(2), true), Some(&category(2, true))));
        assert!(!query.matches(&post(1, Some(2), true), Some(&category(2, false))));
        assert!(!query.matches(&post(1, Some(2), false), Some(&category(2, true))));
    }

    #[test]
    fn test_category_filter() {
        let query = PostQuery::public(Utc::now()).in_category(2);

        assert!(query.matches(&post(1, Some(2), true), Some(&category(2, true))));
        assert!(!query.matches(&post(1, Some(5), true), Some(&category(5, true))));
    }
}
