use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use blogicum_core::domain::{Category, Location, Post, PostChanges};

use super::{FormErrors, required_text};

/// Format produced by `<input type="datetime-local">`.
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const ACCEPTED_DATETIME_FORMATS: &[&str] = &[
    DATETIME_INPUT_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Post create/edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Checkbox: present when ticked.
    #[serde(default)]
    pub is_published: Option<String>,
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
}

impl PostFormData {
    /// Initial values for editing an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            is_published: post.is_published.then(|| "on".to_string()),
            pub_date: post.pub_date.format(DATETIME_INPUT_FORMAT).to_string(),
            category: post.category_id.map(|id| id.to_string()).unwrap_or_default(),
            location: post.location_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    /// Initial values for a new post: published, dated `now`.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            is_published: Some("on".to_string()),
            pub_date: now.format(DATETIME_INPUT_FORMAT).to_string(),
            ..Self::default()
        }
    }

    pub fn is_published_checked(&self) -> bool {
        self.is_published
            .as_deref()
            .is_some_and(|v| !matches!(v, "" | "false" | "off" | "0"))
    }

    /// Validate against the selectable categories and locations.
    ///
    /// An empty publication date means "now".
    pub fn clean(
        &self,
        categories: &[Category],
        locations: &[Location],
        now: DateTime<Utc>,
    ) -> Result<PostChanges, FormErrors> {
        let mut errors = FormErrors::new();

        let title = required_text(&mut errors, "title", &self.title, Some(256));
        let content = required_text(&mut errors, "content", &self.content, None);
        let pub_date = parse_datetime(&mut errors, "pub_date", &self.pub_date, now);
        let category_id = parse_choice(
            &mut errors,
            "category",
            &self.category,
            categories.iter().map(|c| c.id),
        );
        let location_id = parse_choice(
            &mut errors,
            "location",
            &self.location,
            locations.iter().map(|l| l.id),
        );
        let is_published = self.is_published_checked();

        errors.into_result(|| PostChanges {
            title,
            content,
            pub_date,
            is_published,
            category_id,
            location_id,
        })
    }
}

fn parse_datetime(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let value = value.trim();
    if value.is_empty() {
        return now;
    }

    ACCEPTED_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|| {
            errors.add(field, "Enter a valid date/time.");
            now
        })
}

fn parse_choice(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    mut valid_ids: impl Iterator<Item = i64>,
) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    match value.parse::<i64>() {
        Ok(id) if valid_ids.any(|valid| valid == id) => Some(id),
        _ => {
            errors.add(
                field,
                "Select a valid choice. That choice is not one of the available choices.",
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn category(id: i64) -> Category {
        Category {
            id,
            name: format!("cat-{id}"),
            description: String::new(),
            is_published: true,
            created_at: Utc::now(),
        }
    }

    fn valid() -> PostFormData {
        PostFormData {
            title: "  Hello  ".to_string(),
            content: "World".to_string(),
            is_published: Some("on".to_string()),
            pub_date: "2024-05-01T10:30".to_string(),
            category: "2".to_string(),
            location: String::new(),
        }
    }

    #[test]
    fn test_clean_valid_form() {
        let changes = valid().clean(&[category(2)], &[], Utc::now()).unwrap();

        assert_eq!(changes.title, "Hello");
        assert_eq!(changes.content, "World");
        assert!(changes.is_published);
        assert_eq!(
            changes.pub_date,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
        );
        assert_eq!(changes.category_id, Some(2));
        assert_eq!(changes.location_id, None);
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = PostFormData::default()
            .clean(&[], &[], Utc::now())
            .unwrap_err();

        assert!(errors.has("title"));
        assert!(errors.has("content"));
        assert!(!errors.has("pub_date"));
    }

    #[test]
    fn test_empty_date_defaults_to_now_and_unchecked_box_is_draft() {
        let now = Utc::now();
        let form = PostFormData {
            pub_date: String::new(),
            is_published: None,
            category: String::new(),
            ..valid()
        };

        let changes = form.clean(&[], &[], now).unwrap();
        assert_eq!(changes.pub_date, now);
        assert!(!changes.is_published);
    }

    #[test]
    fn test_unknown_category_and_bad_date_rejected() {
        let form = PostFormData {
            pub_date: "yesterday".to_string(),
            category: "9".to_string(),
            ..valid()
        };

        let errors = form.clean(&[category(2)], &[], Utc::now()).unwrap_err();
        assert!(errors.has("pub_date"));
        assert!(errors.has("category"));
    }

    #[test]
    fn test_title_length_limit() {
        let form = PostFormData {
            title: "x".repeat(257),
            ..valid()
        };

        let errors = form.clean(&[category(2)], &[], Utc::now()).unwrap_err();
        assert!(errors.has("title"));
    }

    #[test]
    fn test_from_post_round_trips_through_clean() {
        let date = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 0).unwrap();
        let post = Post {
            id: 1,
            title: "T".to_string(),
            content: "C".to_string(),
            pub_date: date,
            is_published: false,
            author_id: 1,
            category_id: Some(2),
            location_id: None,
            created_at: date,
        };

        let changes = PostFormData::from_post(&post)
            .clean(&[category(2)], &[], Utc::now())
            .unwrap();
        assert_eq!(changes.pub_date, date);
        assert!(!changes.is_published);
        assert_eq!(changes.category_id, Some(2));
    }
}
