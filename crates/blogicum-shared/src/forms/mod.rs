//! Browser form payloads and their validation.
//!
//! Every payload deserializes from `application/x-www-form-urlencoded`
//! with all fields optional, so a missing field surfaces as a field error
//! rather than a rejected request. `clean` either returns the validated
//! domain values or a [`FormErrors`] map; nothing is persisted on failure.

mod auth;
mod comment;
mod post;
mod profile;

use std::collections::BTreeMap;

pub use auth::{LoginFormData, Registration, RegistrationFormData};
pub use comment::CommentFormData;
pub use post::{DATETIME_INPUT_FORMAT, PostFormData};
pub use profile::ProfileFormData;

pub(crate) const REQUIRED: &str = "This field is required.";

/// Field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Record an error that belongs to the form as a whole.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Messages for `field`, empty when it validated.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    /// `Ok(value())` when no error was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// Submitted (or initial) values paired with their validation errors,
/// ready to be rendered back into a form.
#[derive(Debug, Clone, Default)]
pub struct BoundForm<T> {
    pub data: T,
    pub errors: FormErrors,
}

impl<T> BoundForm<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: FormErrors::new(),
        }
    }

    pub fn with_errors(data: T, errors: FormErrors) -> Self {
        Self { data, errors }
    }
}

/// Trimmed value of a required text field, recording an error when blank
/// or longer than `max_chars`.
pub(crate) fn required_text(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    max_chars: Option<usize>,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else {
        check_length(errors, field, value, max_chars);
    }
    value.to_string()
}

/// Trimmed value of an optional text field.
pub(crate) fn optional_text(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    max_chars: Option<usize>,
) -> String {
    let value = value.trim();
    check_length(errors, field, value, max_chars);
    value.to_string()
}

fn check_length(errors: &mut FormErrors, field: &'static str, value: &str, max: Option<usize>) {
    if let Some(max) = max {
        let len = value.chars().count();
        if len > max {
            errors.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
        }
    }
}

/// Usernames: up to 150 letters, digits and `@.+-_`.
pub(crate) fn validate_username(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
    let username = required_text(errors, field, value, Some(150));
    if !username.is_empty()
        && !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add(
            field,
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    username
}

/// Optional e-mail address with a minimal shape check.
pub(crate) fn validate_email(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
    let email = optional_text(errors, field, value, Some(254));
    if email.is_empty() {
        return email;
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.add(field, "Enter a valid email address.");
    }
    email
}
