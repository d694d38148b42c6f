use serde::Deserialize;

use blogicum_core::domain::{ProfileChanges, User};

use super::{FormErrors, optional_text, validate_email, validate_username};

/// Profile edit form. Username uniqueness needs the store and is checked
/// by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl ProfileFormData {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }

    pub fn clean(&self) -> Result<ProfileChanges, FormErrors> {
        let mut errors = FormErrors::new();

        let username = validate_username(&mut errors, "username", &self.username);
        let first_name = optional_text(&mut errors, "first_name", &self.first_name, Some(150));
        let last_name = optional_text(&mut errors, "last_name", &self.last_name, Some(150));
        let email = validate_email(&mut errors, "email", &self.email);

        errors.into_result(|| ProfileChanges {
            username,
            first_name,
            last_name,
            email,
        })
    }
}
