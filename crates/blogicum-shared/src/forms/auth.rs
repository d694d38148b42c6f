use serde::Deserialize;

use super::{FormErrors, REQUIRED, validate_email, validate_username};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Where to go after a successful login.
    #[serde(default)]
    pub next: String,
}

impl LoginFormData {
    /// Returns the trimmed username and the password as typed.
    pub fn clean(&self) -> Result<(String, String), FormErrors> {
        let mut errors = FormErrors::new();

        let username = self.username.trim().to_string();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }

        errors.into_result(|| (username, self.password.clone()))
    }

    /// The password is never echoed back into the form.
    pub fn without_password(&self) -> Self {
        Self {
            password: String::new(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// A validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationFormData {
    pub fn clean(&self) -> Result<Registration, FormErrors> {
        let mut errors = FormErrors::new();

        let username = validate_username(&mut errors, "username", &self.username);
        let email = validate_email(&mut errors, "email", &self.email);

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        } else {
            if self.password1.chars().count() < MIN_PASSWORD_LENGTH {
                errors.add(
                    "password1",
                    format!(
                        "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
                    ),
                );
            }
            if self.password1.chars().all(|c| c.is_ascii_digit()) {
                errors.add("password1", "This password is entirely numeric.");
            }
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(|| Registration {
            username,
            email,
            password: self.password1.clone(),
        })
    }

    pub fn without_passwords(&self) -> Self {
        Self {
            password1: String::new(),
            password2: String::new(),
            ..self.clone()
        }
    }
}
