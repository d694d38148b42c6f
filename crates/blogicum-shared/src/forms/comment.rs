use serde::Deserialize;

use blogicum_core::domain::{Comment, CommentChanges};

use super::{FormErrors, required_text};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentFormData {
    #[serde(default)]
    pub text: String,
}

impl CommentFormData {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
        }
    }

    pub fn clean(&self) -> Result<CommentChanges, FormErrors> {
        let mut errors = FormErrors::new();
        let text = required_text(&mut errors, "text", &self.text, None);
        errors.into_result(|| CommentChanges { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_comment_rejected() {
        let form = CommentFormData {
            text: "   \n ".to_string(),
        };
        assert!(form.clean().unwrap_err().has("text"));
    }

    #[test]
    fn test_comment_is_trimmed() {
        let form = CommentFormData {
            text: " Nice post! ".to_string(),
        };
        assert_eq!(form.clean().unwrap().text, "Nice post!");
    }
}
