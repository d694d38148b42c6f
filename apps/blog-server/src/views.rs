//! Page templates.

use actix_web::HttpResponse;
use askama::Template;

use blogicum_core::domain::{Category, Comment, CommentEntry, Location, Post, PostEntry, User};
use blogicum_core::Page;
use blogicum_shared::BoundForm;
use blogicum_shared::ErrorResponse;
use blogicum_shared::forms::{
    CommentFormData, LoginFormData, PostFormData, ProfileFormData, RegistrationFormData,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};

/// Render a page into a `200 OK` HTML response.
pub fn render<T: Template>(template: &T) -> AppResult<HttpResponse> {
    let body = template
        .render()
        .map_err(|e| AppError::Internal(format!("Template rendering failed: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

pub(crate) fn render_error(error: &ErrorResponse) -> Result<String, askama::Error> {
    ErrorTemplate {
        viewer: None,
        error,
    }
    .render()
}

/// Public feed on the home page.
#[derive(Template)]
#[template(path = "blog/index.html")]
pub struct IndexTemplate {
    pub viewer: Option<Identity>,
    pub page: Page<PostEntry>,
}

/// Feed of one published category.
#[derive(Template)]
#[template(path = "blog/category.html")]
pub struct CategoryTemplate {
    pub viewer: Option<Identity>,
    pub category: Category,
    pub page: Page<PostEntry>,
}

/// A user's page with their posts.
#[derive(Template)]
#[template(path = "blog/profile.html")]
pub struct ProfileTemplate {
    pub viewer: Option<Identity>,
    pub profile: User,
    pub is_owner: bool,
    pub page: Page<PostEntry>,
}

#[derive(Template)]
#[template(path = "blog/detail.html")]
pub struct PostDetailTemplate {
    pub viewer: Option<Identity>,
    pub entry: PostEntry,
    pub is_author: bool,
    pub comments: Vec<CommentEntry>,
    pub form: BoundForm<CommentFormData>,
}

/// Create and edit share one form page.
#[derive(Template)]
#[template(path = "blog/create.html")]
pub struct PostFormTemplate {
    pub viewer: Option<Identity>,
    pub heading: &'static str,
    pub action: String,
    pub form: BoundForm<PostFormData>,
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
}

#[derive(Template)]
#[template(path = "blog/delete_post.html")]
pub struct PostDeleteTemplate {
    pub viewer: Option<Identity>,
    pub post: Post,
}

#[derive(Template)]
#[template(path = "blog/comment_edit.html")]
pub struct CommentFormTemplate {
    pub viewer: Option<Identity>,
    pub comment: Comment,
    pub form: BoundForm<CommentFormData>,
}

#[derive(Template)]
#[template(path = "blog/comment_delete.html")]
pub struct CommentDeleteTemplate {
    pub viewer: Option<Identity>,
    pub comment: Comment,
}

#[derive(Template)]
#[template(path = "blog/user.html")]
pub struct ProfileFormTemplate {
    pub viewer: Option<Identity>,
    pub form: BoundForm<ProfileFormData>,
}

#[derive(Template)]
#[template(path = "registration/login.html")]
pub struct LoginTemplate {
    pub viewer: Option<Identity>,
    pub form: BoundForm<LoginFormData>,
}

#[derive(Template)]
#[template(path = "registration/registration_form.html")]
pub struct RegistrationTemplate {
    pub viewer: Option<Identity>,
    pub form: BoundForm<RegistrationFormData>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    viewer: Option<Identity>,
    error: &'a ErrorResponse,
}
