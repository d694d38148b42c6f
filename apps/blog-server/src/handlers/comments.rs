//! Comment handlers. All of them are login-only.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::{Comment, NewComment};
use blogicum_core::{Access, DomainError, authorize};
use blogicum_shared::BoundForm;
use blogicum_shared::forms::CommentFormData;

use super::{post_url, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{self, CommentDeleteTemplate, CommentFormTemplate};

/// POST /posts/post/{post_pk}/comment/add/
///
/// Redirects to the post either way; an invalid comment is dropped.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    form: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    match form.clean() {
        Ok(changes) => {
            let comment = state
                .comments
                .insert(NewComment::new(post.id, identity.user_id, changes))
                .await?;
            tracing::info!(comment_id = comment.id, post_id, "Comment added");
        }
        Err(errors) => {
            tracing::warn!(post_id, user_id = identity.user_id, ?errors, "Invalid comment dropped");
        }
    }

    Ok(redirect(post_url(post.id)))
}

/// Load a comment addressed as `/posts/post/{post_pk}/comment/{comment_pk}/`.
/// A comment that belongs to another post is treated as missing.
async fn load_comment(state: &AppState, post_id: i64, comment_id: i64) -> AppResult<Comment> {
    state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|comment| comment.post_id == post_id)
        .ok_or_else(|| {
            DomainError::not_found("comment", format!("{} on post {}", comment_id, post_id)).into()
        })
}

/// GET /posts/post/{post_pk}/comment/{comment_pk}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = load_comment(&state, post_id, comment_id).await?;

    match authorize(identity.user_id, &comment, post_url(post_id)) {
        Access::Authorized => views::render(&CommentFormTemplate {
            viewer: Some(identity),
            form: BoundForm::new(CommentFormData::from_comment(&comment)),
            comment,
        }),
        Access::Forbidden(fallback) => Ok(redirect(fallback)),
    }
}

/// POST /posts/post/{post_pk}/comment/{comment_pk}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
    form: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let mut comment = load_comment(&state, post_id, comment_id).await?;

    if let Access::Forbidden(fallback) = authorize(identity.user_id, &comment, post_url(post_id)) {
        tracing::warn!(comment_id, user_id = identity.user_id, "Edit of another user's comment refused");
        return Ok(redirect(fallback));
    }

    let data = form.into_inner();
    let changes = match data.clean() {
        Ok(changes) => changes,
        Err(errors) => {
            return views::render(&CommentFormTemplate {
                viewer: Some(identity),
                comment,
                form: BoundForm::with_errors(data, errors),
            });
        }
    };

    comment.apply(changes);
    state.comments.update(comment).await?;
    tracing::info!(comment_id, post_id, "Comment updated");

    Ok(redirect(post_url(post_id)))
}

/// GET /posts/post/{post_pk}/comment/{comment_pk}/delete/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = load_comment(&state, post_id, comment_id).await?;

    match authorize(identity.user_id, &comment, post_url(post_id)) {
        Access::Authorized => views::render(&CommentDeleteTemplate {
            viewer: Some(identity),
            comment,
        }),
        Access::Forbidden(fallback) => Ok(redirect(fallback)),
    }
}

/// POST /posts/post/{post_pk}/comment/{comment_pk}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = load_comment(&state, post_id, comment_id).await?;

    if let Access::Forbidden(fallback) = authorize(identity.user_id, &comment, post_url(post_id)) {
        tracing::warn!(comment_id, user_id = identity.user_id, "Delete of another user's comment refused");
        return Ok(redirect(fallback));
    }

    state.comments.delete(comment.id).await?;
    tracing::info!(comment_id, post_id, "Comment deleted");

    Ok(redirect(post_url(post_id)))
}
