//! Post detail and the author-only post pages.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::domain::{Category, Location, NewPost};
use blogicum_core::{Access, DomainError, authorize};
use blogicum_shared::forms::{CommentFormData, PostFormData};
use blogicum_shared::{BoundForm, FormErrors};

use super::{post_url, profile_url, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{self, PostDeleteTemplate, PostDetailTemplate, PostFormTemplate};

/// GET /posts/post/{post_pk}/
///
/// Anyone but the author gets a 404 for a post that is not publicly visible.
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let entry = state
        .posts
        .find_entry(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    let is_author = viewer
        .user_id()
        .is_some_and(|id| authorize(id, &entry.post, ()).is_authorized());

    if !is_author && !entry.is_public_at(Utc::now()) {
        return Err(DomainError::not_found("post", post_id).into());
    }

    let comments = state.comments.list_for_post(post_id).await?;

    views::render(&PostDetailTemplate {
        viewer: viewer.0,
        entry,
        is_author,
        comments,
        form: BoundForm::new(CommentFormData::default()),
    })
}

/// Categories and locations offered by the post form.
async fn choices(state: &AppState) -> AppResult<(Vec<Category>, Vec<Location>)> {
    let categories = state.categories.list().await?;
    let locations = state.locations.list().await?;
    Ok((categories, locations))
}

fn post_form_page(
    identity: Identity,
    heading: &'static str,
    action: String,
    form: BoundForm<PostFormData>,
    (categories, locations): (Vec<Category>, Vec<Location>),
) -> AppResult<HttpResponse> {
    views::render(&PostFormTemplate {
        viewer: Some(identity),
        heading,
        action,
        form,
        categories,
        locations,
    })
}

const CREATE_HEADING: &str = "New post";
const CREATE_ACTION: &str = "/posts/create/";
const EDIT_HEADING: &str = "Edit post";

/// GET /posts/create/
pub async fn create_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let choices = choices(&state).await?;

    post_form_page(
        identity,
        CREATE_HEADING,
        CREATE_ACTION.to_string(),
        BoundForm::new(PostFormData::initial(Utc::now())),
        choices,
    )
}

/// POST /posts/create/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let data = form.into_inner();
    let choices = choices(&state).await?;

    let changes = match data.clean(&choices.0, &choices.1, Utc::now()) {
        Ok(changes) => changes,
        Err(errors) => {
            return post_form_page(
                identity,
                CREATE_HEADING,
                CREATE_ACTION.to_string(),
                BoundForm::with_errors(data, errors),
                choices,
            );
        }
    };

    let post = state
        .posts
        .insert(NewPost::new(identity.user_id, changes))
        .await?;

    tracing::info!(post_id = post.id, author_id = post.author_id, "Post created");

    Ok(redirect(profile_url(&identity.username)))
}

/// GET /posts/post/{post_pk}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    if let Access::Forbidden(fallback) = authorize(identity.user_id, &post, post_url(post.id)) {
        return Ok(redirect(fallback));
    }

    let choices = choices(&state).await?;
    post_form_page(
        identity,
        EDIT_HEADING,
        format!("/posts/post/{}/edit/", post.id),
        BoundForm::new(PostFormData::from_post(&post)),
        choices,
    )
}

/// POST /posts/post/{post_pk}/edit/
///
/// Non-authors are sent back to the detail page and the post is untouched.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let mut post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    if let Access::Forbidden(fallback) = authorize(identity.user_id, &post, post_url(post.id)) {
        tracing::warn!(post_id, user_id = identity.user_id, "Edit of another user's post refused");
        return Ok(redirect(fallback));
    }

    let data = form.into_inner();
    let choices = choices(&state).await?;

    let changes = match data.clean(&choices.0, &choices.1, Utc::now()) {
        Ok(changes) => changes,
        Err(errors) => return edit_rerender(identity, post_id, data, errors, choices),
    };

    post.apply(changes);
    let post = state.posts.update(post).await?;

    tracing::info!(post_id = post.id, "Post updated");

    Ok(redirect(post_url(post.id)))
}

fn edit_rerender(
    identity: Identity,
    post_id: i64,
    data: PostFormData,
    errors: FormErrors,
    choices: (Vec<Category>, Vec<Location>),
) -> AppResult<HttpResponse> {
    post_form_page(
        identity,
        EDIT_HEADING,
        format!("/posts/post/{}/edit/", post_id),
        BoundForm::with_errors(data, errors),
        choices,
    )
}

/// GET /posts/post/{post_pk}/delete/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    match authorize(identity.user_id, &post, post_url(post.id)) {
        Access::Authorized => views::render(&PostDeleteTemplate {
            viewer: Some(identity),
            post,
        }),
        Access::Forbidden(fallback) => Ok(redirect(fallback)),
    }
}

/// POST /posts/post/{post_pk}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    if let Access::Forbidden(fallback) = authorize(identity.user_id, &post, post_url(post.id)) {
        tracing::warn!(post_id, user_id = identity.user_id, "Delete of another user's post refused");
        return Ok(redirect(fallback));
    }

    state.posts.delete(post.id).await?;
    tracing::info!(post_id, "Post deleted");

    Ok(redirect("/"))
}
