//! User profile page and profile editing.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::feed::load_page;
use blogicum_core::{DomainError, PostQuery, RepoError, authorize};
use blogicum_shared::{BoundForm, FormErrors};
use blogicum_shared::forms::ProfileFormData;

use super::{PageParams, profile_url, start_session, username_taken};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{self, ProfileFormTemplate, ProfileTemplate};

/// GET /profile/user/{username}/
///
/// The owner sees every post they wrote; everyone else sees only the
/// publicly visible ones.
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let profile = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", &username))?;

    let is_owner = viewer
        .user_id()
        .is_some_and(|id| authorize(id, &profile, ()).is_authorized());

    let query = if is_owner {
        PostQuery::all().by_author(profile.id)
    } else {
        PostQuery::public(Utc::now()).by_author(profile.id)
    };

    let page = load_page(
        state.posts.as_ref(),
        &query,
        params.page.as_deref(),
        state.site.posts_per_page,
    )
    .await?;

    views::render(&ProfileTemplate {
        viewer: viewer.0,
        profile,
        is_owner,
        page,
    })
}

/// GET /profile/edit/
pub async fn edit_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", identity.user_id))?;

    views::render(&ProfileFormTemplate {
        viewer: Some(identity),
        form: BoundForm::new(ProfileFormData::from_user(&user)),
    })
}

/// POST /profile/edit/
///
/// A rename re-issues the session so the new username is used from now on.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<ProfileFormData>,
) -> AppResult<HttpResponse> {
    let data = form.into_inner();

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", identity.user_id))?;

    let changes = match data.clean() {
        Ok(changes) => changes,
        Err(errors) => return rerender(identity, data, errors),
    };

    if changes.username != user.username {
        let taken = state
            .users
            .find_by_username(&changes.username)
            .await?
            .is_some_and(|other| other.id != user.id);

        if taken {
            return rerender(identity, data, username_taken());
        }
    }

    user.apply(changes);

    let user = match state.users.update(user).await {
        Ok(user) => user,
        // Lost a race for the username.
        Err(RepoError::Constraint(_)) => return rerender(identity, data, username_taken()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "Profile updated");

    start_session(&state, &user, &profile_url(&user.username))
}

fn rerender(identity: Identity, data: ProfileFormData, errors: FormErrors) -> AppResult<HttpResponse> {
    views::render(&ProfileFormTemplate {
        viewer: Some(identity),
        form: BoundForm::with_errors(data, errors),
    })
}
