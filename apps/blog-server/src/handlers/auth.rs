//! Login, logout and sign-up pages.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use blogicum_core::RepoError;
use blogicum_core::domain::NewUser;
use blogicum_shared::forms::{LoginFormData, RegistrationFormData};
use blogicum_shared::{BoundForm, FormErrors};

use super::{redirect, start_session, username_taken};
use crate::middleware::auth::{OptionalIdentity, removal_cookie, safe_next};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::telemetry::mask_email;
use crate::views::{self, LoginTemplate, RegistrationTemplate};

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, Default, Deserialize)]
pub struct NextParams {
    pub next: Option<String>,
}

/// GET /auth/login/
pub async fn login_form(
    viewer: OptionalIdentity,
    params: web::Query<NextParams>,
) -> AppResult<HttpResponse> {
    let form = LoginFormData {
        next: params.into_inner().next.unwrap_or_default(),
        ..LoginFormData::default()
    };

    views::render(&LoginTemplate {
        viewer: viewer.0,
        form: BoundForm::new(form),
    })
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginFormData>,
) -> AppResult<HttpResponse> {
    let data = form.into_inner();

    let (username, password) = match data.clean() {
        Ok(credentials) => credentials,
        Err(errors) => return login_rerender(data, errors),
    };

    let user = match state.users.find_by_username(&username).await? {
        Some(user) if state.passwords.verify(&password, &user.password_hash)? => user,
        _ => {
            tracing::info!(%username, "Failed login attempt");
            let mut errors = FormErrors::new();
            errors.add_non_field(INVALID_LOGIN);
            return login_rerender(data, errors);
        }
    };

    tracing::info!(user_id = user.id, "User logged in");

    start_session(&state, &user, safe_next(&data.next))
}

fn login_rerender(data: LoginFormData, errors: FormErrors) -> AppResult<HttpResponse> {
    views::render(&LoginTemplate {
        viewer: None,
        form: BoundForm::with_errors(data.without_password(), errors),
    })
}

/// GET|POST /auth/logout/
pub async fn logout(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    if let Some(identity) = &viewer.0 {
        tracing::info!(user_id = identity.user_id, "User logged out");
    }

    let mut response = redirect("/");
    response
        .add_removal_cookie(&removal_cookie())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response)
}

/// GET /auth/registration/
pub async fn registration_form(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    views::render(&RegistrationTemplate {
        viewer: viewer.0,
        form: BoundForm::new(RegistrationFormData::default()),
    })
}

/// POST /auth/registration/
///
/// A new account is logged in straight away.
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegistrationFormData>,
) -> AppResult<HttpResponse> {
    let data = form.into_inner();

    let registration = match data.clean() {
        Ok(registration) => registration,
        Err(errors) => return registration_rerender(data, errors),
    };

    if state
        .users
        .find_by_username(&registration.username)
        .await?
        .is_some()
    {
        return registration_rerender(data, username_taken());
    }

    let password_hash = state.passwords.hash(&registration.password)?;
    let new_user = NewUser::new(registration.username, registration.email, password_hash);

    let user = match state.users.insert(new_user).await {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => return registration_rerender(data, username_taken()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        email = %mask_email(&user.email),
        "User registered"
    );

    start_session(&state, &user, "/")
}

fn registration_rerender(data: RegistrationFormData, errors: FormErrors) -> AppResult<HttpResponse> {
    views::render(&RegistrationTemplate {
        viewer: None,
        form: BoundForm::with_errors(data.without_passwords(), errors),
    })
}
