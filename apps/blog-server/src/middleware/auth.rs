//! Session handling: the identity extractors and the session cookie.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use std::future::{Ready, ready};

use blogicum_core::ports::{AuthError, TokenClaims};

use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "blogicum_session";

/// Where anonymous visitors are sent for auth-only pages.
pub const LOGIN_URL: &str = "/auth/login/";

/// Authenticated user identity extractor.
///
/// Handlers that take an `Identity` are login-only: an anonymous request is
/// redirected to the login page with `next` pointing back at it.
/// ```ignore
/// async fn create_post(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Raised when a login-only route is hit without a valid session.
#[derive(Debug)]
pub struct AuthenticationError {
    pub reason: AuthError,
    /// Path (and query) to come back to after logging in.
    pub next: String,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, login_redirect(&self.next)))
            .finish()
    }
}

/// `/auth/login/?next=<path>`.
pub fn login_redirect(next: &str) -> String {
    format!("{}?next={}", LOGIN_URL, urlencoding::encode(next))
}

/// Accept only local absolute paths as a post-login destination.
///
/// Browsers drop tabs and newlines while parsing a URL, so any control
/// character is refused before the `//` check.
pub fn safe_next(next: &str) -> &str {
    if next.chars().any(char::is_control) {
        return "/";
    }
    let is_local = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
    if is_local { next } else { "/" }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let token = session_token(req).ok_or(AuthError::MissingAuth)?;
    state.tokens.validate_token(&token).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(req).map_err(|reason| {
            tracing::debug!(path = %req.path(), %reason, "Login required");

            let next = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| req.path().to_string());

            AuthenticationError { reason, next }
        });

        ready(result)
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}

/// The session cookie for a freshly issued token.
pub fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// A cookie that makes the browser drop the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}
