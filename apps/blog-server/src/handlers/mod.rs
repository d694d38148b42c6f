//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod feed;
mod health;
mod posts;
mod profile;

use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;

use blogicum_core::domain::User;
use blogicum_shared::FormErrors;

use crate::middleware::auth::session_cookie;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// `?page=N` on listing pages. Kept raw so any value can be resolved.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// `302 Found` to `location`.
pub(crate) fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}

/// Issue a session token for `user` and redirect to `location`.
pub(crate) fn start_session(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;

    let mut response = redirect(location);
    response
        .add_cookie(&session_cookie(
            token,
            state.tokens.expiration_seconds(),
            state.site.secure_cookies,
        ))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response)
}

pub(crate) fn username_taken() -> FormErrors {
    let mut errors = FormErrors::new();
    errors.add("username", "A user with that username already exists.");
    errors
}

pub(crate) fn post_url(post_id: i64) -> String {
    format!("/posts/post/{}/", post_id)
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/user/{}/", urlencoding::encode(username))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/", web::get().to(feed::index))
        .route(
            "/categories/category/{category_name}/",
            web::get().to(feed::category_posts),
        )
        .service(
            web::scope("/posts")
                .service(
                    web::resource("/create/")
                        .route(web::get().to(posts::create_form))
                        .route(web::post().to(posts::create)),
                )
                .route("/post/{post_pk}/", web::get().to(posts::post_detail))
                .service(
                    web::resource("/post/{post_pk}/edit/")
                        .route(web::get().to(posts::edit_form))
                        .route(web::post().to(posts::edit)),
                )
                .service(
                    web::resource("/post/{post_pk}/delete/")
                        .route(web::get().to(posts::delete_confirm))
                        .route(web::post().to(posts::delete)),
                )
                .route(
                    "/post/{post_pk}/comment/add/",
                    web::post().to(comments::add_comment),
                )
                .service(
                    web::resource("/post/{post_pk}/comment/{comment_pk}/edit/")
                        .route(web::get().to(comments::edit_form))
                        .route(web::post().to(comments::edit)),
                )
                .service(
                    web::resource("/post/{post_pk}/comment/{comment_pk}/delete/")
                        .route(web::get().to(comments::delete_confirm))
                        .route(web::post().to(comments::delete)),
                ),
        )
        .service(
            web::scope("/profile")
                .service(
                    web::resource("/edit/")
                        .route(web::get().to(profile::edit_form))
                        .route(web::post().to(profile::edit)),
                )
                .route("/user/{username}/", web::get().to(profile::profile)),
        )
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .service(
                    web::resource("/logout/")
                        .route(web::get().to(auth::logout))
                        .route(web::post().to(auth::logout)),
                )
                .service(
                    web::resource("/registration/")
                        .route(web::get().to(auth::registration_form))
                        .route(web::post().to(auth::register)),
                ),
        );
}
