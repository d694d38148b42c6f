//! Error handling - HTML error pages carrying the request id.

use actix_web::{
    HttpMessage, HttpResponse, ResponseError,
    body::MessageBody,
    dev::ServiceResponse,
    http::StatusCode,
    middleware::{ErrorHandlerResponse, ErrorHandlers},
};
use blogicum_core::error::{DomainError, RepoError};
use blogicum_core::ports::AuthError;
use blogicum_shared::ErrorResponse;
use std::fmt;

use crate::observability::RequestId;
use crate::views;

/// Application-level error type rendered as an HTML error page.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn payload(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => {
                tracing::debug!("Not found: {}", detail);
                ErrorResponse::not_found("The page you requested does not exist.")
            }
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = self.payload();
        let mut response = html_error(self.status_code(), &error);
        // Picked up by `error_pages` to re-render with the request id.
        response.extensions_mut().insert(error);
        response
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => {
                tracing::warn!("Constraint violation: {}", msg);
                AppError::BadRequest("The submitted data conflicts with existing records".into())
            }
            RepoError::Connection(msg) => AppError::Internal(format!("Database connection: {}", msg)),
            RepoError::Query(msg) => AppError::Internal(format!("Database query: {}", msg)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Internal(format!("Auth service: {}", err))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

fn html_error(status: StatusCode, error: &ErrorResponse) -> HttpResponse {
    match views::render_error(error) {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(error.title.clone())
        }
    }
}

/// Middleware turning every 404/500 into the HTML error page, stamped with
/// the request id. Covers unmatched routes as well as handler errors.
pub fn error_pages<B: MessageBody + 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, render_error_page)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, render_error_page)
}

fn render_error_page<B: MessageBody + 'static>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let status = res.status();

    let error = res
        .response()
        .extensions()
        .get::<ErrorResponse>()
        .cloned()
        .unwrap_or_else(|| default_payload(status));

    let error = match res.request().extensions().get::<RequestId>() {
        Some(id) => error.with_request_id(id.as_str()),
        None => error,
    };

    let (req, _) = res.into_parts();
    let response = html_error(status, &error);

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

fn default_payload(status: StatusCode) -> ErrorResponse {
    if status == StatusCode::NOT_FOUND {
        ErrorResponse::not_found("The page you requested does not exist.")
    } else {
        ErrorResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error"),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::header;

    use super::*;

    #[test]
    fn test_repo_not_found_maps_to_404() {
        let err = AppError::from(RepoError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_entity_maps_to_404() {
        let err = AppError::from(DomainError::not_found("comment", "3 on post 1"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Not found: comment 3 on post 1 not found");
    }

    #[test]
    fn test_storage_failure_maps_to_500() {
        let err = AppError::from(RepoError::Query("syntax error".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_detail_not_rendered() {
        let err = AppError::Internal("password=hunter2".to_string());
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = response.extensions().get::<ErrorResponse>().cloned().unwrap();
        assert!(payload.detail.is_none_or(|d| !d.contains("hunter2")));
    }

    #[test]
    fn test_error_page_is_html() {
        let response = AppError::from(DomainError::not_found("post", 9)).error_response();

        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }
}
