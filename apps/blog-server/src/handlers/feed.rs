//! Public post listings.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::{DomainError, PostQuery};
use blogicum_core::feed::load_page;

use super::PageParams;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{self, CategoryTemplate, IndexTemplate};

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let query = PostQuery::public(Utc::now());
    let page = load_page(
        state.posts.as_ref(),
        &query,
        params.page.as_deref(),
        state.site.posts_per_page,
    )
    .await?;

    views::render(&IndexTemplate {
        viewer: viewer.0,
        page,
    })
}

/// GET /categories/category/{category_name}/
///
/// Unknown and unpublished categories are both 404.
pub async fn category_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let name = path.into_inner();

    let category = state
        .categories
        .find_by_name(&name)
        .await?
        .filter(|category| category.is_published)
        .ok_or_else(|| DomainError::not_found("category", &name))?;

    let query = PostQuery::public(Utc::now()).in_category(category.id);
    let page = load_page(
        state.posts.as_ref(),
        &query,
        params.page.as_deref(),
        state.site.posts_per_page,
    )
    .await?;

    views::render(&CategoryTemplate {
        viewer: viewer.0,
        category,
        page,
    })
}
