//! Paginated post feeds.

use crate::domain::PostEntry;
use crate::error::RepoError;
use crate::pagination::{Page, Paginator};
use crate::ports::PostRepository;
use crate::query::PostQuery;

/// Load the page of `query` selected by the raw `page` request parameter.
pub async fn load_page(
    posts: &dyn PostRepository,
    query: &PostQuery,
    raw_page: Option<&str>,
    per_page: u64,
) -> Result<Page<PostEntry>, RepoError> {
    let total = posts.count(query).await?;
    let window = Paginator::new(total, per_page).page(raw_page);

    let items = if total == 0 {
        Vec::new()
    } else {
        posts.fetch(query, &window).await?
    };

    Ok(Page { items, window })
}
