//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};

use blogicum_core::domain::{Category, CommentEntry, Location, PostEntry, User};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::PageWindow;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::query::{PostQuery, Visibility};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Apply listing criteria. The category join only happens for public
/// listings, where the category's own flag takes part in the filter.
fn filtered(query: &PostQuery) -> Select<PostEntity> {
    let mut select = PostEntity::find();

    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Visibility::PublicAt(now) = query.visibility {
        select = select
            .join(JoinType::InnerJoin, post::Relation::Category.def())
            .filter(post::Column::IsPublished.eq(true))
            .filter(category::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(now));
    }

    select
}

impl PostgresPostRepository {
    /// Attach authors, categories, locations and comment counts to a batch
    /// of posts, preserving their order.
    async fn load_entries(&self, posts: Vec<post::Model>) -> Result<Vec<PostEntry>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let author_ids: BTreeSet<i64> = posts.iter().map(|p| p.author_id).collect();
        let category_ids: BTreeSet<i64> = posts.iter().filter_map(|p| p.category_id).collect();
        let location_ids: BTreeSet<i64> = posts.iter().filter_map(|p| p.location_id).collect();

        let authors: HashMap<i64, User> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        let categories: HashMap<i64, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };

        let locations: HashMap<i64, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };

        let comment_counts: HashMap<i64, i64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .collect();

        posts
            .into_iter()
            .map(|model| -> Result<PostEntry, RepoError> {
                let author = authors.get(&model.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("post {} has no author row", model.id))
                })?;
                let category = model.category_id.and_then(|id| categories.get(&id).cloned());
                let location = model.location_id.and_then(|id| locations.get(&id).cloned());
                let comment_count = comment_counts.get(&model.id).copied().unwrap_or(0) as u64;

                Ok(PostEntry {
                    post: model.into(),
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        filtered(query).count(&self.db).await.map_err(map_db_err)
    }

    async fn fetch(
        &self,
        query: &PostQuery,
        window: &PageWindow,
    ) -> Result<Vec<PostEntry>, RepoError> {
        let posts = filtered(query)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(window.offset())
            .limit(window.limit())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(count = posts.len(), page = window.number, "Fetched post page");

        self.load_entries(posts).await
    }

    async fn find_entry(&self, id: i64) -> Result<Option<PostEntry>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.load_entries(vec![model]).await?.pop())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentEntry>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(comment, author)| -> Result<CommentEntry, RepoError> {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("comment {} has no author row", comment.id))
                })?;
                Ok(CommentEntry {
                    comment: comment.into(),
                    author: author.into(),
                })
            })
            .collect()
    }
}
