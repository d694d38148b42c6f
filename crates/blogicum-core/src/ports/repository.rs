use async_trait::async_trait;

use crate::domain::{
    Category, Comment, CommentEntry, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostEntry, User,
};
use crate::error::RepoError;
use crate::pagination::PageWindow;
use crate::query::PostQuery;

/// Generic repository trait defining standard CRUD operations.
///
/// `N` is the not-yet-stored form of `T`; the store assigns the key.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Store a new entity and return it with its assigned ID.
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Persist every field of an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, NewCategory, i64> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    /// Every category, ordered by name.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, NewLocation, i64> {
    /// Every location, ordered by name.
    async fn list(&self) -> Result<Vec<Location>, RepoError>;
}

/// Post repository.
///
/// `count` and `fetch` together behave like a lazily evaluated query set:
/// both apply the same criteria, `fetch` returns one window of it joined
/// with related rows and annotated with comment counts, newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, i64> {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    async fn fetch(&self, query: &PostQuery, window: &PageWindow)
    -> Result<Vec<PostEntry>, RepoError>;

    /// A single post with its relations and comment count.
    async fn find_entry(&self, id: i64) -> Result<Option<PostEntry>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, NewComment, i64> {
    /// Comments on a post with their authors, oldest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentEntry>, RepoError>;
}
