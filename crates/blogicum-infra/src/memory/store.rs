use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blogicum_core::domain::{
    Category, Comment, CommentEntry, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostEntry, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::PageWindow;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::query::PostQuery;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    locations: BTreeMap<i64, Location>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn category_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn check_post_refs(
        &self,
        author_id: i64,
        category_id: Option<i64>,
        location_id: Option<i64>,
    ) -> Result<(), RepoError> {
        if !self.users.contains_key(&author_id) {
            return Err(RepoError::Constraint(format!("author {author_id} does not exist")));
        }
        if let Some(id) = category_id.filter(|id| !self.categories.contains_key(id)) {
            return Err(RepoError::Constraint(format!("category {id} does not exist")));
        }
        if let Some(id) = location_id.filter(|id| !self.locations.contains_key(id)) {
            return Err(RepoError::Constraint(format!("location {id} does not exist")));
        }
        Ok(())
    }

    fn check_comment_refs(&self, post_id: i64, author_id: i64) -> Result<(), RepoError> {
        if !self.posts.contains_key(&post_id) {
            return Err(RepoError::Constraint(format!("post {post_id} does not exist")));
        }
        if !self.users.contains_key(&author_id) {
            return Err(RepoError::Constraint(format!("author {author_id} does not exist")));
        }
        Ok(())
    }

    fn entry(&self, post: &Post) -> Result<PostEntry, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .cloned()
            .ok_or_else(|| RepoError::Query(format!("post {} has no author row", post.id)))?;

        Ok(PostEntry {
            post: post.clone(),
            author,
            category: post.category_id.and_then(|id| self.categories.get(&id).cloned()),
            location: post.location_id.and_then(|id| self.locations.get(&id).cloned()),
            comment_count: self.comments.values().filter(|c| c.post_id == post.id).count() as u64,
        })
    }

    /// Posts matching `query`, newest first.
    fn matching(&self, query: &PostQuery) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| {
                let category = p.category_id.and_then(|id| self.categories.get(&id));
                query.matches(p, category)
            })
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        posts
    }

    fn delete_post_cascade(&mut self, post_id: i64) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, c| c.post_id != post_id);
    }
}

/// In-memory implementation of all repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, NewUser, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.username_taken(&new.username, None) {
            return Err(RepoError::Constraint("username already exists".to_string()));
        }

        let user = User {
            id: tables.allocate_id(),
            username: new.username,
            first_name: String::new(),
            last_name: String::new(),
            email: new.email,
            password_hash: new.password_hash,
            date_joined: new.date_joined,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(RepoError::Constraint("username already exists".to_string()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.delete_post_cascade(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl BaseRepository<Category, NewCategory, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, new: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.category_name_taken(&new.name, None) {
            return Err(RepoError::Constraint("category name already exists".to_string()));
        }

        let category = Category {
            id: tables.allocate_id(),
            name: new.name,
            description: new.description,
            is_published: new.is_published,
            created_at: Utc::now(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        if tables.category_name_taken(&category.name, Some(category.id)) {
            return Err(RepoError::Constraint("category name already exists".to_string()));
        }

        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(RepoError::NotFound)?;

        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl BaseRepository<Location, NewLocation, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn insert(&self, new: NewLocation) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        let location = Location {
            id: tables.allocate_id(),
            name: new.name,
            is_published: new.is_published,
            created_at: Utc::now(),
        };
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn update(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.locations.contains_key(&location.id) {
            return Err(RepoError::NotFound);
        }

        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.remove(&id).ok_or(RepoError::NotFound)?;

        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_post_refs(new.author_id, new.category_id, new.location_id)?;

        let post = Post {
            id: tables.allocate_id(),
            title: new.title,
            content: new.content,
            pub_date: new.pub_date,
            is_published: new.is_published,
            author_id: new.author_id,
            category_id: new.category_id,
            location_id: new.location_id,
            created_at: new.created_at,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_post_refs(post.author_id, post.category_id, post.location_id)?;

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }

        tables.delete_post_cascade(id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.matching(query).len() as u64)
    }

    async fn fetch(
        &self,
        query: &PostQuery,
        window: &PageWindow,
    ) -> Result<Vec<PostEntry>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .matching(query)
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.limit() as usize)
            .map(|post| tables.entry(post))
            .collect()
    }

    async fn find_entry(&self, id: i64) -> Result<Option<PostEntry>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|post| tables.entry(post)).transpose()
    }
}

#[async_trait]
impl BaseRepository<Comment, NewComment, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_comment_refs(new.post_id, new.author_id)?;

        let comment = Comment {
            id: tables.allocate_id(),
            text: new.text,
            post_id: new.post_id,
            author_id: new.author_id,
            created_at: new.created_at,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_comment_refs(comment.post_id, comment.author_id)?;

        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentEntry>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        comments
            .into_iter()
            .map(|comment| -> Result<CommentEntry, RepoError> {
                let author = tables.users.get(&comment.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("comment {} has no author row", comment.id))
                })?;
                Ok(CommentEntry {
                    comment: comment.clone(),
                    author,
                })
            })
            .collect()
    }
}
