//! # Blogicum Core
//!
//! The domain layer of the blog.
//! Entities, repository ports and the rules that decide who may see or
//! change a post. No infrastructure dependencies live here.

pub mod access;
pub mod domain;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod ports;
pub mod query;

pub use access::{Access, Owned, authorize};
pub use error::{DomainError, RepoError};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageWindow, Paginator};
pub use query::{PostQuery, Visibility};
