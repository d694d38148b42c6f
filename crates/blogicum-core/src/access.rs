//! Ownership guard.
//!
//! The author of a resource is the only one allowed to change it. There are
//! no roles and no administrative override.

use crate::domain::{Comment, Post, User};

/// A resource with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Post {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

impl Owned for User {
    fn owner_id(&self) -> i64 {
        self.id
    }
}

/// Outcome of an ownership check. `Forbidden` carries where the caller
/// should be sent instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Access<T> {
    Authorized,
    Forbidden(T),
}

impl<T> Access<T> {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Access::Authorized)
    }
}

/// Check that `viewer_id` owns `resource`.
pub fn authorize<R, T>(viewer_id: i64, resource: &R, fallback: T) -> Access<T>
where
    R: Owned + ?Sized,
{
    if resource.owner_id() == viewer_id {
        Access::Authorized
    } else {
        Access::Forbidden(fallback)
    }
}
