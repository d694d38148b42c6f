//! In-memory store - used as fallback when no database is configured,
//! and by tests.
//!
//! One struct implements every repository port over a single set of
//! tables, so foreign-key behaviour (cascades, set-null) matches the
//! relational schema. Data is lost on process restart.

mod store;

pub use store::InMemoryStore;
