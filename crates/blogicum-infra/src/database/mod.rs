//! Database connection management and SeaORM repositories.

mod connections;
mod postgres_base;
mod postgres_repo;

pub mod entity;

pub use connections::{DatabaseConfig, connect};
pub use postgres_base::{DomainMapped, PostgresBaseRepository};
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};
