//! # Blogicum server
//!
//! Server-rendered blog: public feeds, post pages with comments, and
//! author-only editing behind a cookie session.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
pub mod views;

pub use config::{AppConfig, SiteSettings};
pub use state::AppState;
