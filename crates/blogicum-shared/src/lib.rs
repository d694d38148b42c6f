//! # Blogicum Shared
//!
//! The form layer: payloads submitted by browsers, their validation, and
//! the error pages sent back.

pub mod forms;
pub mod response;

pub use forms::{BoundForm, FormErrors};
pub use response::ErrorResponse;
