//! HTTP API layer for foodgram-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: users, auth, tags, ingredients, recipes
//! - **Extractors**: bearer-token authentication via request extensions
//! - **Middleware**: token resolution, application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
