//! HTTP API layer for ovation.
//!
//! This crate provides the REST API for the voting engine:
//!
//! - **Endpoints**: public vote submission and standings, plus the editor surface
//! - **Extractors**: editor-token authentication
//! - **Middleware**: shared application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
