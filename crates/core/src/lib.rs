//! Core business logic for ovation.

pub mod services;

pub use services::*;
