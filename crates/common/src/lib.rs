//! Common utilities and shared types for ovation.
//!
//! This crate provides foundational components used across all ovation crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Reference generation**: Opaque voting references via [`ReferenceGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use ovation_common::{AppResult, Config, ReferenceGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let generator = ReferenceGenerator::new();
//!     let reference = generator.generate("round", 12);
//!     println!("Generated reference: {}", reference);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod reference;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use reference::ReferenceGenerator;
