//! tokenseek search service.
//!
//! Serves token lookups over HTTP and from the command line.
//!
//! # Modules
//!
//! - [`handlers`] - Axum route handlers and router builder
//! - [`error`] - HTTP error types
//! - [`config`] - Configuration with environment variable expansion
//! - [`render`] - Text cards for the `search` subcommand

pub mod config;
pub mod error;
pub mod handlers;
pub mod render;

pub use config::{ConfigError, ServerConfig, Settings};
pub use handlers::{SearchState, search_router};
