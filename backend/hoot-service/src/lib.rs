/// Hoot Service Library
///
/// REST backend for posts ("hoots") and their comments. Authenticated users
/// create posts, edit or delete their own, and comment on any post.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: stored records and response views
/// - `services`: authorization and author resolution
/// - `db`: post store and user directory (PostgreSQL and in-memory)
/// - `middleware`: JWT authentication and ownership checks
/// - `error`: error types and HTTP mapping
/// - `config`: configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
