//! Shared cryptographic helpers for Hoot services.
//!
//! Currently this is the RS256 JWT layer used by every HTTP service to
//! authenticate bearer tokens issued by the identity service.
pub mod jwt;

pub use jwt::{validate_access_token, Claims};
