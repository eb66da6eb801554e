//! Authentication for UserHub.
//!
//! Three pieces:
//! - JWT codec: issues and validates signed, time-limited identity tokens
//! - Credential verifier: checks username/password against stored bcrypt hashes
//! - Middleware: establishes the caller's identity on every request

mod jwt;
mod middleware;
mod password;
mod verifier;

pub use jwt::*;
pub use middleware::*;
pub use password::*;
pub use verifier::*;
