//! Persistence layer for UserHub.

mod models;
mod repository;

pub use models::*;
pub use repository::*;
