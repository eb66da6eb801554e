//! Domain types for UserHub.

mod account;

pub use account::*;
