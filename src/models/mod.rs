//! Data models for the keyword registry.
//!
//! Field names serialize as camelCase to match the browser client.

mod keyword;

pub use keyword::*;
