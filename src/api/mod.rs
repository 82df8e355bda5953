//! REST API module.
//!
//! A single keyword resource served at `/api/keywords`.

mod keywords;

pub use keywords::*;

/// Returned when a create request lacks `username` or `channels`.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

/// Returned when a delete request has no `id`.
pub const ID_REQUIRED_MESSAGE: &str = "Keyword ID is required";

pub const SAVED_MESSAGE: &str = "Keywords saved successfully";

pub const DELETED_MESSAGE: &str = "Keyword deleted successfully";
