//! Request middleware: per-caller rate limiting and response hardening.

pub mod rate_limit;
pub mod security;

pub use rate_limit::{rate_limit_layer, RateLimiter};
pub use security::security_header_layers;
