//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default URL for new requests
pub const DEFAULT_URL: &str = "https://jsonplaceholder.typicode.com/posts?userId=1&_limit=5";

/// Fixed request timeout in milliseconds, not user-configurable
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Quiver TUI";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
