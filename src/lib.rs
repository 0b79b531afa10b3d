//! # Quiver TUI
//!
//! A minimal terminal-based REST API client, similar to Postman/Insomnia.
//!
//! ## Features
//! - HTTP methods: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS
//! - Query parameter editor kept in live sync with the URL
//! - Custom headers with enable/disable toggles
//! - Auth support (Bearer, Basic, API key)
//! - JSON body detection and syntax highlighting
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod assembler;
pub mod constants;
pub mod messages;
pub mod models;
pub mod network;
pub mod query;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use assembler::{assemble, AssembleError, RequestBody, RequestDescriptor};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{AuthKind, AuthState, HttpMethod, KeyValuePair, Request, ResponseOutcome};
pub use network::NetworkActor;
pub use query::{merge_url_edit, parse_params, rebuild_url};
