//! Easel Client
//!
//! The backend port and its HTTP implementation.
//!
//! # Core Concepts
//!
//! - [`Backend`]: the async seam to the document service: list, fetch,
//!   publish, move, delete, agent invocation, connection tests, share
//!   tokens
//! - [`HttpBackend`]: production implementation over `reqwest`
//! - [`ApiError`]: error taxonomy with explicit user-facing detection;
//!   only backend-declared user errors surface verbatim
//! - [`ClientConfig`]: base URL, timeout, bearer token

#![warn(unreachable_pub)]

mod backend;
mod config;
mod error;
mod http;
mod types;

pub use backend::Backend;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ApiError, CONFLICT_MESSAGE, GENERIC_ERROR_MESSAGE};
pub use http::HttpBackend;
pub use types::{
    AccessToken, AccessTokenRequest, AgentInvocation, ChatResponse, ConversationId, FileQuery,
    MoveRequest, PublishRequest,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
