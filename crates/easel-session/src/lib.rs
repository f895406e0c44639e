//! Easel Sessions
//!
//! The coordination layer between client state and the backend:
//!
//! - [`DocumentSession`]: one open document's Viewing/Editing/Saving
//!   lifecycle, error surface, and selected-run pointer
//! - [`SaveCoordinator`]: publishes buffered changes, reconciles the
//!   canonical result, promotes drafts, and derives navigation targets
//! - [`RunExecutor`]: executes reports and alerts through the agent and
//!   persists immutable run records
//! - [`Sharing`]: admin-gated public share tokens
//! - [`view_for`]: pure kind → view dispatch

#![warn(unreachable_pub)]

mod dispatch;
mod error;
mod runs;
mod save;
mod session;
mod share;

pub use dispatch::{view_for, ViewDescriptor};
pub use error::SessionError;
pub use runs::{RunExecutor, ALERT_AGENT, REPORT_AGENT};
pub use save::{SaveCoordinator, SaveOutcome};
pub use session::{DocumentSession, EditPhase};
pub use share::Sharing;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
