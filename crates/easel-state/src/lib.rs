//! Easel State Service
//!
//! Client-side document state: the file store (last persisted snapshots),
//! the change buffer (uncommitted persistable and ephemeral edits), and
//! the merge resolver that derives what views actually display.
//!
//! # Core Concepts
//!
//! - [`Workbench`]: injectable handle over store + buffer; callers
//!   receive a clone, never a global
//! - [`FileEdits`]: one file's buffered edits
//! - Merge laws: with an empty buffer, merged content equals the stored
//!   content; `clear_changes` restores that identity; sequential edits
//!   are last-write-wins per field
//!
//! Everything here is synchronous and side-effect free towards the
//! backend; saving and loading live in `easel-session`.

#![warn(unreachable_pub)]

mod buffer;
mod error;
mod store;
mod workbench;

pub use buffer::FileEdits;
pub use error::StateError;
pub use workbench::Workbench;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
