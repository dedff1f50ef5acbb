//! Taskline – fire-and-forget behavior commands for host-simulated actors
//!
//! This crate wraps a host engine's native call table with:
//! - One validated method per behavior command, issued without waiting
//! - Ordered command sequences recorded once and performed by any actor
//! - Persistent and per-frame behavior flags as distinct types
//! - Event code translation for host builds whose numbering shifted
//! - Lazy group member walks and memory-backed actor properties
//! - A simulated host for tests and offline experiments

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Script context, commands, sequences and host compatibility
pub mod runtime;

// Re-export key types for convenience
pub use runtime::{ScriptConfig, ScriptContext};

/// Current version of the Taskline crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
