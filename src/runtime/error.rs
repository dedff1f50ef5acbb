//! Error types for the scripting runtime
//!
//! Only two failure classes ever surface to a caller: local argument
//! validation and version gating. Host-side failures come back as sentinel
//! values (`None`/`false`) and resource wait timeouts are skipped silently,
//! mirroring the host's own conventions.

use thiserror::Error;

use super::version::HostVersion;

/// Top-level script error
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Argument validation failed before any host call
    #[error("Argument error: {0}")]
    Argument(#[from] ArgumentError),

    /// The requested flag, command or code does not exist on this host build
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Sequence recording errors
    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Local validation failures, raised synchronously with zero host calls
#[derive(Debug, Error, PartialEq)]
pub enum ArgumentError {
    /// A required handle was the sentinel
    #[error("Missing required reference: {0}")]
    MissingReference(&'static str),

    /// An index was outside the accepted range
    #[error("{what} index {index} out of range {min}..={max}")]
    IndexOutOfRange {
        /// Name of the indexed argument
        what: &'static str,
        /// Supplied index
        index: i64,
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: i64,
    },

    /// A string or list argument was empty
    #[error("Argument '{0}' must not be empty")]
    Empty(&'static str),

    /// A numeric argument was outside its domain
    #[error("Invalid value for '{what}': {detail}")]
    InvalidValue {
        /// Name of the argument
        what: &'static str,
        /// Why it was rejected
        detail: String,
    },

    /// Commands may only be added while a sequence is open
    #[error("Sequence {handle} is not open for recording")]
    SequenceNotOpen {
        /// Host sequence handle
        handle: i32,
    },

    /// The sequence slot was already returned to the host
    #[error("Sequence {handle} has been released")]
    SequenceReleased {
        /// Host sequence handle
        handle: i32,
    },
}

/// Convenience result alias for argument validation
pub type ArgumentResult<T> = std::result::Result<T, ArgumentError>;

/// Host version compatibility errors
#[derive(Debug, Error, PartialEq)]
pub enum VersionError {
    /// The item was introduced after the detected build
    #[error("{item} requires host {since} or newer (detected {version})")]
    UnsupportedInVersion {
        /// What was requested
        item: String,
        /// Detected host build
        version: HostVersion,
        /// First build providing the item
        since: HostVersion,
    },

    /// Canonical value outside the enumeration
    #[error("Value {value} is not a member of {enumeration}")]
    OrdinalOutOfRange {
        /// Enumeration name
        enumeration: &'static str,
        /// Offending value
        value: i32,
    },

    /// Unrecognized build string
    #[error("Unknown host version '{0}'")]
    UnknownVersion(String),
}

/// Convenience result alias for version checks
pub type VersionResult<T> = std::result::Result<T, VersionError>;

/// Sequence recording errors
#[derive(Debug, Error, PartialEq)]
pub enum SequenceError {
    /// Another sequence on this context is still open
    #[error("Sequence {open} is still recording; close it before opening another")]
    AlreadyRecording {
        /// Handle of the open sequence
        open: i32,
    },

    /// The host returned no recording slot
    #[error("Host has no free sequence slot")]
    SlotUnavailable,
}

/// Result type using ScriptError
pub type Result<T> = std::result::Result<T, ScriptError>;
