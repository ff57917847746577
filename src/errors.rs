//! Error Types
//!
//! This module defines the error types used throughout the toolkit.
//!
//! # Overview
//!
//! The main error type [`OrreryError`] covers all failure modes including:
//! - Binary stream I/O and corruption during persistence
//! - Symbol-table invariant violations
//! - Capability violations on live scene-graph mutations
//! - Scene-graph lookup and structural errors
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, OrreryError>`.
//!
//! ```rust,ignore
//! use orrery::errors::{OrreryError, Result};
//!
//! fn load_scene() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Orrery toolkit.
///
/// This enum covers all possible error conditions that can occur
/// during scene-graph mutation and persistence. Each variant provides
/// specific context about what went wrong.
#[derive(Error, Debug)]
pub enum OrreryError {
    // ========================================================================
    // Stream I/O Errors
    // ========================================================================
    /// Underlying stream error (includes truncation as `UnexpectedEof`).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The stream does not start with the expected magic bytes.
    #[error("Not a scene stream: bad magic bytes")]
    BadMagic,

    /// The stream was written by an incompatible format version.
    #[error("Unsupported stream version: {0}")]
    UnsupportedVersion(u32),

    /// Malformed or inconsistent stream contents.
    #[error("Corrupt stream: {0}")]
    CorruptStream(String),

    /// The stream contains an unrecognized node type tag.
    #[error("Unknown node type tag: {0:#04x}")]
    UnknownTag(u8),

    // ========================================================================
    // Symbol Table Errors
    // ========================================================================
    /// A symbol ID was registered twice with a reconstructed object.
    #[error("Symbol {0} registered twice")]
    DuplicateSymbol(u32),

    /// A symbol ID appeared twice as a record header in the stream.
    #[error("Symbol {0} has two state records")]
    DuplicateState(u32),

    /// A referenced symbol ID was never given a state record.
    #[error("Symbol {0} was referenced but never defined")]
    UnresolvedSymbol(u32),

    /// A symbol resolved to an object of the wrong kind.
    #[error("Symbol {id} is not a {expected}")]
    SymbolKindMismatch {
        /// The offending symbol ID
        id: u32,
        /// What the caller expected the symbol to resolve to
        expected: &'static str,
    },

    // ========================================================================
    // Live Scene-Graph Errors
    // ========================================================================
    /// A mutation was attempted without the required capability bit.
    #[error("Capability {capability} not set for {operation}")]
    CapabilityMissing {
        /// Name of the missing capability bit
        capability: &'static str,
        /// The mutation that was refused
        operation: &'static str,
    },

    /// A node handle did not resolve to a live node.
    #[error("Node not found in universe")]
    NodeNotFound,

    /// A locale handle did not resolve to a live locale.
    #[error("Locale not found in universe")]
    LocaleNotFound,

    /// A geometry handle did not resolve to a live geometry.
    #[error("Geometry not found in universe")]
    GeometryNotFound,

    /// An operation requires a different node kind.
    #[error("Node is not a {expected}")]
    WrongNodeKind {
        /// The node kind the operation requires
        expected: &'static str,
    },

    /// A structural edit would corrupt the graph (e.g. a second parent).
    #[error("Invalid graph structure: {0}")]
    InvalidStructure(&'static str),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// The keyframe knot vector is not a valid path parameterization.
    #[error("Invalid knot vector: {0}")]
    InvalidKnots(&'static str),

    // ========================================================================
    // Native Configuration Errors
    // ========================================================================
    /// The process-wide display connection was already torn down.
    #[error("Display connection has been shut down")]
    DisplayShutDown,

    /// Opening the display connection failed.
    #[error("Display connection failed: {0}")]
    DisplayOpenFailed(String),
}

/// Alias for `Result<T, OrreryError>`.
pub type Result<T> = std::result::Result<T, OrreryError>;
