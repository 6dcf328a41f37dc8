//! Error types for the dxfrec codec

use crate::types::DxfVersion;
use std::io;
use thiserror::Error;

/// Main error type for dxfrec operations
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred during stream operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing the tagged-record stream.
    ///
    /// Carries the source file name (when known) and the line number at
    /// which the stream became unreadable.
    #[error("Parse error in {file} at line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    /// A bounded container would overflow its compile-time capacity
    #[error("Capacity exceeded for {what}: limit is {cap}")]
    CapacityExceeded { what: &'static str, cap: usize },

    /// A value outside a field's closed legal range was rejected by a setter
    #[error("Illegal value for {field}: {value}")]
    IllegalValue { field: &'static str, value: i64 },

    /// Writing an entity to a format version that does not support it
    #[error("{entity} requires {min} but the target version is {target}")]
    VersionIncompatibility {
        entity: &'static str,
        min: DxfVersion,
        target: DxfVersion,
    },

    /// A chained (non-detached) instance was handed to a teardown or
    /// relink operation that requires a detached one
    #[error("Instance is still linked into a chain; detach it first")]
    ChainedDispose,

    /// Unsupported CAD file version
    #[error("Unsupported CAD version: {0:?}")]
    UnsupportedVersion(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for dxfrec operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl DxfError {
    /// Build a `Parse` error tagged with the reader's current position.
    pub fn parse(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        DxfError::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}
