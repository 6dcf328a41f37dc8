//! # dxfrec
//!
//! A pure Rust codec for DXF tagged group-code records.
//!
//! DXF content is a flat stream of `(group code, value)` pairs; a code 0
//! pair names a record type and every following pair up to the next
//! code 0 belongs to that record.  This crate implements the record
//! layer: tokenizing the pair stream, decoding records through
//! per-type dispatch tables, recovering documented defaults from
//! malformed input, and re-encoding records in wire order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dxfrec::codec::TagReader;
//! use dxfrec::config::CodecDefaults;
//! use dxfrec::diagnostics::DiagnosticSink;
//! use dxfrec::entities::Body;
//!
//! let mut reader = TagReader::new(std::fs::File::open("entities.dxf")?);
//! let mut diags = DiagnosticSink::new();
//! let defaults = CodecDefaults::standard();
//!
//! // the caller has consumed "0 / BODY" and hands over the stream
//! let body = Body::read(&mut reader, &defaults, &mut diags)?;
//! println!("BODY on layer {}", body.header.layer);
//! # Ok::<(), dxfrec::error::DxfError>(())
//! ```
//!
//! ## Design
//!
//! - Decoding is tolerant: unknown codes, illegal enum values and count
//!   mismatches become [`diagnostics::Diagnostic`]s, not errors.
//! - Encoding is gated: fields carry a [`codec::VersionGate`] and are
//!   suppressed when the target [`types::DxfVersion`] predates them.
//! - Records of one type can be linked into a [`chain::Chain`] that
//!   tears down iteratively regardless of length.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chain;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod entities;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{Color, DxfVersion, Handle, LineWeight, Transparency, Vector3};

// Re-export the codec surface
pub use codec::{CodePair, GroupValueType, TagReader, TagWriter, VersionGate};

// Re-export entity types
pub use entities::{Body, EntityHeader, MLine, Ole2Frame};

// Re-export the chain surface
pub use chain::{Chain, Chained};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexports_resolve() {
        let body = Body::new();
        assert_eq!(body.header.layer, "0");
        assert_eq!(DxfVersion::from_version_string("AC1015"), Some(DxfVersion::R2000));
    }
}
