//! BODY entity — ACIS solid-modeler geometry carrier
//!
//! The BODY record transports opaque modeler data as repeated
//! proprietary-data lines (codes 1 and 3).  The two line kinds are
//! independent repeating fields with their own positions.

use super::header::EntityHeader;
use crate::chain::Chained;
use crate::codec::containers::BoundedSeq;
use crate::codec::field::{decode_record, FieldDispatch, FieldRule, RecordEntity, VersionGate};
use crate::codec::reader::TagReader;
use crate::codec::recovery::{check_write_version, normalize_after_read};
use crate::codec::writer::TagWriter;
use crate::config::CodecDefaults;
use crate::diagnostics::{DiagnosticKind, DiagnosticSink, SourceLocation};
use crate::error::{DxfError, Result};
use crate::types::DxfVersion;
use once_cell::sync::Lazy;
use std::io::{Read, Write};

/// Ceiling on proprietary-data lines per record.
pub const MAX_PROPRIETARY_LINES: usize = 2000;

/// An ACIS BODY entity.
#[derive(Debug, Clone)]
pub struct Body {
    /// Common entity header.
    pub header: EntityHeader,
    /// Modeler format version (code 70); never 0.
    modeler_format_version: i16,
    /// Proprietary data lines (repeated code 1).
    pub proprietary_data: BoundedSeq<String, MAX_PROPRIETARY_LINES>,
    /// Additional proprietary data lines (repeated code 3).
    pub additional_proprietary_data: BoundedSeq<String, MAX_PROPRIETARY_LINES>,
    /// Forward link to the next BODY in a chain.
    next: Option<Box<Body>>,
}

static DISPATCH: Lazy<FieldDispatch<Body>> = Lazy::new(|| {
    FieldDispatch::new(
        vec![
            FieldRule::new(1, VersionGate::SINCE_R13, |e: &mut Body, p, _| {
                e.proprietary_data.push(p.as_str().to_string())
            }),
            FieldRule::new(3, VersionGate::SINCE_R13, |e: &mut Body, p, _| {
                e.additional_proprietary_data.push(p.as_str().to_string())
            }),
            FieldRule::new(70, VersionGate::SINCE_R13, |e: &mut Body, p, ctx| {
                match p.as_i16() {
                    Some(v) if v > 0 => e.modeler_format_version = v,
                    _ => {
                        ctx.report(
                            DiagnosticKind::IllegalValueReset,
                            format!(
                                "BODY: illegal modeler format version '{}' reset to 1",
                                p.as_str()
                            ),
                        );
                        e.modeler_format_version = 1;
                    }
                }
                Ok(())
            }),
        ],
        &["AcDbEntity", "AcDbModelerGeometry"],
    )
});

impl Body {
    /// Create a BODY with every field at its documented default.
    pub fn new() -> Self {
        Self {
            header: EntityHeader::new(),
            modeler_format_version: 1,
            proprietary_data: BoundedSeq::new("BODY proprietary data"),
            additional_proprietary_data: BoundedSeq::new("BODY additional proprietary data"),
            next: None,
        }
    }

    /// Modeler format version (code 70).
    pub fn modeler_format_version(&self) -> i16 {
        self.modeler_format_version
    }

    /// Set the modeler format version; 0 and negatives are rejected.
    pub fn set_modeler_format_version(&mut self, value: i16) -> Result<()> {
        if value <= 0 {
            return Err(DxfError::IllegalValue {
                field: "modeler_format_version",
                value: value as i64,
            });
        }
        self.modeler_format_version = value;
        Ok(())
    }

    /// Decode one BODY record.  The code-0 pair naming the record has
    /// already been consumed; decoding stops at the next code-0 pair.
    pub fn read<R: Read>(
        reader: &mut TagReader<R>,
        defaults: &CodecDefaults,
        diags: &mut DiagnosticSink,
    ) -> Result<Self> {
        let mut body = Body::new();
        decode_record(reader, &DISPATCH, &mut body, diags)?;

        let location = SourceLocation {
            file: Some(reader.file_name().to_string()),
            line: reader.line_number(),
        };
        normalize_after_read(&mut body.header, defaults, diags, location);
        Ok(body)
    }

    /// Encode this BODY in wire order.
    pub fn write<W: Write>(
        &self,
        writer: &mut TagWriter<W>,
        diags: &mut DiagnosticSink,
    ) -> Result<()> {
        check_write_version(Self::RECORD_NAME, Self::MIN_VERSION, writer, diags)?;

        writer.write_record_type(Self::RECORD_NAME)?;
        self.header.write(writer)?;
        if VersionGate::SINCE_R13.admits(writer.version()) {
            writer.write_subclass("AcDbModelerGeometry")?;
            writer.write_i16(70, self.modeler_format_version)?;
            for line in &self.proprietary_data {
                writer.write_string(1, line)?;
            }
            for line in &self.additional_proprietary_data {
                writer.write_string(3, line)?;
            }
        }
        Ok(())
    }

    fn payload_eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.modeler_format_version == other.modeler_format_version
            && self.proprietary_data == other.proprietary_data
            && self.additional_proprietary_data == other.additional_proprietary_data
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

// Chain position is identity-free: two BODYs with equal payloads are
// equal regardless of what follows them.
impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        self.payload_eq(other)
    }
}

impl RecordEntity for Body {
    const RECORD_NAME: &'static str = "BODY";
    const MIN_VERSION: DxfVersion = DxfVersion::R13;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }
}

impl Chained for Body {
    fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }

    fn next_slot(&mut self) -> &mut Option<Box<Self>> {
        &mut self.next
    }
}
