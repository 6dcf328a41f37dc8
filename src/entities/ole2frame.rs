//! OLE2FRAME entity — embedded OLE object frame
//!
//! The record stores the embedded object as raw binary chunks (code 310,
//! at most 128 bytes each) preceded by a declared total length (code 90)
//! and terminated by the literal string "OLE" under code 1.  The declared
//! length is cross-checked against the decoded chunk total on read.

use super::header::EntityHeader;
use crate::chain::Chained;
use crate::codec::field::{decode_record, FieldDispatch, FieldRule, RecordEntity, VersionGate};
use crate::codec::reader::TagReader;
use crate::codec::recovery::{check_count, check_write_version, normalize_after_read};
use crate::codec::writer::TagWriter;
use crate::config::CodecDefaults;
use crate::diagnostics::{DiagnosticKind, DiagnosticSink, SourceLocation};
use crate::error::{DxfError, Result};
use crate::types::{DxfVersion, Vector3};
use once_cell::sync::Lazy;
use std::io::{Read, Write};

/// Terminator written under code 1 after the binary chunks.
pub const OLE_END_MARKER: &str = "OLE";

/// Maximum payload bytes per code-310 chunk.
pub const OLE_CHUNK_SIZE: usize = 128;

/// The kind of embedded object (code 71); closed range 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum OleObjectType {
    /// A linked object.
    Link = 1,
    /// An embedded object.
    Embedded = 2,
    /// A static picture.
    Static = 3,
}

impl OleObjectType {
    /// Decode a code-71 value; out-of-range values return `None`.
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(Self::Link),
            2 => Some(Self::Embedded),
            3 => Some(Self::Static),
            _ => None,
        }
    }

    /// The code-71 value.
    pub fn value(self) -> i16 {
        self as i16
    }
}

impl Default for OleObjectType {
    fn default() -> Self {
        Self::Embedded
    }
}

/// An OLE frame entity carrying an embedded object.
#[derive(Debug, Clone)]
pub struct Ole2Frame {
    /// Common entity header.
    pub header: EntityHeader,
    /// OLE version number (code 70).
    pub ole_version: i16,
    /// Object type (code 71).
    object_type: OleObjectType,
    /// Upper-left corner of the frame (codes 10/20/30).
    pub upper_left: Vector3,
    /// Lower-right corner of the frame (codes 11/21/31).
    pub lower_right: Vector3,
    /// Declared total byte length of the embedded object (code 90).
    pub data_length: i64,
    /// Binary chunks of the embedded object (repeating code 310).
    pub binary_data: Vec<Vec<u8>>,
    /// Forward link to the next OLE2FRAME in a chain.
    next: Option<Box<Ole2Frame>>,
}

static DISPATCH: Lazy<FieldDispatch<Ole2Frame>> = Lazy::new(|| {
    FieldDispatch::new(
        vec![
            FieldRule::new(70, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, _| {
                if let Some(v) = p.as_i16() {
                    e.ole_version = v;
                }
                Ok(())
            }),
            FieldRule::new(71, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, ctx| {
                match p.as_i16().and_then(OleObjectType::from_i16) {
                    Some(t) => e.object_type = t,
                    None => {
                        ctx.report(
                            DiagnosticKind::IllegalValueReset,
                            format!(
                                "OLE2FRAME: illegal object type '{}' reset to {}",
                                p.as_str(),
                                OleObjectType::default().value()
                            ),
                        );
                        e.object_type = OleObjectType::default();
                    }
                }
                Ok(())
            }),
            FieldRule::new(10, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, _| {
                if let Some(v) = p.as_double() {
                    e.upper_left.x = v;
                }
                Ok(())
            }),
            FieldRule::new(20, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, _| {
                if let Some(v) = p.as_double() {
                    e.upper_left.y = v;
                }
                Ok(())
            }),
            FieldRule::new(30, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, _| {
                if let Some(v) = p.as_double() {
                    e.upper_left.z = v;
                }
                Ok(())
            }),
            FieldRule::new(11, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, _| {
                if let Some(v) = p.as_double() {
                    e.lower_right.x = v;
                }
                Ok(())
            }),
            FieldRule::new(21, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, _| {
                if let Some(v) = p.as_double() {
                    e.lower_right.y = v;
                }
                Ok(())
            }),
            FieldRule::new(31, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, _| {
                if let Some(v) = p.as_double() {
                    e.lower_right.z = v;
                }
                Ok(())
            }),
            FieldRule::new(90, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, _| {
                if let Some(v) = p.as_i32() {
                    e.data_length = v as i64;
                }
                Ok(())
            }),
            // 310 shadows the header's graphics-data chunks here
            FieldRule::new(310, VersionGate::SINCE_R14, |e: &mut Ole2Frame, p, ctx| {
                match p.as_binary() {
                    Some(bytes) => e.binary_data.push(bytes),
                    None => ctx.report(
                        DiagnosticKind::Note,
                        format!("OLE2FRAME: undecodable hex chunk '{}' skipped", p.as_str()),
                    ),
                }
                Ok(())
            }),
            FieldRule::new(1, VersionGate::SINCE_R14, |_e: &mut Ole2Frame, p, ctx| {
                if p.as_str() != OLE_END_MARKER {
                    ctx.report(
                        DiagnosticKind::Note,
                        format!(
                            "OLE2FRAME: end marker is '{}', expected \"{}\"",
                            p.as_str(),
                            OLE_END_MARKER
                        ),
                    );
                }
                Ok(())
            }),
        ],
        &["AcDbEntity", "AcDbOle2Frame"],
    )
});

impl Ole2Frame {
    /// Create an OLE2FRAME with every field at its documented default.
    pub fn new() -> Self {
        Self {
            header: EntityHeader::new(),
            ole_version: 2,
            object_type: OleObjectType::Embedded,
            upper_left: Vector3::ZERO,
            lower_right: Vector3::ZERO,
            data_length: 0,
            binary_data: Vec::new(),
            next: None,
        }
    }

    /// Object type (code 71).
    pub fn object_type(&self) -> OleObjectType {
        self.object_type
    }

    /// Set the object type from a raw code-71 value; values outside
    /// 1..=3 are rejected.
    pub fn set_object_type(&mut self, value: i16) -> Result<()> {
        match OleObjectType::from_i16(value) {
            Some(t) => {
                self.object_type = t;
                Ok(())
            }
            None => Err(DxfError::IllegalValue {
                field: "ole object type",
                value: value as i64,
            }),
        }
    }

    /// Append embedded-object bytes, splitting into code-310 sized
    /// chunks and keeping the declared length in step.
    pub fn push_data(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(OLE_CHUNK_SIZE) {
            self.binary_data.push(chunk.to_vec());
        }
        self.data_length += bytes.len() as i64;
    }

    /// Total bytes held across all chunks.
    pub fn chunk_byte_total(&self) -> usize {
        self.binary_data.iter().map(Vec::len).sum()
    }

    /// Decode one OLE2FRAME record.  The code-0 pair naming the record
    /// has already been consumed; decoding stops at the next code-0 pair.
    pub fn read<R: Read>(
        reader: &mut TagReader<R>,
        defaults: &CodecDefaults,
        diags: &mut DiagnosticSink,
    ) -> Result<Self> {
        let mut frame = Ole2Frame::new();
        decode_record(reader, &DISPATCH, &mut frame, diags)?;

        let location = SourceLocation {
            file: Some(reader.file_name().to_string()),
            line: reader.line_number(),
        };
        normalize_after_read(&mut frame.header, defaults, diags, location.clone());
        check_count(
            Self::RECORD_NAME,
            "code 90",
            frame.data_length,
            frame.chunk_byte_total(),
            diags,
            location,
        );
        Ok(frame)
    }

    /// Encode this OLE2FRAME in wire order.
    pub fn write<W: Write>(
        &self,
        writer: &mut TagWriter<W>,
        diags: &mut DiagnosticSink,
    ) -> Result<()> {
        check_write_version(Self::RECORD_NAME, Self::MIN_VERSION, writer, diags)?;

        writer.write_record_type(Self::RECORD_NAME)?;
        self.header.write(writer)?;
        if VersionGate::SINCE_R13.admits(writer.version()) {
            writer.write_subclass("AcDbOle2Frame")?;
        }
        writer.write_i16(70, self.ole_version)?;
        writer.write_point3d(10, self.upper_left)?;
        writer.write_point3d(11, self.lower_right)?;
        writer.write_i16(71, self.object_type.value())?;
        match i32::try_from(self.data_length) {
            Ok(v) => writer.write_i32(90, v)?,
            Err(_) => {
                diags.report(
                    DiagnosticKind::IllegalValueReset,
                    format!(
                        "OLE2FRAME: data length {} exceeds the code 90 range, clamped",
                        self.data_length
                    ),
                    SourceLocation::default(),
                );
                writer.write_i32(90, i32::MAX)?;
            }
        }
        for chunk in &self.binary_data {
            writer.write_binary(310, chunk)?;
        }
        writer.write_string(1, OLE_END_MARKER)?;
        Ok(())
    }

    fn payload_eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.ole_version == other.ole_version
            && self.object_type == other.object_type
            && self.upper_left == other.upper_left
            && self.lower_right == other.lower_right
            && self.data_length == other.data_length
            && self.binary_data == other.binary_data
    }
}

impl Default for Ole2Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Ole2Frame {
    fn eq(&self, other: &Self) -> bool {
        self.payload_eq(other)
    }
}

impl RecordEntity for Ole2Frame {
    const RECORD_NAME: &'static str = "OLE2FRAME";
    const MIN_VERSION: DxfVersion = DxfVersion::R14;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }
}

impl Chained for Ole2Frame {
    fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }

    fn next_slot(&mut self) -> &mut Option<Box<Self>> {
        &mut self.next
    }
}
