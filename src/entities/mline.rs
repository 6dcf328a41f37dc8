//! MLINE entity — multiple parallel lines
//!
//! The MLINE record carries a style reference, a start point and an
//! unbounded vertex list decoded from the repeating 11/21/31 triplet.
//! Its declared vertex count (code 72) is cross-checked against the
//! list; a mismatch is a warning, matching how real-world files behave.

use super::header::EntityHeader;
use crate::chain::Chained;
use crate::codec::containers::PointList;
use crate::codec::field::{
    decode_record, DecodeCtx, FieldDispatch, FieldRule, RecordEntity, VersionGate,
};
use crate::codec::pair::CodePair;
use crate::codec::reader::TagReader;
use crate::codec::recovery::{check_count, check_write_version, normalize_after_read};
use crate::codec::writer::TagWriter;
use crate::config::CodecDefaults;
use crate::diagnostics::{DiagnosticKind, DiagnosticSink, SourceLocation};
use crate::error::{DxfError, Result};
use crate::types::{DxfVersion, Handle, Vector3};
use bitflags::bitflags;
use once_cell::sync::Lazy;
use std::io::{Read, Write};

/// Default MLINE style name.
pub const DEFAULT_MLINE_STYLE: &str = "STANDARD";

bitflags! {
    /// MLINE flags (code 71).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MLineFlags: i16 {
        /// Has at least one vertex.
        const HAS_VERTICES = 1;
        /// The multiline is closed.
        const CLOSED = 2;
        /// Suppress start caps.
        const NO_START_CAPS = 4;
        /// Suppress end caps.
        const NO_END_CAPS = 8;
    }
}

/// Justification of the parallel lines relative to the vertex path
/// (code 70); closed range 0..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum MLineJustification {
    /// Justify to the top line.
    #[default]
    Top = 0,
    /// Justify to the zero offset.
    Zero = 1,
    /// Justify to the bottom line.
    Bottom = 2,
}

impl MLineJustification {
    /// Decode a code-70 value; out-of-range values return `None`.
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Top),
            1 => Some(Self::Zero),
            2 => Some(Self::Bottom),
            _ => None,
        }
    }

    /// The code-70 value.
    pub fn value(self) -> i16 {
        self as i16
    }
}

/// A multiline entity.
#[derive(Debug, Clone)]
pub struct MLine {
    /// Common entity header.
    pub header: EntityHeader,
    /// Referenced style name (code 2).
    pub style_name: String,
    /// Referenced MLINESTYLE object handle (code 340).
    pub style_handle: Handle,
    /// Scale factor (code 40).
    pub scale_factor: f64,
    /// Justification (code 70).
    justification: MLineJustification,
    /// Flags (code 71).
    pub flags: MLineFlags,
    /// Vertex count as declared by code 72.
    pub declared_vertex_count: i16,
    /// Style element count (code 73).
    pub style_element_count: i16,
    /// Start point (codes 10/20/30).
    pub start_point: Vector3,
    /// Extrusion direction (codes 210/220/230).
    pub extrusion: Vector3,
    /// Vertex points (repeating codes 11/21/31).
    pub vertices: PointList,
    /// Forward link to the next MLINE in a chain.
    next: Option<Box<MLine>>,
}

fn orphan_component(ctx: &mut DecodeCtx, code: i32) {
    ctx.report(
        DiagnosticKind::Note,
        format!("MLINE: code {} with no open vertex, ignored", code),
    );
}

static DISPATCH: Lazy<FieldDispatch<MLine>> = Lazy::new(|| {
    FieldDispatch::new(
        vec![
            FieldRule::new(2, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                e.style_name = p.as_str().to_string();
                Ok(())
            }),
            FieldRule::new(340, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(h) = p.as_handle() {
                    e.style_handle = h;
                }
                Ok(())
            }),
            FieldRule::new(40, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_double() {
                    e.scale_factor = v;
                }
                Ok(())
            }),
            FieldRule::new(70, VersionGate::SINCE_R13, |e: &mut MLine, p, ctx| {
                match p.as_i16().and_then(MLineJustification::from_i16) {
                    Some(j) => e.justification = j,
                    None => {
                        ctx.report(
                            DiagnosticKind::IllegalValueReset,
                            format!("MLINE: illegal justification '{}' reset to 0", p.as_str()),
                        );
                        e.justification = MLineJustification::Top;
                    }
                }
                Ok(())
            }),
            FieldRule::new(71, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_i16() {
                    e.flags = MLineFlags::from_bits_truncate(v);
                }
                Ok(())
            }),
            FieldRule::new(72, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_i16() {
                    e.declared_vertex_count = v;
                }
                Ok(())
            }),
            FieldRule::new(73, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_i16() {
                    e.style_element_count = v;
                }
                Ok(())
            }),
            FieldRule::new(10, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_double() {
                    e.start_point.x = v;
                }
                Ok(())
            }),
            FieldRule::new(20, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_double() {
                    e.start_point.y = v;
                }
                Ok(())
            }),
            FieldRule::new(30, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_double() {
                    e.start_point.z = v;
                }
                Ok(())
            }),
            FieldRule::new(210, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_double() {
                    e.extrusion.x = v;
                }
                Ok(())
            }),
            FieldRule::new(220, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_double() {
                    e.extrusion.y = v;
                }
                Ok(())
            }),
            FieldRule::new(230, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_double() {
                    e.extrusion.z = v;
                }
                Ok(())
            }),
            // a recurring code 11 opens the next vertex
            FieldRule::new(11, VersionGate::SINCE_R13, |e: &mut MLine, p, _| {
                if let Some(v) = p.as_double() {
                    e.vertices.start_with_x(v);
                }
                Ok(())
            }),
            FieldRule::new(21, VersionGate::SINCE_R13, vertex_y),
            FieldRule::new(31, VersionGate::SINCE_R13, vertex_z),
        ],
        &["AcDbEntity", "AcDbMline"],
    )
});

fn vertex_y(e: &mut MLine, p: &CodePair, ctx: &mut DecodeCtx) -> Result<()> {
    if let Some(v) = p.as_double() {
        if !e.vertices.set_last_y(v) {
            orphan_component(ctx, 21);
        }
    }
    Ok(())
}

fn vertex_z(e: &mut MLine, p: &CodePair, ctx: &mut DecodeCtx) -> Result<()> {
    if let Some(v) = p.as_double() {
        if !e.vertices.set_last_z(v) {
            orphan_component(ctx, 31);
        }
    }
    Ok(())
}

impl MLine {
    /// Create an MLINE with every field at its documented default.
    pub fn new() -> Self {
        Self {
            header: EntityHeader::new(),
            style_name: DEFAULT_MLINE_STYLE.to_string(),
            style_handle: Handle::NULL,
            scale_factor: 1.0,
            justification: MLineJustification::Top,
            flags: MLineFlags::empty(),
            declared_vertex_count: 0,
            style_element_count: 0,
            start_point: Vector3::ZERO,
            extrusion: Vector3::UNIT_Z,
            vertices: PointList::new(),
            next: None,
        }
    }

    /// Justification (code 70).
    pub fn justification(&self) -> MLineJustification {
        self.justification
    }

    /// Set the justification from a raw code-70 value; values outside
    /// 0..=2 are rejected.
    pub fn set_justification(&mut self, value: i16) -> Result<()> {
        match MLineJustification::from_i16(value) {
            Some(j) => {
                self.justification = j;
                Ok(())
            }
            None => Err(DxfError::IllegalValue {
                field: "justification",
                value: value as i64,
            }),
        }
    }

    /// Append a vertex, keeping the declared count in step.
    pub fn push_vertex(&mut self, point: Vector3) {
        self.vertices.push(point);
        self.declared_vertex_count = self.vertices.len() as i16;
        self.flags |= MLineFlags::HAS_VERTICES;
    }

    /// Decode one MLINE record.  The code-0 pair naming the record has
    /// already been consumed; decoding stops at the next code-0 pair.
    pub fn read<R: Read>(
        reader: &mut TagReader<R>,
        defaults: &CodecDefaults,
        diags: &mut DiagnosticSink,
    ) -> Result<Self> {
        let mut mline = MLine::new();
        decode_record(reader, &DISPATCH, &mut mline, diags)?;

        let location = SourceLocation {
            file: Some(reader.file_name().to_string()),
            line: reader.line_number(),
        };
        normalize_after_read(&mut mline.header, defaults, diags, location.clone());
        if mline.style_name.is_empty() {
            mline.style_name = DEFAULT_MLINE_STYLE.to_string();
            diags.report(
                DiagnosticKind::DefaultedField,
                format!("empty MLINE style name replaced by \"{}\"", DEFAULT_MLINE_STYLE),
                location.clone(),
            );
        }
        check_count(
            Self::RECORD_NAME,
            "code 72",
            mline.declared_vertex_count as i64,
            mline.vertices.len(),
            diags,
            location,
        );
        Ok(mline)
    }

    /// Encode this MLINE in wire order.
    pub fn write<W: Write>(
        &self,
        writer: &mut TagWriter<W>,
        diags: &mut DiagnosticSink,
    ) -> Result<()> {
        check_write_version(Self::RECORD_NAME, Self::MIN_VERSION, writer, diags)?;

        writer.write_record_type(Self::RECORD_NAME)?;
        self.header.write(writer)?;
        if VersionGate::SINCE_R13.admits(writer.version()) {
            writer.write_subclass("AcDbMline")?;
        }
        writer.write_string(2, &self.style_name)?;
        if self.style_handle.is_valid() {
            writer.write_handle(340, self.style_handle)?;
        }
        writer.write_double(40, self.scale_factor)?;
        writer.write_i16(70, self.justification.value())?;
        writer.write_i16(71, self.flags.bits())?;
        // always the populated count, not whatever code 72 declared
        writer.write_i16(72, self.vertices.len() as i16)?;
        writer.write_i16(73, self.style_element_count)?;
        writer.write_point3d(10, self.start_point)?;
        if self.extrusion != Vector3::UNIT_Z {
            writer.write_point3d(210, self.extrusion)?;
        }
        for vertex in &self.vertices {
            writer.write_point3d(11, *vertex)?;
        }
        Ok(())
    }

    fn payload_eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.style_name == other.style_name
            && self.style_handle == other.style_handle
            && self.scale_factor == other.scale_factor
            && self.justification == other.justification
            && self.flags == other.flags
            && self.declared_vertex_count == other.declared_vertex_count
            && self.style_element_count == other.style_element_count
            && self.start_point == other.start_point
            && self.extrusion == other.extrusion
            && self.vertices == other.vertices
    }
}

impl Default for MLine {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MLine {
    fn eq(&self, other: &Self) -> bool {
        self.payload_eq(other)
    }
}

impl RecordEntity for MLine {
    const RECORD_NAME: &'static str = "MLINE";
    const MIN_VERSION: DxfVersion = DxfVersion::R13;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }
}

impl Chained for MLine {
    fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }

    fn next_slot(&mut self) -> &mut Option<Box<Self>> {
        &mut self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(data: &str) -> (MLine, DiagnosticSink) {
        let mut reader = TagReader::new(Cursor::new(data.as_bytes().to_vec()));
        let mut diags = DiagnosticSink::new();
        let mline = MLine::read(&mut reader, &CodecDefaults::standard(), &mut diags).unwrap();
        (mline, diags)
    }

    #[test]
    fn test_vertex_triplets_grow_the_list() {
        let data = " 72\n2\n 11\n1.0\n 21\n2.0\n 31\n3.0\n 11\n4.0\n 21\n5.0\n 31\n6.0\n";
        let (mline, diags) = decode(data);
        assert_eq!(mline.vertices.len(), 2);
        assert_eq!(mline.vertices.as_slice()[1], Vector3::new(4.0, 5.0, 6.0));
        assert!(!diags.has_kind(DiagnosticKind::CountMismatch));
    }

    #[test]
    fn test_vertex_count_mismatch_warns() {
        let data = " 72\n4\n 11\n1.0\n 21\n2.0\n";
        let (mline, diags) = decode(data);
        assert_eq!(mline.vertices.len(), 1);
        assert!(diags.has_kind(DiagnosticKind::CountMismatch));
    }

    #[test]
    fn test_orphan_vertex_component_noted() {
        let (mline, diags) = decode(" 21\n9.0\n");
        assert!(mline.vertices.is_empty());
        assert!(diags.has_kind(DiagnosticKind::Note));
    }

    #[test]
    fn test_illegal_justification_reset() {
        let (mline, diags) = decode(" 70\n7\n");
        assert_eq!(mline.justification(), MLineJustification::Top);
        assert!(diags.has_kind(DiagnosticKind::IllegalValueReset));
    }

    #[test]
    fn test_justification_setter_range() {
        let mut mline = MLine::new();
        mline.set_justification(2).unwrap();
        assert_eq!(mline.justification(), MLineJustification::Bottom);
        assert!(mline.set_justification(3).is_err());
    }

    #[test]
    fn test_push_vertex_keeps_count_in_step() {
        let mut mline = MLine::new();
        mline.push_vertex(Vector3::new(1.0, 2.0, 0.0));
        mline.push_vertex(Vector3::new(3.0, 4.0, 0.0));
        assert_eq!(mline.declared_vertex_count, 2);
        assert!(mline.flags.contains(MLineFlags::HAS_VERTICES));
    }

    #[test]
    fn test_write_emits_populated_vertex_count() {
        let mut mline = MLine::new();
        mline.vertices.push(Vector3::new(1.0, 2.0, 0.0));
        mline.vertices.push(Vector3::new(3.0, 4.0, 0.0));
        mline.vertices.push(Vector3::new(5.0, 6.0, 0.0));
        // declared count deliberately left at 0

        let mut buf = Vec::new();
        let mut diags = DiagnosticSink::new();
        {
            let mut w = TagWriter::new(&mut buf, DxfVersion::R2000);
            mline.write(&mut w, &mut diags).unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains(" 72\n3\n"));
    }

    #[test]
    fn test_write_skips_default_extrusion() {
        let mut mline = MLine::new();
        mline.push_vertex(Vector3::new(1.0, 1.0, 0.0));

        let mut buf = Vec::new();
        let mut diags = DiagnosticSink::new();
        {
            let mut w = TagWriter::new(&mut buf, DxfVersion::R2000);
            mline.write(&mut w, &mut diags).unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("  2\nSTANDARD\n"));
        assert!(!out.contains("210\n"));
        assert!(out.contains(" 11\n1.000000\n"));
    }
}
