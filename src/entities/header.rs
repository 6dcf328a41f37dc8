//! Common entity header
//!
//! Every entity record starts from the same run of group codes: handle,
//! linetype, layer, elevation, thickness, linetype scale, visibility,
//! color, paperspace flag, graphics data, ownership handles, lineweight,
//! plot style, true color, color name and transparency.  String fields
//! are never empty after construction; enumerated fields keep a closed
//! legal range checked on set.

use crate::codec::field::{DecodeCtx, VersionGate};
use crate::codec::pair::CodePair;
use crate::codec::writer::TagWriter;
use crate::config::{DEFAULT_LAYER, DEFAULT_LINETYPE, DEFAULT_LINETYPE_SCALE};
use crate::diagnostics::DiagnosticKind;
use crate::error::{DxfError, Result};
use crate::types::{Color, Handle, LineWeight, Transparency};
use std::io::Write;

/// Highest legal visibility value (0 = visible, 1 = invisible).
const VISIBILITY_MAX: i16 = 1;

/// Highest legal shadow mode (0 = casts and receives .. 3 = ignores).
const SHADOW_MODE_MAX: i16 = 3;

/// The header fields shared by all entity records.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityHeader {
    /// Identification number (code 5, hex).
    pub handle: Handle,
    /// Linetype name (code 6).
    pub linetype: String,
    /// Layer name (code 8).
    pub layer: String,
    /// Elevation (code 38).
    pub elevation: f64,
    /// Thickness (code 39); 0.0 is never written.
    pub thickness: f64,
    /// Linetype scale (code 48); 1.0 is never written.
    pub linetype_scale: f64,
    /// Visibility (code 60); closed range 0..=1.
    visibility: i16,
    /// Color (codes 62 and 420).
    pub color: Color,
    /// Paperspace flag (code 67).
    pub in_paper_space: bool,
    /// Graphics data byte count (code 92, or 160 on wide targets).
    pub graphics_data_size: i64,
    /// Shadow mode (code 284); closed range 0..=3.
    shadow_mode: i16,
    /// Binary graphics data chunks (repeated code 310).
    pub graphics_data: Vec<Vec<u8>>,
    /// Soft-pointer dictionary owner (code 330).
    pub soft_owner: Handle,
    /// Material handle (code 347).
    pub material: Handle,
    /// Hard-owner dictionary handle (code 360).
    pub hard_owner: Handle,
    /// Lineweight (code 370).
    pub lineweight: LineWeight,
    /// Plot style handle (code 390).
    pub plot_style: Handle,
    /// Color name (code 430).
    pub color_name: String,
    /// Transparency (code 440); absent when never set.
    pub transparency: Option<Transparency>,
}

impl EntityHeader {
    /// Create a header with every field at its documented default.
    pub fn new() -> Self {
        Self {
            handle: Handle::NULL,
            linetype: DEFAULT_LINETYPE.to_string(),
            layer: DEFAULT_LAYER.to_string(),
            elevation: 0.0,
            thickness: 0.0,
            linetype_scale: DEFAULT_LINETYPE_SCALE,
            visibility: 0,
            color: Color::ByLayer,
            in_paper_space: false,
            graphics_data_size: 0,
            shadow_mode: 0,
            graphics_data: Vec::new(),
            soft_owner: Handle::NULL,
            material: Handle::NULL,
            hard_owner: Handle::NULL,
            lineweight: LineWeight::ByLayer,
            plot_style: Handle::NULL,
            color_name: String::new(),
            transparency: None,
        }
    }

    /// Visibility value (0 = visible, 1 = invisible).
    pub fn visibility(&self) -> i16 {
        self.visibility
    }

    /// Set the visibility; values outside 0..=1 are rejected.
    pub fn set_visibility(&mut self, value: i16) -> Result<()> {
        if !(0..=VISIBILITY_MAX).contains(&value) {
            return Err(DxfError::IllegalValue {
                field: "visibility",
                value: value as i64,
            });
        }
        self.visibility = value;
        Ok(())
    }

    /// Shadow mode value.
    pub fn shadow_mode(&self) -> i16 {
        self.shadow_mode
    }

    /// Set the shadow mode; values outside 0..=3 are rejected.
    pub fn set_shadow_mode(&mut self, value: i16) -> Result<()> {
        if !(0..=SHADOW_MODE_MAX).contains(&value) {
            return Err(DxfError::IllegalValue {
                field: "shadow_mode",
                value: value as i64,
            });
        }
        self.shadow_mode = value;
        Ok(())
    }

    /// Apply one decoded pair to this header.
    ///
    /// Returns `false` when the code is not a header code.  Illegal
    /// values are reset to their fallback with a diagnostic; decoding
    /// never fails here.
    pub fn apply_pair(&mut self, pair: &CodePair, ctx: &mut DecodeCtx) -> bool {
        match pair.code {
            5 => {
                if let Some(h) = pair.as_handle() {
                    self.handle = h;
                }
            }
            6 => self.linetype = pair.as_str().to_string(),
            8 => self.layer = pair.as_str().to_string(),
            38 => {
                if let Some(v) = pair.as_double() {
                    self.elevation = v;
                }
            }
            39 => {
                if let Some(v) = pair.as_double() {
                    self.thickness = v;
                }
            }
            48 => {
                if let Some(v) = pair.as_double() {
                    self.linetype_scale = v;
                }
            }
            60 => match pair.as_i16() {
                Some(v) if (0..=VISIBILITY_MAX).contains(&v) => self.visibility = v,
                _ => {
                    ctx.report(
                        DiagnosticKind::IllegalValueReset,
                        format!("illegal visibility '{}' reset to 0", pair.as_str()),
                    );
                    self.visibility = 0;
                }
            },
            62 => {
                if let Some(v) = pair.as_i16() {
                    self.color = Color::from_index(v);
                }
            }
            67 => self.in_paper_space = pair.as_i16().unwrap_or(0) != 0,
            92 | 160 => {
                if let Some(v) = pair.as_int() {
                    self.graphics_data_size = v;
                }
            }
            284 => match pair.as_i16() {
                Some(v) if (0..=SHADOW_MODE_MAX).contains(&v) => self.shadow_mode = v,
                _ => {
                    ctx.report(
                        DiagnosticKind::IllegalValueReset,
                        format!("illegal shadow mode '{}' reset to 0", pair.as_str()),
                    );
                    self.shadow_mode = 0;
                }
            },
            310 => match pair.as_binary() {
                Some(bytes) => self.graphics_data.push(bytes),
                None => ctx.report(
                    DiagnosticKind::IllegalValueReset,
                    "malformed hex in graphics data chunk, chunk dropped",
                ),
            },
            330 => {
                if let Some(h) = pair.as_handle() {
                    self.soft_owner = h;
                }
            }
            347 => {
                if let Some(h) = pair.as_handle() {
                    self.material = h;
                }
            }
            360 => {
                if let Some(h) = pair.as_handle() {
                    self.hard_owner = h;
                }
            }
            370 => {
                if let Some(v) = pair.as_i16() {
                    self.lineweight = LineWeight::from_value(v);
                }
            }
            390 => {
                if let Some(h) = pair.as_handle() {
                    self.plot_style = h;
                }
            }
            420 => {
                if let Some(v) = pair.as_i32() {
                    self.color = Color::from_true_color(v);
                }
            }
            430 => self.color_name = pair.as_str().to_string(),
            440 => {
                if let Some(v) = pair.as_i32() {
                    self.transparency = Some(Transparency::from_alpha_value(v));
                }
            }
            _ => return false,
        }
        true
    }

    /// Emit the header fields in wire order, consulting each field's
    /// version gate and suppressing optional fields at their default.
    pub fn write<W: Write>(&self, w: &mut TagWriter<W>) -> Result<()> {
        let version = w.version();

        if self.handle.is_valid() {
            w.write_handle(5, self.handle)?;
        }
        if self.soft_owner.is_valid() && VersionGate::SINCE_R14.admits(version) {
            w.write_handle(330, self.soft_owner)?;
        }
        if self.hard_owner.is_valid() && VersionGate::SINCE_R14.admits(version) {
            w.write_handle(360, self.hard_owner)?;
        }
        if VersionGate::SINCE_R13.admits(version) {
            w.write_subclass("AcDbEntity")?;
        }
        if self.in_paper_space {
            w.write_i16(67, 1)?;
        }
        w.write_string(8, &self.layer)?;
        if self.linetype != DEFAULT_LINETYPE {
            w.write_string(6, &self.linetype)?;
        }
        if self.material.is_valid() && VersionGate::SINCE_R2007.admits(version) {
            w.write_handle(347, self.material)?;
        }
        if self.color != Color::ByLayer {
            w.write_i16(62, self.color.index())?;
        }
        if self.lineweight != LineWeight::ByLayer && VersionGate::SINCE_R2000.admits(version) {
            w.write_i16(370, self.lineweight.value())?;
        }
        if self.linetype_scale != DEFAULT_LINETYPE_SCALE && VersionGate::SINCE_R13.admits(version) {
            w.write_double(48, self.linetype_scale)?;
        }
        if self.visibility != 0 {
            w.write_i16(60, self.visibility)?;
        }
        if !self.graphics_data.is_empty() && VersionGate::SINCE_R2000.admits(version) {
            let size: i64 = self.graphics_data.iter().map(|c| c.len() as i64).sum();
            if w.wide_graphics_size() {
                w.write_i64(160, size)?;
            } else {
                match i32::try_from(size) {
                    Ok(v) => w.write_i32(92, v)?,
                    // too large for code 92, fall back to the wide code
                    Err(_) => w.write_i64(160, size)?,
                }
            }
            for chunk in &self.graphics_data {
                w.write_binary(310, chunk)?;
            }
        }
        if VersionGate::SINCE_R2004.admits(version) {
            if let Some(tc) = self.color.true_color() {
                w.write_i32(420, tc)?;
            }
            if !self.color_name.is_empty() {
                w.write_string(430, &self.color_name)?;
            }
            if let Some(t) = self.transparency {
                w.write_i32(440, t.alpha_value())?;
            }
        }
        if self.plot_style.is_valid() && VersionGate::SINCE_R2000.admits(version) {
            w.write_handle(390, self.plot_style)?;
        }
        if self.shadow_mode != 0 && VersionGate::SINCE_R2007.admits(version) {
            w.write_i16(284, self.shadow_mode)?;
        }
        if self.elevation != 0.0 {
            w.write_double(38, self.elevation)?;
        }
        if self.thickness != 0.0 {
            w.write_double(39, self.thickness)?;
        }
        Ok(())
    }
}

impl Default for EntityHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSink;
    use crate::diagnostics::SourceLocation;
    use crate::types::DxfVersion;

    fn ctx(diags: &mut DiagnosticSink) -> DecodeCtx<'_> {
        DecodeCtx {
            diags,
            location: SourceLocation::at_line(1),
        }
    }

    #[test]
    fn test_defaults_are_non_empty() {
        let h = EntityHeader::new();
        assert_eq!(h.layer, "0");
        assert_eq!(h.linetype, "BYLAYER");
        assert_eq!(h.linetype_scale, 1.0);
        assert_eq!(h.visibility(), 0);
        assert!(h.handle.is_null());
    }

    #[test]
    fn test_visibility_range_check() {
        let mut h = EntityHeader::new();
        h.set_visibility(1).unwrap();
        assert_eq!(h.visibility(), 1);
        assert!(matches!(
            h.set_visibility(5),
            Err(DxfError::IllegalValue { field: "visibility", .. })
        ));
        // rejected set leaves the old value in place
        assert_eq!(h.visibility(), 1);
    }

    #[test]
    fn test_shadow_mode_range_check() {
        let mut h = EntityHeader::new();
        h.set_shadow_mode(3).unwrap();
        assert!(h.set_shadow_mode(4).is_err());
        assert!(h.set_shadow_mode(-1).is_err());
    }

    #[test]
    fn test_apply_pair_basics() {
        let mut h = EntityHeader::new();
        let mut diags = DiagnosticSink::new();

        assert!(h.apply_pair(&CodePair::new(5, "1A".into()), &mut ctx(&mut diags)));
        assert!(h.apply_pair(&CodePair::new(8, "WALLS".into()), &mut ctx(&mut diags)));
        assert!(h.apply_pair(&CodePair::new(62, "3".into()), &mut ctx(&mut diags)));
        assert!(!h.apply_pair(&CodePair::new(40, "1.5".into()), &mut ctx(&mut diags)));

        assert_eq!(h.handle, Handle::new(0x1A));
        assert_eq!(h.layer, "WALLS");
        assert_eq!(h.color, Color::GREEN);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_apply_pair_illegal_visibility_resets() {
        let mut h = EntityHeader::new();
        let mut diags = DiagnosticSink::new();
        h.apply_pair(&CodePair::new(60, "9".into()), &mut ctx(&mut diags));
        assert_eq!(h.visibility(), 0);
        assert!(diags.has_kind(DiagnosticKind::IllegalValueReset));
    }

    #[test]
    fn test_write_suppresses_defaults() {
        let mut h = EntityHeader::new();
        h.handle = Handle::new(0x1A);

        let mut buf = Vec::new();
        {
            let mut w = TagWriter::new(&mut buf, DxfVersion::R2000);
            h.write(&mut w).unwrap();
        }
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("  5\n1A\n"));
        assert!(out.contains("  8\n0\n"));
        // defaults stay off the wire
        assert!(!out.contains("\n 39\n"));
        assert!(!out.contains("\n 48\n"));
        assert!(!out.contains("\n  6\n"));
        assert!(!out.contains("\n 62\n"));
    }

    #[test]
    fn test_write_gates_by_version() {
        let mut h = EntityHeader::new();
        h.handle = Handle::new(1);
        h.lineweight = LineWeight::Value(25);
        h.transparency = Some(Transparency::new(0x40));

        let emit = |version| {
            let mut buf = Vec::new();
            {
                let mut w = TagWriter::new(&mut buf, version);
                h.write(&mut w).unwrap();
            }
            String::from_utf8(buf).unwrap()
        };

        let r14 = emit(DxfVersion::R14);
        assert!(!r14.contains("370\n"));
        assert!(!r14.contains("440\n"));

        let r2000 = emit(DxfVersion::R2000);
        assert!(r2000.contains("370\n25\n"));
        assert!(!r2000.contains("440\n"));

        let r2004 = emit(DxfVersion::R2004);
        assert!(r2004.contains("440\n"));
    }

    #[test]
    fn test_wide_graphics_size_uses_code_160() {
        let mut h = EntityHeader::new();
        h.graphics_data.push(vec![0xAB, 0xCD]);

        let mut buf = Vec::new();
        {
            let mut w = TagWriter::new(&mut buf, DxfVersion::R2004);
            w.set_wide_graphics_size(true);
            h.write(&mut w).unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("160\n2\n"));
        assert!(!out.contains(" 92\n"));
        assert!(out.contains("310\nABCD\n"));
    }
}
