//! Group-code token stream writer

use crate::error::Result;
use crate::types::{DxfVersion, Handle, Vector3};
use std::io::Write;

/// Writes `code\nvalue\n` pairs to an ASCII DXF stream.
///
/// Codes are right-aligned in a 3-character field, mirroring input
/// formatting so unmodified records round-trip byte-for-byte.  Carries
/// the target format version and the strict version rules switch the
/// encoding predicates consult.
pub struct TagWriter<W: Write> {
    writer: W,
    version: DxfVersion,
    strict_versions: bool,
    /// Emit the graphics-data byte count on code 160 instead of 92.
    wide_graphics_size: bool,
}

impl<W: Write> TagWriter<W> {
    /// Create a writer targeting the given format version.
    pub fn new(writer: W, version: DxfVersion) -> Self {
        Self {
            writer,
            version,
            strict_versions: false,
            wide_graphics_size: false,
        }
    }

    /// The target format version.
    pub fn version(&self) -> DxfVersion {
        self.version
    }

    /// Whether strict version rules are enabled.
    pub fn strict_versions(&self) -> bool {
        self.strict_versions
    }

    /// Enable or disable strict version rules.
    pub fn set_strict_versions(&mut self, strict: bool) {
        self.strict_versions = strict;
    }

    /// Whether the graphics-data byte count goes out on code 160.
    pub fn wide_graphics_size(&self) -> bool {
        self.wide_graphics_size
    }

    /// Select code 160 (wide) or 92 for the graphics-data byte count.
    pub fn set_wide_graphics_size(&mut self, wide: bool) {
        self.wide_graphics_size = wide;
    }

    /// Write a group code right-aligned in a 3-character field.
    fn write_code(&mut self, code: i32) -> Result<()> {
        if (0..10).contains(&code) {
            writeln!(self.writer, "  {}", code)?;
        } else if (10..100).contains(&code) {
            writeln!(self.writer, " {}", code)?;
        } else {
            writeln!(self.writer, "{}", code)?;
        }
        Ok(())
    }

    /// Write a string pair.
    pub fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    /// Write an i16 pair as signed decimal.
    pub fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    /// Write an i32 pair as signed decimal.
    pub fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    /// Write an i64 pair as signed decimal.
    pub fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    /// Write a double pair with fixed 6-decimal precision.
    /// Never uses scientific notation.
    pub fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{:.6}", value)?;
        Ok(())
    }

    /// Write a boolean pair as 0/1.
    pub fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", if value { 1 } else { 0 })?;
        Ok(())
    }

    /// Write a handle pair as uppercase hex.
    pub fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{:X}", handle.value())?;
        Ok(())
    }

    /// Write a binary chunk line as uppercase hex pairs.
    pub fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()> {
        self.write_code(code)?;
        for byte in data {
            write!(self.writer, "{:02X}", byte)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Write an x/y/z triplet on codes `code`, `code+10`, `code+20`.
    pub fn write_point3d(&mut self, code: i32, point: Vector3) -> Result<()> {
        self.write_double(code, point.x)?;
        self.write_double(code + 10, point.y)?;
        self.write_double(code + 20, point.z)?;
        Ok(())
    }

    /// Write a code-100 subclass marker.
    pub fn write_subclass(&mut self, marker: &str) -> Result<()> {
        self.write_string(100, marker)
    }

    /// Open a record with its code-0 type name.
    pub fn write_record_type(&mut self, name: &str) -> Result<()> {
        self.write_string(0, name)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Get the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
