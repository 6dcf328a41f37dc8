//! DXF format version enumeration
//!
//! The format revision gates which fields are legal to read or write.
//! Variants are declared in chronological order so `Ord` gives the
//! "at least R2000" style comparisons used by the field codec.

use std::fmt;

/// A DXF format revision, identified by its `$ACADVER` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DxfVersion {
    /// AutoCAD R12 (AC1009)
    R12,
    /// AutoCAD R13 (AC1012)
    R13,
    /// AutoCAD R14 (AC1014)
    R14,
    /// AutoCAD 2000 (AC1015)
    R2000,
    /// AutoCAD 2004 (AC1018)
    R2004,
    /// AutoCAD 2007 (AC1021)
    R2007,
    /// AutoCAD 2010 (AC1024)
    R2010,
    /// AutoCAD 2013 (AC1027)
    R2013,
    /// AutoCAD 2018 (AC1032)
    R2018,
}

impl DxfVersion {
    /// Parse an `$ACADVER` string (e.g. `"AC1015"`).
    pub fn from_version_string(s: &str) -> Option<Self> {
        match s.trim() {
            "AC1009" => Some(Self::R12),
            "AC1012" => Some(Self::R13),
            "AC1014" => Some(Self::R14),
            "AC1015" => Some(Self::R2000),
            "AC1018" => Some(Self::R2004),
            "AC1021" => Some(Self::R2007),
            "AC1024" => Some(Self::R2010),
            "AC1027" => Some(Self::R2013),
            "AC1032" => Some(Self::R2018),
            _ => None,
        }
    }

    /// The `$ACADVER` string for this version.
    pub fn to_dxf_string(self) -> &'static str {
        match self {
            Self::R12 => "AC1009",
            Self::R13 => "AC1012",
            Self::R14 => "AC1014",
            Self::R2000 => "AC1015",
            Self::R2004 => "AC1018",
            Self::R2007 => "AC1021",
            Self::R2010 => "AC1024",
            Self::R2013 => "AC1027",
            Self::R2018 => "AC1032",
        }
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dxf_string())
    }
}
