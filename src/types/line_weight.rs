//! Line weight representation for CAD entities
//!
//! Line weights travel on code 370 (R2000+) as 1/100 mm values with
//! negative sentinels for the ByLayer/ByBlock/Default cases.

/// Represents line weight in AutoCAD
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LineWeight {
    /// Use the layer's line weight
    #[default]
    ByLayer,
    /// Use the block's line weight
    ByBlock,
    /// Default line weight
    Standard,
    /// Specific line weight in 1/100 mm (0-211)
    Value(i16),
}

impl LineWeight {
    /// Create a line weight from the raw code-370 value
    pub fn from_value(value: i16) -> Self {
        match value {
            -1 => LineWeight::ByLayer,
            -2 => LineWeight::ByBlock,
            -3 => LineWeight::Standard,
            v => LineWeight::Value(v),
        }
    }

    /// Get the raw code-370 value
    pub fn value(&self) -> i16 {
        match self {
            LineWeight::ByLayer => -1,
            LineWeight::ByBlock => -2,
            LineWeight::Standard => -3,
            LineWeight::Value(v) => *v,
        }
    }

    /// Get the line weight in millimeters
    pub fn millimeters(&self) -> Option<f64> {
        match self {
            LineWeight::Value(v) => Some(*v as f64 / 100.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_values() {
        assert_eq!(LineWeight::from_value(-1), LineWeight::ByLayer);
        assert_eq!(LineWeight::from_value(-2), LineWeight::ByBlock);
        assert_eq!(LineWeight::from_value(-3), LineWeight::Standard);
        assert_eq!(LineWeight::ByLayer.value(), -1);
    }

    #[test]
    fn test_value_roundtrip() {
        let lw = LineWeight::from_value(25);
        assert_eq!(lw, LineWeight::Value(25));
        assert_eq!(lw.value(), 25);
        assert_eq!(lw.millimeters(), Some(0.25));
    }
}
