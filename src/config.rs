//! Documented default values applied by the recovery policy.
//!
//! The defaults live in an immutable configuration object handed to the
//! codec rather than in mutable global state, so two decodes with
//! different conventions cannot interfere.

/// Default layer name for entities with an empty layer field.
pub const DEFAULT_LAYER: &str = "0";

/// Default linetype name for entities with an empty linetype field.
pub const DEFAULT_LINETYPE: &str = "BYLAYER";

/// Default linetype scale; never written when the field holds it.
pub const DEFAULT_LINETYPE_SCALE: f64 = 1.0;

/// Default color index (256 = ByLayer).
pub const DEFAULT_COLOR_INDEX: i16 = 256;

/// Documented defaults consulted when normalizing a decoded record and
/// when substituting values for fields the caller left unset.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecDefaults {
    /// Replacement for an empty layer name.
    pub layer: String,
    /// Replacement for an empty linetype name.
    pub linetype: String,
    /// Linetype scale suppressed on write when equal to this.
    pub linetype_scale: f64,
    /// Elevation suppressed on write when equal to this.
    pub elevation: f64,
    /// Thickness suppressed on write when equal to this.
    pub thickness: f64,
    /// Visibility fallback (0 = visible).
    pub visibility: i16,
    /// Color index fallback.
    pub color_index: i16,
}

impl CodecDefaults {
    /// The standard AutoCAD defaults.
    pub fn standard() -> Self {
        Self {
            layer: DEFAULT_LAYER.to_string(),
            linetype: DEFAULT_LINETYPE.to_string(),
            linetype_scale: DEFAULT_LINETYPE_SCALE,
            elevation: 0.0,
            thickness: 0.0,
            visibility: 0,
            color_index: DEFAULT_COLOR_INDEX,
        }
    }
}

impl Default for CodecDefaults {
    fn default() -> Self {
        Self::standard()
    }
}
