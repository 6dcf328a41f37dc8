//! Transparency representation for CAD entities
//!
//! Transparency travels on code 440 (R2004+) in the packed 32-bit alpha
//! format: the top byte selects BYLAYER/BYBLOCK/value, the bottom byte
//! holds the alpha when the type byte is 3.

/// Transparency of an entity; 0 = opaque, 255 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Transparency(u8);

impl Transparency {
    /// Fully opaque (0% transparent)
    pub const OPAQUE: Transparency = Transparency(0);

    /// Fully transparent (100% transparent)
    pub const TRANSPARENT: Transparency = Transparency(255);

    /// Create a new transparency from an alpha value (0-255)
    pub const fn new(alpha: u8) -> Self {
        Transparency(alpha)
    }

    /// Decode the packed code-440 value.
    ///
    /// Type byte 0 = BYLAYER, 1 = BYBLOCK, 3 = explicit alpha.
    pub fn from_alpha_value(value: i32) -> Self {
        let v = value as u32;
        match (v >> 24) as u8 {
            3 => Transparency((v & 0xFF) as u8),
            _ => Transparency::OPAQUE,
        }
    }

    /// Encode to the packed code-440 value.
    pub fn alpha_value(&self) -> i32 {
        (0x0300_0000u32 | self.0 as u32) as i32
    }

    /// Get the raw alpha value (0-255)
    pub const fn alpha(&self) -> u8 {
        self.0
    }
}

impl Default for Transparency {
    fn default() -> Self {
        Transparency::OPAQUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_value_roundtrip() {
        let t = Transparency::new(0x7F);
        assert_eq!(Transparency::from_alpha_value(t.alpha_value()), t);
    }

    #[test]
    fn test_bylayer_type_byte_is_opaque() {
        assert_eq!(Transparency::from_alpha_value(0x0000_0040), Transparency::OPAQUE);
    }
}
