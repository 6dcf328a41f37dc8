//! Handle type for CAD objects
//!
//! Handles are unique 64-bit identifiers carried in hexadecimal group
//! codes (5, 330, 360, ...).  Handle 0 is reserved and invalid.

use std::fmt;

/// A unique identifier for CAD objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(u64);

impl Handle {
    /// The null/invalid handle (0)
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Parse a handle from its hexadecimal wire form.
    pub fn from_hex(s: &str) -> Option<Self> {
        u64::from_str_radix(s.trim(), 16).ok().map(Handle)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is a null/invalid handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is a valid handle
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::LowerHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_basics() {
        let h = Handle::new(0x1A);
        assert_eq!(h.value(), 26);
        assert!(h.is_valid());
        assert!(Handle::NULL.is_null());
    }

    #[test]
    fn test_handle_from_hex() {
        assert_eq!(Handle::from_hex("1A"), Some(Handle::new(0x1A)));
        assert_eq!(Handle::from_hex("  ff "), Some(Handle::new(255)));
        assert_eq!(Handle::from_hex("zz"), None);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(format!("{:X}", Handle::new(255)), "FF");
        assert_eq!(format!("{}", Handle::new(255)), "0xFF");
    }
}
