//! Group-code/value pairs and the code-range value typing table

use crate::types::Handle;

/// Scalar class a group code's value belongs to, decided by the
/// code-range table of the DXF reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupValueType {
    /// Text value
    Str,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// Double-precision float
    Double,
    /// Boolean (written as 0/1)
    Bool,
    /// Hexadecimal object handle
    HandleHex,
    /// Hex-encoded binary chunk line
    Binary,
    /// Comment line (code 999), echoed but never stored
    Comment,
}

impl GroupValueType {
    /// Classify a group code by the standard range table.
    /// Codes outside every known range classify as strings so that
    /// unknown fields from newer revisions can still be skipped over.
    pub fn from_code(code: i32) -> Self {
        match code {
            0..=9 => Self::Str,
            10..=59 => Self::Double,
            60..=79 => Self::Int16,
            90..=99 => Self::Int32,
            100 | 102 => Self::Str,
            105 => Self::HandleHex,
            110..=149 => Self::Double,
            160..=169 => Self::Int64,
            170..=179 => Self::Int16,
            210..=239 => Self::Double,
            270..=289 => Self::Int16,
            290..=299 => Self::Bool,
            300..=309 => Self::Str,
            310..=319 => Self::Binary,
            320..=369 => Self::HandleHex,
            370..=389 => Self::Int16,
            390..=399 => Self::HandleHex,
            400..=409 => Self::Int16,
            410..=419 => Self::Str,
            420..=429 => Self::Int32,
            430..=439 => Self::Str,
            440..=449 => Self::Int32,
            450..=459 => Self::Int32,
            460..=469 => Self::Double,
            470..=479 => Self::Str,
            480..=481 => Self::HandleHex,
            999 => Self::Comment,
            1000..=1009 => Self::Str,
            1010..=1059 => Self::Double,
            1060..=1070 => Self::Int16,
            1071 => Self::Int32,
            _ => Self::Str,
        }
    }
}

/// A transient group-code/value record.
///
/// The raw value line is retained verbatim; typed views are parsed
/// eagerly by the value class of the code.
#[derive(Debug, Clone)]
pub struct CodePair {
    /// The group code
    pub code: i32,
    /// The value class of the code
    pub value_type: GroupValueType,
    /// The raw value line
    pub value: String,
    /// Integer value, when the code is an integer class
    value_int: Option<i64>,
    /// Floating-point value, when the code is a double class
    value_double: Option<f64>,
    /// Boolean value, when the code is a bool class
    value_bool: Option<bool>,
}

impl CodePair {
    /// Create a pair, parsing the typed views for the code's value class.
    pub fn new(code: i32, value: String) -> Self {
        let value_type = GroupValueType::from_code(code);

        let value_int = match value_type {
            GroupValueType::Int16 | GroupValueType::Int32 | GroupValueType::Int64 => {
                value.trim().parse::<i64>().ok()
            }
            _ => None,
        };
        let value_double = match value_type {
            GroupValueType::Double => value.trim().parse::<f64>().ok(),
            _ => None,
        };
        let value_bool = match value_type {
            GroupValueType::Bool => value.trim().parse::<i32>().ok().map(|v| v != 0),
            _ => None,
        };

        Self {
            code,
            value_type,
            value,
            value_int,
            value_double,
            value_bool,
        }
    }

    /// Whether this pair opens the next record (the code-0 sentinel).
    pub fn is_record_start(&self) -> bool {
        self.code == 0
    }

    /// Get value as string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Get value as integer
    pub fn as_int(&self) -> Option<i64> {
        self.value_int
    }

    /// Get value as i16
    pub fn as_i16(&self) -> Option<i16> {
        self.value_int.and_then(|v| i16::try_from(v).ok())
    }

    /// Get value as i32
    pub fn as_i32(&self) -> Option<i32> {
        self.value_int.and_then(|v| i32::try_from(v).ok())
    }

    /// Get value as double
    pub fn as_double(&self) -> Option<f64> {
        self.value_double
    }

    /// Get value as boolean
    pub fn as_bool(&self) -> Option<bool> {
        self.value_bool
    }

    /// Get value as handle (hex string)
    pub fn as_handle(&self) -> Option<Handle> {
        Handle::from_hex(&self.value)
    }

    /// Decode a hex-encoded binary chunk line.
    /// Returns `None` when the line is not well-formed hex.
    pub fn as_binary(&self) -> Option<Vec<u8>> {
        let s = self.value.trim();
        if !s.is_ascii() || s.len() % 2 != 0 {
            return None;
        }
        let mut bytes = Vec::with_capacity(s.len() / 2);
        for i in (0..s.len()).step_by(2) {
            bytes.push(u8::from_str_radix(&s[i..i + 2], 16).ok()?);
        }
        Some(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_typing_by_range() {
        assert_eq!(GroupValueType::from_code(8), GroupValueType::Str);
        assert_eq!(GroupValueType::from_code(10), GroupValueType::Double);
        assert_eq!(GroupValueType::from_code(70), GroupValueType::Int16);
        assert_eq!(GroupValueType::from_code(92), GroupValueType::Int32);
        assert_eq!(GroupValueType::from_code(160), GroupValueType::Int64);
        assert_eq!(GroupValueType::from_code(310), GroupValueType::Binary);
        assert_eq!(GroupValueType::from_code(330), GroupValueType::HandleHex);
        assert_eq!(GroupValueType::from_code(999), GroupValueType::Comment);
    }

    #[test]
    fn test_int_pair() {
        let p = CodePair::new(70, "42".to_string());
        assert_eq!(p.as_i16(), Some(42));
        assert_eq!(p.as_int(), Some(42));
        assert_eq!(p.as_double(), None);
    }

    #[test]
    fn test_double_pair() {
        let p = CodePair::new(40, "123.456".to_string());
        assert_eq!(p.as_double(), Some(123.456));
    }

    #[test]
    fn test_handle_pair() {
        let p = CodePair::new(5, "1A".to_string());
        assert_eq!(p.as_handle(), Some(Handle::new(0x1A)));
    }

    #[test]
    fn test_binary_pair() {
        let p = CodePair::new(310, "DEADBEEF".to_string());
        assert_eq!(p.as_binary(), Some(vec![0xDE, 0xAD, 0xBE, 0xEF]));

        let bad = CodePair::new(310, "XYZ".to_string());
        assert_eq!(bad.as_binary(), None);
    }

    #[test]
    fn test_record_start() {
        assert!(CodePair::new(0, "BODY".to_string()).is_record_start());
        assert!(!CodePair::new(8, "0".to_string()).is_record_start());
    }

    #[test]
    fn test_illegal_int_value_is_none() {
        let p = CodePair::new(70, "not-a-number".to_string());
        assert_eq!(p.as_i16(), None);
    }
}
