//! Line-counted group-code token stream reader

use super::pair::CodePair;
use crate::error::{DxfError, Result};
use crate::types::DxfVersion;
use encoding_rs::Encoding;
use std::io::{BufReader, Read};

/// Reads `code\nvalue\n` pairs from an ASCII DXF stream.
///
/// Tracks the current line number and carries the version context the
/// section-level driver detected from `$ACADVER`, plus the strict
/// version rules switch.  A read error aborts the current record; the
/// propagated error is tagged with the file name and line number.
pub struct TagReader<R: Read> {
    reader: BufReader<R>,
    file_name: String,
    line_number: usize,
    peeked_pair: Option<CodePair>,
    version: DxfVersion,
    strict_versions: bool,
    /// Non-UTF8 fallback encoding.  `None` means Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
}

impl<R: Read> TagReader<R> {
    /// Create a reader over an unnamed in-memory stream.
    pub fn new(inner: R) -> Self {
        Self::with_name(inner, "<input>")
    }

    /// Create a reader tagged with a source file name for error reporting.
    pub fn with_name(inner: R, file_name: impl Into<String>) -> Self {
        Self {
            reader: BufReader::new(inner),
            file_name: file_name.into(),
            line_number: 0,
            peeked_pair: None,
            version: DxfVersion::R2018,
            strict_versions: false,
            encoding: None,
        }
    }

    /// The source file name used in error messages.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Current 1-based line number (0 before any line was read).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The format version context of this stream.
    pub fn version(&self) -> DxfVersion {
        self.version
    }

    /// Set the format version context (driver calls this after `$ACADVER`).
    pub fn set_version(&mut self, version: DxfVersion) {
        self.version = version;
    }

    /// Whether strict version rules are enabled.
    pub fn strict_versions(&self) -> bool {
        self.strict_versions
    }

    /// Enable or disable strict version rules.
    pub fn set_strict_versions(&mut self, strict: bool) {
        self.strict_versions = strict;
    }

    /// Set the non-UTF8 fallback encoding.
    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }

    /// Read a single line, handling non-UTF8 bytes gracefully.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();

        loop {
            let mut byte = [0u8; 1];
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    if bytes.is_empty() {
                        return Ok(None);
                    }
                    break;
                }
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    bytes.push(byte[0]);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.line_number += 1;

        // UTF-8 first, then the configured encoding or Latin-1 fallback
        let line = match String::from_utf8(bytes.clone()) {
            Ok(s) => s,
            Err(_) => {
                if let Some(enc) = self.encoding {
                    let (decoded, _, _) = enc.decode(&bytes);
                    decoded.into_owned()
                } else {
                    bytes.iter().map(|&b| b as char).collect()
                }
            }
        };

        Ok(Some(line.trim().to_string()))
    }

    fn read_pair_internal(&mut self) -> Result<Option<CodePair>> {
        let code_line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };

        let code = code_line.trim().parse::<i32>().map_err(|_| {
            DxfError::parse(
                &self.file_name,
                self.line_number,
                format!("invalid group code '{}'", code_line),
            )
        })?;

        let value_line = match self.read_line()? {
            Some(line) => line,
            None => {
                return Err(DxfError::parse(
                    &self.file_name,
                    self.line_number,
                    format!("unexpected EOF after code {}", code),
                ))
            }
        };

        let value = Self::expand_caret_sequences(&value_line);
        Ok(Some(CodePair::new(code, value)))
    }

    /// Expand the caret control sequences DXF uses in string values.
    fn expand_caret_sequences(value: &str) -> String {
        value
            .replace("^J", "\n")
            .replace("^M", "\r")
            .replace("^I", "\t")
            .replace("^ ", "^")
    }

    /// Read the next code/value pair; `None` at clean end of stream.
    pub fn read_pair(&mut self) -> Result<Option<CodePair>> {
        if let Some(pair) = self.peeked_pair.take() {
            return Ok(Some(pair));
        }
        self.read_pair_internal()
    }

    /// Peek at the next code without consuming the pair.
    pub fn peek_code(&mut self) -> Result<Option<i32>> {
        if let Some(ref pair) = self.peeked_pair {
            return Ok(Some(pair.code));
        }
        if let Some(pair) = self.read_pair_internal()? {
            let code = pair.code;
            self.peeked_pair = Some(pair);
            Ok(Some(code))
        } else {
            Ok(None)
        }
    }

    /// Push a pair back to be returned by the next `read_pair` call.
    /// Used to leave the code-0 end-of-record sentinel for the caller.
    pub fn push_back(&mut self, pair: CodePair) {
        self.peeked_pair = Some(pair);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &str) -> TagReader<Cursor<Vec<u8>>> {
        TagReader::new(Cursor::new(data.as_bytes().to_vec()))
    }

    #[test]
    fn test_read_simple_pair() {
        let mut r = reader("0\nBODY\n");
        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair.code, 0);
        assert_eq!(pair.as_str(), "BODY");
        assert_eq!(r.line_number(), 2);
    }

    #[test]
    fn test_read_padded_code() {
        let mut r = reader("  5\n1A\n");
        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair.code, 5);
        assert_eq!(pair.as_handle().unwrap().value(), 0x1A);
    }

    #[test]
    fn test_invalid_code_reports_location() {
        let mut r = TagReader::with_name(
            Cursor::new(b"garbage\n0\n".to_vec()),
            "broken.dxf",
        );
        let err = r.read_pair().unwrap_err();
        match err {
            DxfError::Parse { file, line, .. } => {
                assert_eq!(file, "broken.dxf");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_eof_after_code_is_error() {
        let mut r = reader("70\n");
        assert!(r.read_pair().is_err());
    }

    #[test]
    fn test_clean_eof_is_none() {
        let mut r = reader("");
        assert!(r.read_pair().unwrap().is_none());
    }

    #[test]
    fn test_peek_and_push_back() {
        let mut r = reader("0\nBODY\n8\n0\n");
        assert_eq!(r.peek_code().unwrap(), Some(0));

        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair.code, 0);

        let next = r.read_pair().unwrap().unwrap();
        assert_eq!(next.code, 8);
        r.push_back(next);
        assert_eq!(r.peek_code().unwrap(), Some(8));
    }

    #[test]
    fn test_caret_sequences() {
        let mut r = reader("1\nLine1^JLine2^ILine3\n");
        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair.as_str(), "Line1\nLine2\tLine3");
    }

    #[test]
    fn test_latin1_fallback() {
        // 0xE9 is 'é' in Latin-1 but invalid as a lone UTF-8 byte
        let mut r = TagReader::new(Cursor::new(vec![b'1', b'\n', 0xE9, b'\n']));
        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair.as_str(), "\u{e9}");
    }

    #[test]
    fn test_version_context() {
        let mut r = reader("");
        assert_eq!(r.version(), DxfVersion::R2018);
        r.set_version(DxfVersion::R13);
        r.set_strict_versions(true);
        assert_eq!(r.version(), DxfVersion::R13);
        assert!(r.strict_versions());
    }
}
