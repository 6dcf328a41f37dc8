//! Default-value recovery and version guarding
//!
//! DXF consumers must tolerate malformed input from third-party writers.
//! After a full record is decoded this policy replaces empty required
//! strings with their documented defaults and reports what it changed.
//! Before a record is written it guards the target version against the
//! entity type's minimum supported version.

use super::writer::TagWriter;
use crate::config::CodecDefaults;
use crate::diagnostics::{DiagnosticKind, DiagnosticSink, SourceLocation};
use crate::entities::header::EntityHeader;
use crate::error::{DxfError, Result};
use crate::types::DxfVersion;
use std::io::Write;

/// Post-read normalization of the common header.
///
/// Empty layer and linetype strings are replaced by the documented
/// defaults; each replacement is reported.  This never fails and never
/// aborts decoding.
pub fn normalize_after_read(
    header: &mut EntityHeader,
    defaults: &CodecDefaults,
    diags: &mut DiagnosticSink,
    location: SourceLocation,
) {
    if header.layer.is_empty() {
        header.layer = defaults.layer.clone();
        diags.report(
            DiagnosticKind::DefaultedField,
            format!("empty layer name replaced by \"{}\"", defaults.layer),
            location.clone(),
        );
    }
    if header.linetype.is_empty() {
        header.linetype = defaults.linetype.clone();
        diags.report(
            DiagnosticKind::DefaultedField,
            format!("empty linetype name replaced by \"{}\"", defaults.linetype),
            location.clone(),
        );
    }
    if header.linetype_scale <= 0.0 {
        let old = header.linetype_scale;
        header.linetype_scale = defaults.linetype_scale;
        diags.report(
            DiagnosticKind::IllegalValueReset,
            format!(
                "non-positive linetype scale {} reset to {}",
                old, defaults.linetype_scale
            ),
            location,
        );
    }
}

/// Guard writing `entity_name` to the writer's target version.
///
/// Below the entity's minimum version this fails when strict version
/// rules are enabled, and otherwise proceeds with a downgrade warning.
pub fn check_write_version<W: Write>(
    entity_name: &'static str,
    min_version: DxfVersion,
    writer: &TagWriter<W>,
    diags: &mut DiagnosticSink,
) -> Result<()> {
    let target = writer.version();
    if target >= min_version {
        return Ok(());
    }
    if writer.strict_versions() {
        return Err(DxfError::VersionIncompatibility {
            entity: entity_name,
            min: min_version,
            target,
        });
    }
    diags.report(
        DiagnosticKind::VersionDowngrade,
        format!(
            "writing {} to {} although it requires {}",
            entity_name, target, min_version
        ),
        SourceLocation::default(),
    );
    Ok(())
}

/// Compare a separately-encoded count field against the populated node
/// count; a mismatch is a warning, never an error.
pub fn check_count(
    entity_name: &'static str,
    field: &'static str,
    declared: i64,
    actual: usize,
    diags: &mut DiagnosticSink,
    location: SourceLocation,
) {
    if declared >= 0 && declared as usize != actual {
        diags.report(
            DiagnosticKind::CountMismatch,
            format!(
                "{}: {} declares {} but {} were decoded",
                entity_name, field, declared, actual
            ),
            location,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_strings_are_defaulted() {
        let mut header = EntityHeader::new();
        header.layer.clear();
        header.linetype.clear();
        let defaults = CodecDefaults::standard();
        let mut diags = DiagnosticSink::new();

        normalize_after_read(&mut header, &defaults, &mut diags, SourceLocation::at_line(4));

        assert_eq!(header.layer, "0");
        assert_eq!(header.linetype, "BYLAYER");
        assert_eq!(diags.of_kind(DiagnosticKind::DefaultedField).len(), 2);
    }

    #[test]
    fn test_nonempty_strings_untouched() {
        let mut header = EntityHeader::new();
        header.layer = "WALLS".to_string();
        let defaults = CodecDefaults::standard();
        let mut diags = DiagnosticSink::new();

        normalize_after_read(&mut header, &defaults, &mut diags, SourceLocation::at_line(1));

        assert_eq!(header.layer, "WALLS");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_illegal_scale_reset() {
        let mut header = EntityHeader::new();
        header.linetype_scale = -2.0;
        let defaults = CodecDefaults::standard();
        let mut diags = DiagnosticSink::new();

        normalize_after_read(&mut header, &defaults, &mut diags, SourceLocation::at_line(1));

        assert_eq!(header.linetype_scale, 1.0);
        assert!(diags.has_kind(DiagnosticKind::IllegalValueReset));
    }

    #[test]
    fn test_strict_version_check_fails() {
        let mut buf = Vec::new();
        let mut w = TagWriter::new(&mut buf, DxfVersion::R12);
        w.set_strict_versions(true);
        let mut diags = DiagnosticSink::new();

        let err = check_write_version("BODY", DxfVersion::R13, &w, &mut diags).unwrap_err();
        assert!(matches!(err, DxfError::VersionIncompatibility { .. }));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_lenient_version_check_warns() {
        let mut buf = Vec::new();
        let w = TagWriter::new(&mut buf, DxfVersion::R12);
        let mut diags = DiagnosticSink::new();

        check_write_version("BODY", DxfVersion::R13, &w, &mut diags).unwrap();
        assert!(diags.has_kind(DiagnosticKind::VersionDowngrade));
    }

    #[test]
    fn test_count_mismatch_warns() {
        let mut diags = DiagnosticSink::new();
        check_count("MLINE", "code 72", 4, 3, &mut diags, SourceLocation::at_line(9));
        assert!(diags.has_kind(DiagnosticKind::CountMismatch));

        let mut ok = DiagnosticSink::new();
        check_count("MLINE", "code 72", 3, 3, &mut ok, SourceLocation::at_line(9));
        assert!(ok.is_empty());
    }
}
