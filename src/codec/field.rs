//! Generic group-code field codec
//!
//! Every entity type instantiates the same decode loop: pull pairs until
//! the next code-0 sentinel, dispatch each code through a declarative
//! per-type rule table, absorb whatever the table does not know about.
//! The rule tables replace the hand-duplicated per-type read loops of
//! older DXF codebases with one shared driver.

use super::pair::CodePair;
use super::reader::TagReader;
use crate::diagnostics::{DiagnosticKind, DiagnosticSink, SourceLocation};
use crate::entities::header::EntityHeader;
use crate::error::Result;
use crate::types::DxfVersion;
use ahash::AHashMap;
use std::io::Read;

/// Version applicability predicate for one field.
///
/// `min`/`max` bound the format versions the field may be written to.
/// Reading is always tolerant; the gate only governs emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionGate {
    /// Lowest version the field is legal in, if bounded below.
    pub min: Option<DxfVersion>,
    /// Highest version the field is legal in, if bounded above.
    pub max: Option<DxfVersion>,
}

impl VersionGate {
    /// Field legal in every version.
    pub const ANY: VersionGate = VersionGate { min: None, max: None };

    /// Field introduced with R13.
    pub const SINCE_R13: VersionGate = VersionGate::since(DxfVersion::R13);

    /// Field introduced with R14.
    pub const SINCE_R14: VersionGate = VersionGate::since(DxfVersion::R14);

    /// Field introduced with R2000.
    pub const SINCE_R2000: VersionGate = VersionGate::since(DxfVersion::R2000);

    /// Field introduced with R2004.
    pub const SINCE_R2004: VersionGate = VersionGate::since(DxfVersion::R2004);

    /// Field introduced with R2007.
    pub const SINCE_R2007: VersionGate = VersionGate::since(DxfVersion::R2007);

    /// Gate open from `min` onwards.
    pub const fn since(min: DxfVersion) -> Self {
        VersionGate {
            min: Some(min),
            max: None,
        }
    }

    /// Gate open up to and including `max`.
    pub const fn until(max: DxfVersion) -> Self {
        VersionGate {
            min: None,
            max: Some(max),
        }
    }

    /// Whether the field may be written at `version`.
    pub fn admits(&self, version: DxfVersion) -> bool {
        if let Some(min) = self.min {
            if version < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if version > max {
                return false;
            }
        }
        true
    }
}

/// Context handed to field rules while decoding one record.
pub struct DecodeCtx<'a> {
    /// Sink collecting non-fatal issues.
    pub diags: &'a mut DiagnosticSink,
    /// Position of the pair being decoded.
    pub location: SourceLocation,
}

impl DecodeCtx<'_> {
    /// Report a diagnostic at the current pair's location.
    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diags.report(kind, message, self.location.clone());
    }
}

/// Applies one decoded pair to an entity slot.
///
/// Tolerable issues are reported through the context and absorbed;
/// structural failures (e.g. a bounded container overflowing) unwind.
pub type SetFn<E> = fn(&mut E, &CodePair, &mut DecodeCtx) -> Result<()>;

/// One entry of a per-type decode table: expected code, version
/// applicability, target-slot conversion.
pub struct FieldRule<E> {
    /// The group code this rule consumes.
    pub code: i32,
    /// Version applicability of the field.
    pub gate: VersionGate,
    /// Slot conversion.
    pub set: SetFn<E>,
}

impl<E> FieldRule<E> {
    /// Create a rule.
    pub fn new(code: i32, gate: VersionGate, set: SetFn<E>) -> Self {
        Self { code, gate, set }
    }
}

/// A per-entity-type decode table with a hashed code index and the
/// expected code-100 subclass marker strings.
pub struct FieldDispatch<E> {
    rules: Vec<FieldRule<E>>,
    index: AHashMap<i32, usize>,
    subclasses: &'static [&'static str],
}

impl<E> FieldDispatch<E> {
    /// Build the dispatch index over a rule table.
    pub fn new(rules: Vec<FieldRule<E>>, subclasses: &'static [&'static str]) -> Self {
        let mut index = AHashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            index.insert(rule.code, i);
        }
        Self {
            rules,
            index,
            subclasses,
        }
    }

    /// Look up the rule for a code.
    pub fn rule_for(&self, code: i32) -> Option<&FieldRule<E>> {
        self.index.get(&code).map(|&i| &self.rules[i])
    }

    /// The subclass markers this entity type expects.
    pub fn subclasses(&self) -> &'static [&'static str] {
        self.subclasses
    }
}

/// An entity record the generic codec can drive.
pub trait RecordEntity {
    /// The code-0 type name (e.g. `"BODY"`).
    const RECORD_NAME: &'static str;

    /// The lowest format version the entity type is legal in.
    const MIN_VERSION: DxfVersion;

    /// The common header shared by all entities.
    fn header(&self) -> &EntityHeader;

    /// Mutable access to the common header.
    fn header_mut(&mut self) -> &mut EntityHeader;
}

/// Decode one record into `entity`, stopping at the next code-0
/// sentinel (which is pushed back for the caller).
///
/// Dispatch order per pair: the entity's own rule table, then the
/// subclass-marker check (code 100), then echoed comments (999), then
/// the common header, and finally the unknown-code diagnostic.  Unknown
/// codes are never fatal; files from newer format revisions may carry
/// fields this codec does not understand.
pub fn decode_record<E: RecordEntity, R: Read>(
    reader: &mut TagReader<R>,
    dispatch: &FieldDispatch<E>,
    entity: &mut E,
    diags: &mut DiagnosticSink,
) -> Result<()> {
    while let Some(pair) = reader.read_pair()? {
        if pair.is_record_start() {
            reader.push_back(pair);
            break;
        }

        let location = SourceLocation {
            file: Some(reader.file_name().to_string()),
            line: reader.line_number(),
        };
        let mut ctx = DecodeCtx {
            diags: &mut *diags,
            location,
        };

        if let Some(rule) = dispatch.rule_for(pair.code) {
            (rule.set)(entity, &pair, &mut ctx)?;
            continue;
        }

        match pair.code {
            100 => {
                if !dispatch.subclasses().contains(&pair.as_str()) {
                    ctx.report(
                        DiagnosticKind::UnexpectedSubclass,
                        format!(
                            "{}: unexpected subclass marker '{}'",
                            E::RECORD_NAME,
                            pair.as_str()
                        ),
                    );
                }
            }
            999 => {
                ctx.report(DiagnosticKind::Note, format!("comment: {}", pair.as_str()));
            }
            _ => {
                if !entity.header_mut().apply_pair(&pair, &mut ctx) {
                    ctx.report(
                        DiagnosticKind::UnknownGroupCode,
                        format!("{}: skipped group code {}", E::RECORD_NAME, pair.code),
                    );
                }
            }
        }
    }

    Ok(())
}
