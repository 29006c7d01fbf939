//! Error types for descriptor construction and value conversion.
//!
//! Two families: [`ConstructionError`] when a schema definition is malformed,
//! and [`DeserializationError`] when a value does not fit a descriptor. The
//! latter carries a [`Path`] breadcrumb that grows as the failure bubbles out
//! through nested records, tuples, lists and maps.
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::descriptor::{Kind, Primitive, TypeDescriptor};

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTION
// ————————————————————————————————————————————————————————————————————————————

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The freshly built descriptor failed its own validity check.
    #[error("invalid type constructor for {kind}: {reason}")]
    InvalidTypeConstructor { kind: Kind, reason: String },

    /// Two records share a field whose types are not ordered.
    #[error("type mismatch in record merge: field `{field}` has unrelated types {left} and {right}")]
    TypeMismatchInMerge {
        field: String,
        left: String,
        right: String,
    },
}

// ————————————————————————————————————————————————————————————————————————————
// BREADCRUMBS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Record field.
    Field(String),
    /// Tuple slot or list element.
    Index(usize),
    /// Map entry.
    Key(String),
}

/// Location of a failure, outermost segment first. Renders as `$.data["b"][0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
    fn prepend(&mut self, segment: Segment) {
        self.0.insert(0, segment);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DESERIALIZATION
// ————————————————————————————————————————————————————————————————————————————

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeErrorKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("can't parse '{input}' as {target}")]
    ParseError { input: String, target: Primitive },

    #[error("none of [{}] matched value {input}", .members.join(", "))]
    NoUnionMatch { members: Vec<String>, input: String },

    #[error("none of [{}] matched value {input}", .values.join(", "))]
    NoEnumMatch { values: Vec<String>, input: String },

    #[error("invalid record keys: got [{}], expected [{}]", .got.join(", "), .expected.join(", "))]
    KeySetMismatch {
        got: Vec<String>,
        expected: Vec<String>,
    },

    #[error("no converter known for {kind}")]
    NoConverterForKind { kind: Kind },

    #[error("maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },
}

/// A value did not fit a descriptor.
///
/// `descriptor` is the rendering of the innermost descriptor that rejected the
/// input; `path` locates that input relative to the top-level value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("could not deserialize to {descriptor} at {path}: {kind}")]
pub struct DeserializationError {
    kind: DeErrorKind,
    descriptor: String,
    path: Path,
}

impl DeserializationError {
    pub(crate) fn new(kind: DeErrorKind, descriptor: &TypeDescriptor) -> Self {
        Self {
            kind,
            descriptor: descriptor.to_string(),
            path: Path::root(),
        }
    }
    pub(crate) fn for_kind(kind: DeErrorKind, tag: Kind) -> Self {
        Self {
            kind,
            descriptor: tag.to_string(),
            path: Path::root(),
        }
    }
    /// Re-attribute a failure raised directly at this level (not by a child).
    pub(crate) fn described_by(mut self, descriptor: &TypeDescriptor) -> Self {
        if self.path.is_root() {
            self.descriptor = descriptor.to_string();
        }
        self
    }
    pub(crate) fn within(mut self, segment: Segment) -> Self {
        self.path.prepend(segment);
        self
    }

    pub fn kind(&self) -> &DeErrorKind {
        &self.kind
    }
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn is_depth_exceeded(&self) -> bool {
        matches!(self.kind, DeErrorKind::DepthExceeded { .. })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CRATE-LEVEL
// ————————————————————————————————————————————————————————————————————————————

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// The validated value could not be turned into the requested Rust type.
    #[error("at JSON path {path} → {message}")]
    Target { path: String, message: String },
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

const PREVIEW_MAX_CHARS: usize = 64;

/// Compact rendering of an input value for error messages.
pub(crate) fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_MAX_CHARS {
        return text;
    }
    let mut short: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
    short.push('…');
    short
}

/// Human name of what an input value is, for `TypeMismatch.found`.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) if n.is_f64() => format!("float {n}"),
        Value::Number(n) => format!("integer {n}"),
        Value::String(_) => format!("string {}", preview(value)),
        Value::Array(xs) => format!("sequence of {} elements", xs.len()),
        Value::Object(map) => format!("mapping with {} keys", map.len()),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_renders_breadcrumbs_outermost_first() {
        let error = DeserializationError::new(
            DeErrorKind::ParseError { input: "x".into(), target: Primitive::Integer },
            &TypeDescriptor::integer(),
        )
        .within(Segment::Index(0))
        .within(Segment::Key("b".into()))
        .within(Segment::Field("data".into()));
        assert_eq!(error.path().to_string(), r#"$.data["b"][0]"#);
        assert_eq!(
            error.to_string(),
            r#"could not deserialize to Integer at $.data["b"][0]: can't parse 'x' as Integer"#
        );
    }

    #[test]
    fn described_by_only_reframes_local_failures() {
        let alias = TypeDescriptor::alias("Currency", Primitive::String).unwrap();
        let local = DeserializationError::for_kind(
            DeErrorKind::TypeMismatch { expected: "String".into(), found: "null".into() },
            Kind::Primitive,
        );
        assert_eq!(local.described_by(&alias).descriptor(), alias.to_string());

        let nested = DeserializationError::for_kind(
            DeErrorKind::TypeMismatch { expected: "String".into(), found: "null".into() },
            Kind::Primitive,
        )
        .within(Segment::Index(1));
        assert_eq!(nested.described_by(&alias).descriptor(), "Primitive");
    }

    #[test]
    fn previews_are_truncated() {
        let long = json!("x".repeat(200));
        let shown = preview(&long);
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().count(), PREVIEW_MAX_CHARS + 1);
        assert_eq!(describe(&json!(3.5)), "float 3.5");
        assert_eq!(describe(&json!([1, 2])), "sequence of 2 elements");
    }

    #[test]
    fn key_set_mismatch_lists_both_sets() {
        let kind = DeErrorKind::KeySetMismatch {
            got: vec!["bad".into()],
            expected: vec!["code".into(), "message".into()],
        };
        assert_eq!(kind.to_string(), "invalid record keys: got [bad], expected [code, message]");
    }
}
