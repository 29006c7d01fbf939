//! Recursive conversion of untyped JSON values into validated [`TypedValue`]s.
//!
//! One conversion strategy per descriptor kind, selected by an exhaustive
//! match in [`Deserializer::convert`]. Aggregates recurse into their children
//! and, on failure, prepend their field/index/key to the error's path so the
//! innermost message survives with a breadcrumb trail. Unions and enums are
//! the only places where a child failure is swallowed: members are tried in
//! declaration order and the first success wins.
//!
//! Recursion is bounded by [`Options::max_depth`]; exceeding it yields
//! `DepthExceeded` instead of overflowing the stack on adversarial input.
use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::descriptor::{
    AliasType, EnumMember, EnumType, ListType, MapType, Primitive, RecordType, TupleType, TypeDescriptor,
    UnionType,
};
use crate::error::{describe, preview, DeErrorKind, DeserializationError, Segment};
use crate::target::RecordTarget;
use crate::value::TypedValue;

pub const DEFAULT_MAX_DEPTH: usize = 128;

// ————————————————————————————————————————————————————————————————————————————
// OPTIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Deepest descriptor nesting the engine will descend into.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Options {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

pub fn deserialize(descriptor: &TypeDescriptor, input: &Value) -> Result<TypedValue, DeserializationError> {
    Deserializer::default().deserialize(descriptor, input)
}

pub fn deserialize_with(
    descriptor: &TypeDescriptor,
    input: &Value,
    options: Options,
) -> Result<TypedValue, DeserializationError> {
    Deserializer::new(options).deserialize(descriptor, input)
}

/// Stateless between calls; share one freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Deserializer {
    options: Options,
}

type Converted = Result<TypedValue, DeserializationError>;

impl Deserializer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    #[tracing::instrument(level = "debug", skip_all, fields(descriptor = %descriptor))]
    pub fn deserialize(&self, descriptor: &TypeDescriptor, input: &Value) -> Converted {
        let result = self.convert(descriptor, input, 0);
        if let Err(error) = &result {
            tracing::debug!(%error, "deserialization failed");
        }
        result
    }

    /// Like [`Deserializer::deserialize`], but a record descriptor populates a
    /// caller-defined object field by field. Any other kind has no target
    /// converter.
    pub fn deserialize_into<T: RecordTarget>(
        &self,
        descriptor: &TypeDescriptor,
        input: &Value,
        target: &T,
    ) -> Result<T::Output, DeserializationError> {
        let TypeDescriptor::Record(record) = descriptor else {
            return Err(DeserializationError::new(
                DeErrorKind::NoConverterForKind { kind: descriptor.kind() },
                descriptor,
            ));
        };
        let mut out = target.create();
        self.convert_record_fields(descriptor, record, input, 0, |name, value| {
            target.set_field(&mut out, name, value)
        })?;
        Ok(out)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DISPATCH
// ————————————————————————————————————————————————————————————————————————————

impl Deserializer {
    fn convert(&self, descriptor: &TypeDescriptor, input: &Value, depth: usize) -> Converted {
        if depth > self.options.max_depth {
            return Err(DeserializationError::new(
                DeErrorKind::DepthExceeded { limit: self.options.max_depth },
                descriptor,
            ));
        }
        match descriptor {
            TypeDescriptor::Primitive(p) => convert_primitive(*p, input).map_err(|e| e.described_by(descriptor)),
            TypeDescriptor::None => convert_none(descriptor, input),
            TypeDescriptor::Alias(alias) => convert_alias(descriptor, alias, input),
            TypeDescriptor::Union(union) => self.convert_union(descriptor, union, input, depth),
            TypeDescriptor::Enum(enumeration) => self.convert_enum(descriptor, enumeration, input, depth),
            TypeDescriptor::Tuple(tuple) => self.convert_tuple(descriptor, tuple, input, depth),
            TypeDescriptor::Record(record) => self.convert_record(descriptor, record, input, depth),
            TypeDescriptor::List(list) => self.convert_list(descriptor, list, input, depth),
            TypeDescriptor::Map(map) => self.convert_map(descriptor, map, input, depth),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SCALARS
// ————————————————————————————————————————————————————————————————————————————

fn mismatch(expected: impl Into<String>, input: &Value) -> DeErrorKind {
    DeErrorKind::TypeMismatch { expected: expected.into(), found: describe(input) }
}

fn convert_primitive(primitive: Primitive, input: &Value) -> Converted {
    let fail = |kind| Err(DeserializationError::for_kind(kind, crate::descriptor::Kind::Primitive));
    match (primitive, input) {
        (Primitive::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(TypedValue::Integer(i)),
            None => fail(mismatch("an integer within 64-bit signed range", input)),
        },
        (Primitive::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => Ok(TypedValue::Integer(i)),
            Err(_) => fail(DeErrorKind::ParseError { input: s.clone(), target: primitive }),
        },
        (Primitive::Float, Value::Number(n)) => match n.as_f64() {
            Some(f) => Ok(TypedValue::Float(f)),
            None => fail(mismatch("a finite float", input)),
        },
        (Primitive::Float, Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(TypedValue::Float(f)),
            _ => fail(DeErrorKind::ParseError { input: s.clone(), target: primitive }),
        },
        (Primitive::String, Value::String(s)) => Ok(TypedValue::String(s.clone())),
        (Primitive::Boolean, Value::Bool(b)) => Ok(TypedValue::Bool(*b)),
        (Primitive::Integer | Primitive::Float, _) => fail(mismatch("a number or numeric string", input)),
        (Primitive::String, _) => fail(mismatch("a string", input)),
        (Primitive::Boolean, _) => fail(mismatch("a boolean", input)),
    }
}

fn convert_none(descriptor: &TypeDescriptor, input: &Value) -> Converted {
    match input {
        Value::Null => Ok(TypedValue::Null),
        _ => Err(DeserializationError::new(mismatch("null", input), descriptor)),
    }
}

fn convert_alias(descriptor: &TypeDescriptor, alias: &AliasType, input: &Value) -> Converted {
    convert_primitive(alias.inner(), input).map_err(|e| e.described_by(descriptor))
}

// ————————————————————————————————————————————————————————————————————————————
// ORDERED RESOLUTION
// ————————————————————————————————————————————————————————————————————————————

impl Deserializer {
    /// First member that converts wins. A `None` member accepts null on its
    /// own, so no separate null escape is needed.
    fn convert_union(&self, descriptor: &TypeDescriptor, union: &UnionType, input: &Value, depth: usize) -> Converted {
        for member in union.members() {
            match self.convert(member, input, depth + 1) {
                Ok(value) => return Ok(value),
                Err(error) if error.is_depth_exceeded() => return Err(error),
                Err(error) => tracing::trace!(%member, %error, "union member rejected input"),
            }
        }
        Err(DeserializationError::new(
            DeErrorKind::NoUnionMatch {
                members: union.members().iter().map(ToString::to_string).collect(),
                input: preview(input),
            },
            descriptor,
        ))
    }

    fn convert_enum(&self, descriptor: &TypeDescriptor, enumeration: &EnumType, input: &Value, depth: usize) -> Converted {
        for member in enumeration.members() {
            match member {
                EnumMember::Literal(lit) => {
                    if lit.matches_input(input) {
                        return Ok(lit.to_typed());
                    }
                }
                EnumMember::Type(ty) => match self.convert(ty, input, depth + 1) {
                    Ok(value) => return Ok(value),
                    Err(error) if error.is_depth_exceeded() => return Err(error),
                    Err(error) => tracing::trace!(member = %ty, %error, "enum member rejected input"),
                },
            }
        }
        Err(DeserializationError::new(
            DeErrorKind::NoEnumMatch {
                values: enumeration.members().iter().map(ToString::to_string).collect(),
                input: preview(input),
            },
            descriptor,
        ))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// AGGREGATES
// ————————————————————————————————————————————————————————————————————————————

impl Deserializer {
    /// Extra trailing elements are ignored; the output has exactly the tuple's arity.
    fn convert_tuple(&self, descriptor: &TypeDescriptor, tuple: &TupleType, input: &Value, depth: usize) -> Converted {
        let Value::Array(xs) = input else {
            return Err(DeserializationError::new(mismatch("a sequence", input), descriptor));
        };
        if xs.len() < tuple.arity() {
            return Err(DeserializationError::new(
                mismatch(format!("a sequence of at least {} elements", tuple.arity()), input),
                descriptor,
            ));
        }
        let mut out = Vec::with_capacity(tuple.arity());
        for (index, (slot, x)) in tuple.slots().iter().zip(xs).enumerate() {
            let value = self
                .convert(slot, x, depth + 1)
                .map_err(|e| e.within(Segment::Index(index)))?;
            out.push(value);
        }
        Ok(TypedValue::Seq(out))
    }

    fn convert_record(&self, descriptor: &TypeDescriptor, record: &RecordType, input: &Value, depth: usize) -> Converted {
        let mut out = IndexMap::with_capacity(record.fields().len());
        self.convert_record_fields(descriptor, record, input, depth, |name, value| {
            out.insert(name.to_string(), value);
        })?;
        Ok(TypedValue::Map(out))
    }

    /// Shared by the generic mapping output and caller-supplied targets.
    /// Fields are delivered in descriptor order.
    fn convert_record_fields(
        &self,
        descriptor: &TypeDescriptor,
        record: &RecordType,
        input: &Value,
        depth: usize,
        mut set: impl FnMut(&str, TypedValue),
    ) -> Result<(), DeserializationError> {
        let Value::Object(entries) = input else {
            return Err(DeserializationError::new(mismatch("a mapping", input), descriptor));
        };
        check_key_set(descriptor, record, entries)?;
        for (name, ty) in record.fields() {
            let Some(raw) = entries.get(name) else {
                continue;
            };
            let value = self
                .convert(ty, raw, depth + 1)
                .map_err(|e| e.within(Segment::Field(name.clone())))?;
            set(name, value);
        }
        Ok(())
    }

    fn convert_list(&self, descriptor: &TypeDescriptor, list: &ListType, input: &Value, depth: usize) -> Converted {
        let Value::Array(xs) = input else {
            return Err(DeserializationError::new(mismatch("a sequence", input), descriptor));
        };
        let out = xs
            .iter()
            .enumerate()
            .map(|(index, x)| {
                self.convert(list.element(), x, depth + 1)
                    .map_err(|e| e.within(Segment::Index(index)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypedValue::Seq(out))
    }

    /// Keys pass through: map descriptors are string-keyed by construction.
    fn convert_map(&self, descriptor: &TypeDescriptor, map: &MapType, input: &Value, depth: usize) -> Converted {
        let Value::Object(entries) = input else {
            return Err(DeserializationError::new(mismatch("a mapping", input), descriptor));
        };
        let mut out = IndexMap::with_capacity(entries.len());
        for (key, raw) in entries {
            let value = self
                .convert(map.value(), raw, depth + 1)
                .map_err(|e| e.within(Segment::Key(key.clone())))?;
            out.insert(key.clone(), value);
        }
        Ok(TypedValue::Map(out))
    }
}

fn check_key_set(
    descriptor: &TypeDescriptor,
    record: &RecordType,
    entries: &Map<String, Value>,
) -> Result<(), DeserializationError> {
    let got: BTreeSet<&str> = entries.keys().map(String::as_str).collect();
    let expected: BTreeSet<&str> = record.fields().keys().map(String::as_str).collect();
    if got == expected {
        return Ok(());
    }
    Err(DeserializationError::new(
        DeErrorKind::KeySetMismatch {
            got: entries.keys().cloned().collect(),
            expected: record.fields().keys().cloned().collect(),
        },
        descriptor,
    ))
}

// ————————————————————————————————————————————————————————————————————————————
// VALIDATOR
// ————————————————————————————————————————————————————————————————————————————

/// A descriptor bound to a deserializer, for yes/no probing of raw input.
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    descriptor: &'a TypeDescriptor,
    deserializer: Deserializer,
}

impl<'a> Validator<'a> {
    pub fn new(descriptor: &'a TypeDescriptor) -> Self {
        Self::with_options(descriptor, Options::default())
    }

    pub fn with_options(descriptor: &'a TypeDescriptor, options: Options) -> Self {
        Self { descriptor, deserializer: Deserializer::new(options) }
    }

    pub fn validate(&self, input: &Value) -> Result<(), DeserializationError> {
        self.deserializer.deserialize(self.descriptor, input).map(|_| ())
    }

    pub fn is_valid(&self, input: &Value) -> bool {
        self.validate(input).is_ok()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
