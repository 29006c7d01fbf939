//! Type descriptors: immutable, self-validating descriptions of accepted shapes.
//!
//! Every constructor checks the descriptor it just built before handing it
//! out, and variant payloads keep their fields private, so any
//! `TypeDescriptor` in hand satisfies [`TypeDescriptor::valid`]. Nested
//! descriptors are owned by value; there is no registry and no way to build a
//! cycle.
//!
//! Composition:
//! - `a | b` (or [`TypeDescriptor::union_with`]) makes a two-member union,
//!   never flattened.
//! - [`TypeDescriptor::merge`] combines two records, keeping the more specific
//!   type for shared fields according to a [`SubtypeOrder`].
pub mod atomic;
pub mod enumeration;
pub mod record;

use std::fmt;
use std::ops::BitOr;

use crate::error::ConstructionError;
use crate::order::SubtypeOrder;
use crate::value::TypedValue;

pub use atomic::{Literal, Primitive};
pub use enumeration::{EnumMember, EnumType};
pub use record::RecordType;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Variant tag of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Primitive,
    None,
    Alias,
    Union,
    Enum,
    Tuple,
    Record,
    List,
    Map,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    /// Matches only null.
    None,
    Alias(AliasType),
    Union(UnionType),
    Enum(EnumType),
    Tuple(TupleType),
    Record(RecordType),
    List(ListType),
    Map(MapType),
}

/// A named re-tagging of a primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasType {
    name: String,
    inner: Primitive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    members: Vec<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleType {
    slots: Vec<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListType {
    element: Box<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapType {
    key: Box<TypeDescriptor>,
    value: Box<TypeDescriptor>,
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTION
// ————————————————————————————————————————————————————————————————————————————

impl TypeDescriptor {
    pub fn integer() -> Self {
        Self::Primitive(Primitive::Integer)
    }
    pub fn float() -> Self {
        Self::Primitive(Primitive::Float)
    }
    pub fn string() -> Self {
        Self::Primitive(Primitive::String)
    }
    pub fn boolean() -> Self {
        Self::Primitive(Primitive::Boolean)
    }
    pub fn none() -> Self {
        Self::None
    }

    pub fn alias(name: impl Into<String>, inner: Primitive) -> Result<Self, ConstructionError> {
        Self::Alias(AliasType { name: name.into(), inner }).checked()
    }

    /// Members are tried in the given order during deserialization. An empty
    /// union is valid and rejects every input.
    pub fn union(members: impl IntoIterator<Item = TypeDescriptor>) -> Result<Self, ConstructionError> {
        Self::Union(UnionType { members: members.into_iter().collect() }).checked()
    }

    pub fn enumeration<M>(members: impl IntoIterator<Item = M>) -> Result<Self, ConstructionError>
    where
        M: Into<EnumMember>,
    {
        Self::Enum(EnumType::new(members.into_iter().map(Into::into).collect())).checked()
    }

    pub fn tuple(slots: impl IntoIterator<Item = TypeDescriptor>) -> Result<Self, ConstructionError> {
        Self::Tuple(TupleType { slots: slots.into_iter().collect() }).checked()
    }

    pub fn record<K>(fields: impl IntoIterator<Item = (K, TypeDescriptor)>) -> Result<Self, ConstructionError>
    where
        K: Into<String>,
    {
        Self::Record(RecordType::new(fields)?).checked()
    }

    pub fn list(element: TypeDescriptor) -> Result<Self, ConstructionError> {
        Self::List(ListType { element: Box::new(element) }).checked()
    }

    /// Input mapping keys are strings and pass through unconverted; `contains`
    /// still checks each key against `key`.
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Result<Self, ConstructionError> {
        Self::Map(MapType { key: Box::new(key), value: Box::new(value) }).checked()
    }

    fn checked(self) -> Result<Self, ConstructionError> {
        match self.check() {
            Ok(()) => Ok(self),
            Err(reason) => Err(ConstructionError::InvalidTypeConstructor { kind: self.kind(), reason }),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INSPECTION
// ————————————————————————————————————————————————————————————————————————————

impl TypeDescriptor {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Primitive(_) => Kind::Primitive,
            Self::None => Kind::None,
            Self::Alias(_) => Kind::Alias,
            Self::Union(_) => Kind::Union,
            Self::Enum(_) => Kind::Enum,
            Self::Tuple(_) => Kind::Tuple,
            Self::Record(_) => Kind::Record,
            Self::List(_) => Kind::List,
            Self::Map(_) => Kind::Map,
        }
    }

    pub fn valid(&self) -> bool {
        self.check().is_ok()
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        match self {
            Self::Primitive(_) | Self::None => Ok(()),
            Self::Alias(alias) => {
                if alias.name.trim().is_empty() {
                    return Err("alias name must not be blank".to_string());
                }
                Ok(())
            }
            Self::Union(union) => check_children("member", &union.members),
            Self::Enum(enumeration) => enumeration.check(),
            Self::Tuple(tuple) => check_children("slot", &tuple.slots),
            Self::Record(record) => record.check(),
            Self::List(list) => list
                .element
                .check()
                .map_err(|reason| format!("element type is invalid: {reason}")),
            Self::Map(map) => {
                map.key
                    .check()
                    .map_err(|reason| format!("key type is invalid: {reason}"))?;
                map.value
                    .check()
                    .map_err(|reason| format!("value type is invalid: {reason}"))
            }
        }
    }

    /// Structural membership of an already-typed value. Never coerces.
    pub fn contains(&self, value: &TypedValue) -> bool {
        match self {
            Self::Primitive(p) => p.contains(value),
            Self::None => matches!(value, TypedValue::Null),
            Self::Alias(alias) => alias.inner.contains(value),
            Self::Union(union) => union.members.iter().any(|m| m.contains(value)),
            Self::Enum(enumeration) => enumeration.contains(value),
            Self::Tuple(tuple) => match value {
                TypedValue::Seq(xs) => {
                    xs.len() == tuple.slots.len()
                        && tuple.slots.iter().zip(xs).all(|(t, x)| t.contains(x))
                }
                _ => false,
            },
            Self::Record(record) => record.contains(value),
            Self::List(list) => match value {
                TypedValue::Seq(xs) => xs.iter().all(|x| list.element.contains(x)),
                _ => false,
            },
            Self::Map(map) => match value {
                TypedValue::Map(entries) => entries.iter().all(|(k, v)| {
                    map.key.contains(&TypedValue::String(k.clone())) && map.value.contains(v)
                }),
                _ => false,
            },
        }
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

fn check_children(role: &str, children: &[TypeDescriptor]) -> Result<(), String> {
    for (index, child) in children.iter().enumerate() {
        child
            .check()
            .map_err(|reason| format!("{role} {index} is invalid: {reason}"))?;
    }
    Ok(())
}

impl AliasType {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn inner(&self) -> Primitive {
        self.inner
    }
}

impl UnionType {
    pub fn members(&self) -> &[TypeDescriptor] {
        &self.members
    }
}

impl TupleType {
    pub fn slots(&self) -> &[TypeDescriptor] {
        &self.slots
    }
    pub fn arity(&self) -> usize {
        self.slots.len()
    }
}

impl ListType {
    pub fn element(&self) -> &TypeDescriptor {
        &self.element
    }
}

impl MapType {
    pub fn key(&self) -> &TypeDescriptor {
        &self.key
    }
    pub fn value(&self) -> &TypeDescriptor {
        &self.value
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPOSITION
// ————————————————————————————————————————————————————————————————————————————

impl TypeDescriptor {
    /// `Union[self, other]`. Nested unions are kept as-is.
    pub fn union_with(&self, other: &TypeDescriptor) -> TypeDescriptor {
        Self::Union(UnionType { members: vec![self.clone(), other.clone()] })
    }

    /// Merge two record descriptors; see [`RecordType::merge`].
    pub fn merge(&self, other: &TypeDescriptor, order: &SubtypeOrder) -> Result<TypeDescriptor, ConstructionError> {
        match (self, other) {
            (Self::Record(a), Self::Record(b)) => Ok(Self::Record(a.merge(b, order)?)),
            (Self::Record(_), operand) | (operand, _) => Err(ConstructionError::InvalidTypeConstructor {
                kind: operand.kind(),
                reason: format!("only records can be merged, got {operand}"),
            }),
        }
    }
}

impl BitOr for TypeDescriptor {
    type Output = TypeDescriptor;

    fn bitor(self, other: TypeDescriptor) -> TypeDescriptor {
        Self::Union(UnionType { members: vec![self, other] })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RENDERING
// ————————————————————————————————————————————————————————————————————————————

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primitive => "Primitive",
            Self::None => "None",
            Self::Alias => "Alias",
            Self::Union => "Union",
            Self::Enum => "Enum",
            Self::Tuple => "Tuple",
            Self::Record => "Record",
            Self::List => "List",
            Self::Map => "Map",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::None => f.write_str("None"),
            Self::Alias(alias) => write!(f, "{}<{}>", alias.name, alias.inner),
            Self::Union(union) => write_list(f, "Union[", &union.members, "]"),
            Self::Enum(enumeration) => write!(f, "{enumeration}"),
            Self::Tuple(tuple) => write_list(f, "Tuple[", &tuple.slots, "]"),
            Self::Record(record) => write!(f, "{record}"),
            Self::List(list) => write!(f, "List[{}]", list.element),
            Self::Map(map) => write!(f, "Map[{}, {}]", map.key, map.value),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, open: &str, items: &[T], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn currency() -> TypeDescriptor {
        TypeDescriptor::alias("Currency", Primitive::String).unwrap()
    }

    #[test]
    fn every_constructed_descriptor_is_valid() {
        let descriptors = [
            TypeDescriptor::integer(),
            TypeDescriptor::none(),
            currency(),
            TypeDescriptor::union([TypeDescriptor::integer(), TypeDescriptor::none()]).unwrap(),
            TypeDescriptor::enumeration(["submitted", "pending"]).unwrap(),
            TypeDescriptor::tuple([TypeDescriptor::integer(), currency()]).unwrap(),
            TypeDescriptor::tuple([]).unwrap(),
            TypeDescriptor::record([("a", TypeDescriptor::integer())]).unwrap(),
            TypeDescriptor::list(TypeDescriptor::float()).unwrap(),
            TypeDescriptor::map(currency(), TypeDescriptor::string()).unwrap(),
            TypeDescriptor::map(TypeDescriptor::integer(), TypeDescriptor::string()).unwrap(),
            TypeDescriptor::union([]).unwrap(),
        ];
        for d in &descriptors {
            assert!(d.valid(), "{d} should be valid");
        }
    }

    #[test]
    fn invalid_shapes_fail_construction() {
        let mixed = TypeDescriptor::enumeration([EnumMember::from(1_i64), EnumMember::from("one")]);
        assert!(matches!(
            mixed,
            Err(ConstructionError::InvalidTypeConstructor { kind: Kind::Enum, .. })
        ));

        assert!(TypeDescriptor::enumeration(Vec::<EnumMember>::new()).is_err());
        assert!(TypeDescriptor::alias("  ", Primitive::Integer).is_err());

        let bad_key = TypeDescriptor::Map(MapType {
            key: Box::new(TypeDescriptor::Alias(AliasType { name: " ".into(), inner: Primitive::Integer })),
            value: Box::new(TypeDescriptor::string()),
        });
        assert!(!bad_key.valid());

        let duplicate = TypeDescriptor::record([
            ("a", TypeDescriptor::integer()),
            ("a", TypeDescriptor::string()),
        ]);
        assert!(matches!(
            duplicate,
            Err(ConstructionError::InvalidTypeConstructor { kind: Kind::Record, .. })
        ));
    }

    #[test]
    fn union_with_does_not_flatten() {
        let inner = TypeDescriptor::integer() | TypeDescriptor::float();
        let outer = inner.union_with(&TypeDescriptor::string());
        match &outer {
            TypeDescriptor::Union(u) => {
                assert_eq!(u.members().len(), 2);
                assert_eq!(u.members()[0], inner);
            }
            other => panic!("expected a union, got {other}"),
        }
        assert_eq!(outer.to_string(), "Union[Union[Integer, Float], String]");
        assert!(outer.valid());
    }

    #[test]
    fn contains_checks_native_shapes() {
        let amount = TypeDescriptor::tuple([TypeDescriptor::integer(), currency()]).unwrap();
        assert!(amount.contains(&TypedValue::Seq(vec![
            TypedValue::Integer(100),
            TypedValue::String("USD".into()),
        ])));
        assert!(!amount.contains(&TypedValue::Seq(vec![
            TypedValue::String("100".into()),
            TypedValue::String("USD".into()),
        ])));
        assert!(!amount.contains(&TypedValue::Seq(vec![TypedValue::Integer(100)])));

        let floats = TypeDescriptor::list(TypeDescriptor::float()).unwrap();
        assert!(floats.contains(&TypedValue::Seq(vec![])));
        assert!(!floats.contains(&TypedValue::Seq(vec![TypedValue::Integer(1)])));

        let labels = TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::string()).unwrap();
        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), TypedValue::String("ok".into()));
        assert!(labels.contains(&TypedValue::Map(entries)));

        let counts = TypeDescriptor::map(TypeDescriptor::integer(), TypeDescriptor::integer()).unwrap();
        let mut entries = IndexMap::new();
        entries.insert("1".to_string(), TypedValue::Integer(3));
        assert!(!counts.contains(&TypedValue::Map(entries)));

        assert!(!TypeDescriptor::union([]).unwrap().contains(&TypedValue::Null));
        assert!(TypeDescriptor::none().contains(&TypedValue::Null));
        assert!(!TypeDescriptor::string().contains(&TypedValue::Null));
    }

    #[test]
    fn record_contains_requires_exact_key_set() {
        let error = TypeDescriptor::record([
            ("code", TypeDescriptor::integer()),
            ("message", TypeDescriptor::string()),
        ])
        .unwrap();
        let mut value = IndexMap::new();
        value.insert("message".to_string(), TypedValue::String("no".into()));
        value.insert("code".to_string(), TypedValue::Integer(1));
        assert!(error.contains(&TypedValue::Map(value.clone())));

        value.insert("extra".to_string(), TypedValue::Null);
        assert!(!error.contains(&TypedValue::Map(value.clone())));

        value.shift_remove("extra");
        value.shift_remove("code");
        assert!(!error.contains(&TypedValue::Map(value)));
    }

    #[test]
    fn merge_rejects_non_records() {
        let record = TypeDescriptor::record([("a", TypeDescriptor::integer())]).unwrap();
        let result = record.merge(&TypeDescriptor::integer(), &SubtypeOrder::new());
        assert!(matches!(
            result,
            Err(ConstructionError::InvalidTypeConstructor { kind: Kind::Primitive, .. })
        ));
    }

    #[test]
    fn descriptors_render_compactly() {
        let d = TypeDescriptor::record([
            ("amount", TypeDescriptor::tuple([TypeDescriptor::integer(), currency()]).unwrap()),
            ("tags", TypeDescriptor::list(TypeDescriptor::string()).unwrap()),
            ("data", TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::none()).unwrap()),
        ])
        .unwrap();
        assert_eq!(
            d.to_string(),
            "Record{amount: Tuple[Integer, Currency<String>], tags: List[String], data: Map[String, None]}"
        );
    }

    #[test]
    fn descriptors_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeDescriptor>();
    }
}
