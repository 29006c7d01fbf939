use std::fmt;

use indexmap::IndexMap;

use super::{Kind, TypeDescriptor};
use crate::error::ConstructionError;
use crate::order::SubtypeOrder;
use crate::value::TypedValue;

/// Named fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    fields: IndexMap<String, TypeDescriptor>,
}

impl RecordType {
    pub(super) fn new<K>(fields: impl IntoIterator<Item = (K, TypeDescriptor)>) -> Result<Self, ConstructionError>
    where
        K: Into<String>,
    {
        let mut out = IndexMap::new();
        for (name, ty) in fields {
            let name = name.into();
            if out.contains_key(&name) {
                return Err(ConstructionError::InvalidTypeConstructor {
                    kind: Kind::Record,
                    reason: format!("duplicate field `{name}`"),
                });
            }
            out.insert(name, ty);
        }
        Ok(Self { fields: out })
    }

    pub fn fields(&self) -> &IndexMap<String, TypeDescriptor> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&TypeDescriptor> {
        self.fields.get(name)
    }

    pub(super) fn check(&self) -> Result<(), String> {
        for (name, ty) in &self.fields {
            ty.check()
                .map_err(|reason| format!("field `{name}` is invalid: {reason}"))?;
        }
        Ok(())
    }

    /// Key set must equal the field set exactly; each value must be a member
    /// of its field's type.
    pub fn contains(&self, value: &TypedValue) -> bool {
        let TypedValue::Map(entries) = value else {
            return false;
        };
        entries.len() == self.fields.len()
            && entries.iter().all(|(k, v)| {
                self.fields.get(k).is_some_and(|ty| ty.contains(v))
            })
    }

    /// Union of both field sets. Shared fields keep the more specific type
    /// under `order`; unordered shared fields are an error.
    ///
    /// Fields of `self` come first, followed by the fields only `other` has,
    /// so merging metadata into a record appends it. Field order never
    /// affects membership or deserialization. When both types are equivalent
    /// the one from `other` wins.
    pub fn merge(&self, other: &RecordType, order: &SubtypeOrder) -> Result<RecordType, ConstructionError> {
        let mut fields = IndexMap::with_capacity(self.fields.len() + other.fields.len());

        // merge keys from self
        for (name, mine) in &self.fields {
            let ty = match other.fields.get(name) {
                None => mine.clone(),
                Some(theirs) => {
                    let mine_below = order.is_subtype(mine, theirs);
                    let theirs_below = order.is_subtype(theirs, mine);
                    if mine_below && !theirs_below {
                        mine.clone()
                    } else if theirs_below {
                        theirs.clone()
                    } else {
                        // no ordering, so no relation between the types
                        return Err(ConstructionError::TypeMismatchInMerge {
                            field: name.clone(),
                            left: mine.to_string(),
                            right: theirs.to_string(),
                        });
                    }
                }
            };
            fields.insert(name.clone(), ty);
        }
        // add keys only in other
        for (name, theirs) in &other.fields {
            if !fields.contains_key(name) {
                fields.insert(name.clone(), theirs.clone());
            }
        }

        Ok(RecordType { fields })
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Record{")?;
        for (i, (name, ty)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {ty}")?;
        }
        f.write_str("}")
    }
}
