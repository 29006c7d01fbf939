//! Explicit subtype ordering over atomic types.
//!
//! Record merge needs to know when one field type refines another. Instead of
//! leaning on any host type hierarchy, schema authors declare the edges they
//! want (`IntegerAlias < NumberAlias`, ...) and merge consults this table.
//!
//! Atomic names: primitives use `Integer`, `Float`, `String`, `Boolean`; the
//! unit type is `None`; aliases use their alias name. An alias is implicitly
//! below the primitive it wraps, wherever it shows up in the walk.
use indexmap::{IndexMap, IndexSet};

use crate::descriptor::{Primitive, TypeDescriptor};
use crate::error::ConstructionError;

#[derive(Debug, Clone, Default)]
pub struct SubtypeOrder {
    /// name → direct supertypes
    supers: IndexMap<String, IndexSet<String>>,
    /// alias name → wrapped primitive, for every alias seen in `declare`
    wraps: IndexMap<String, Primitive>,
}

impl SubtypeOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `sub < sup`. Both sides must be atomic: a primitive, `None`,
    /// or an alias.
    pub fn declare(mut self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> Result<Self, ConstructionError> {
        let from = self.register(sub)?;
        let to = self.register(sup)?;
        self.supers.entry(from).or_default().insert(to);
        Ok(self)
    }

    fn register(&mut self, descriptor: &TypeDescriptor) -> Result<String, ConstructionError> {
        let Some(name) = atom_name(descriptor) else {
            return Err(ConstructionError::InvalidTypeConstructor {
                kind: descriptor.kind(),
                reason: format!("only atomic types can be ordered, got {descriptor}"),
            });
        };
        if let TypeDescriptor::Alias(alias) = descriptor {
            self.wraps.insert(alias.name().to_string(), alias.inner());
        }
        Ok(name.to_string())
    }

    /// Reflexive on equal descriptors, transitive over declared edges and the
    /// implicit alias edges. Composite descriptors only relate to themselves.
    pub fn is_subtype(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> bool {
        if sub == sup {
            return true;
        }
        let (Some(from), Some(to)) = (atom_name(sub), atom_name(sup)) else {
            return false;
        };
        let mut frontier: Vec<&str> = vec![from];
        if let TypeDescriptor::Alias(alias) = sub {
            frontier.push(alias.inner().name());
        }
        let mut seen: IndexSet<&str> = IndexSet::new();
        while let Some(name) = frontier.pop() {
            if name == to {
                return true;
            }
            if !seen.insert(name) {
                continue;
            }
            if let Some(inner) = self.wraps.get(name) {
                frontier.push(inner.name());
            }
            if let Some(next) = self.supers.get(name) {
                frontier.extend(next.iter().map(String::as_str));
            }
        }
        false
    }
}

fn atom_name(descriptor: &TypeDescriptor) -> Option<&str> {
    match descriptor {
        TypeDescriptor::Primitive(p) => Some(p.name()),
        TypeDescriptor::None => Some("None"),
        TypeDescriptor::Alias(alias) => Some(alias.name()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(name: &str, inner: Primitive) -> TypeDescriptor {
        TypeDescriptor::alias(name, inner).unwrap()
    }

    #[test]
    fn declared_edges_are_transitive() {
        let cents = alias("Cents", Primitive::Integer);
        let amount = alias("Amount", Primitive::Integer);
        let number = alias("Number", Primitive::Float);
        let order = SubtypeOrder::new()
            .declare(&cents, &amount)
            .unwrap()
            .declare(&amount, &number)
            .unwrap();
        assert!(order.is_subtype(&cents, &number));
        assert!(!order.is_subtype(&number, &cents));
    }

    #[test]
    fn alias_edges_hold_for_aliases_reached_through_declarations() {
        let integer_alias = alias("IntegerAlias", Primitive::Integer);
        let number_alias = alias("NumberAlias", Primitive::Float);
        let order = SubtypeOrder::new().declare(&integer_alias, &number_alias).unwrap();

        assert!(order.is_subtype(&integer_alias, &TypeDescriptor::integer()));
        assert!(order.is_subtype(&integer_alias, &TypeDescriptor::float()));
        assert!(order.is_subtype(&number_alias, &TypeDescriptor::float()));
        assert!(!order.is_subtype(&TypeDescriptor::float(), &integer_alias));
        assert!(!order.is_subtype(&integer_alias, &TypeDescriptor::string()));
    }

    #[test]
    fn primitives_are_unrelated_by_default() {
        let order = SubtypeOrder::new();
        assert!(!order.is_subtype(&TypeDescriptor::integer(), &TypeDescriptor::float()));
        assert!(order.is_subtype(&TypeDescriptor::integer(), &TypeDescriptor::integer()));

        let widened = SubtypeOrder::new()
            .declare(&TypeDescriptor::integer(), &TypeDescriptor::float())
            .unwrap();
        assert!(widened.is_subtype(&TypeDescriptor::integer(), &TypeDescriptor::float()));
    }

    #[test]
    fn cycles_terminate() {
        let a = alias("A", Primitive::String);
        let b = alias("B", Primitive::String);
        let c = alias("C", Primitive::String);
        let order = SubtypeOrder::new().declare(&a, &b).unwrap().declare(&b, &a).unwrap();
        assert!(order.is_subtype(&a, &b));
        assert!(order.is_subtype(&b, &a));
        assert!(!order.is_subtype(&a, &c));
    }

    #[test]
    fn composites_relate_only_to_themselves() {
        let list = TypeDescriptor::list(TypeDescriptor::integer()).unwrap();
        let order = SubtypeOrder::new();
        assert!(order.is_subtype(&list, &list.clone()));
        assert!(!order.is_subtype(&list, &TypeDescriptor::integer()));

        let declared = SubtypeOrder::new().declare(&list, &TypeDescriptor::integer());
        assert!(matches!(
            declared,
            Err(ConstructionError::InvalidTypeConstructor { .. })
        ));
    }
}
