use std::fmt;

use super::{Kind, Literal, Primitive, TypeDescriptor};
use crate::value::TypedValue;

/// One listed value of an enum: a literal, or a nested descriptor whose
/// deserialized result stands in for the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumMember {
    Literal(Literal),
    Type(TypeDescriptor),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    members: Vec<EnumMember>,
}

/// What "the same concrete type" means for enum members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Literal(Primitive),
    Type(Kind),
}

impl EnumMember {
    fn member_kind(&self) -> MemberKind {
        match self {
            Self::Literal(lit) => MemberKind::Literal(lit.primitive()),
            Self::Type(ty) => MemberKind::Type(ty.kind()),
        }
    }
}

impl EnumType {
    pub(super) fn new(members: Vec<EnumMember>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    pub(super) fn check(&self) -> Result<(), String> {
        let Some(first) = self.members.first() else {
            return Err("an enum needs at least one value".to_string());
        };
        let expected = first.member_kind();
        for (index, member) in self.members.iter().enumerate() {
            if member.member_kind() != expected {
                return Err(format!(
                    "enum values must share one type: value {index} ({member}) differs from {first}"
                ));
            }
            if let EnumMember::Type(ty) = member {
                ty.check()
                    .map_err(|reason| format!("value {index} is an invalid type: {reason}"))?;
            }
        }
        Ok(())
    }

    pub fn contains(&self, value: &TypedValue) -> bool {
        self.members.iter().any(|member| match member {
            EnumMember::Literal(lit) => lit.matches_typed(value),
            EnumMember::Type(ty) => ty.contains(value),
        })
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Type(ty) => write!(f, "{ty}"),
        }
    }
}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::write_list(f, "Enum[", &self.members, "]")
    }
}

impl From<Literal> for EnumMember {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl From<TypeDescriptor> for EnumMember {
    fn from(ty: TypeDescriptor) -> Self {
        Self::Type(ty)
    }
}

impl From<i64> for EnumMember {
    fn from(i: i64) -> Self {
        Self::Literal(i.into())
    }
}

impl From<f64> for EnumMember {
    fn from(x: f64) -> Self {
        Self::Literal(x.into())
    }
}

impl From<&str> for EnumMember {
    fn from(s: &str) -> Self {
        Self::Literal(s.into())
    }
}

impl From<String> for EnumMember {
    fn from(s: String) -> Self {
        Self::Literal(s.into())
    }
}

impl From<bool> for EnumMember {
    fn from(b: bool) -> Self {
        Self::Literal(b.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_enums_are_valid_and_render() {
        let status = TypeDescriptor::enumeration(["submitted", "pending", "paid", "rejected"]).unwrap();
        assert_eq!(status.to_string(), r#"Enum["submitted", "pending", "paid", "rejected"]"#);
        assert!(status.contains(&TypedValue::String("paid".into())));
        assert!(!status.contains(&TypedValue::String("lost".into())));
    }

    #[test]
    fn integer_and_float_literals_do_not_mix() {
        let mixed = TypeDescriptor::enumeration([EnumMember::from(1_i64), EnumMember::from(1.5)]);
        assert!(mixed.is_err());
    }

    #[test]
    fn descriptor_members_must_share_a_variant() {
        let records = TypeDescriptor::enumeration([
            TypeDescriptor::record([("a", TypeDescriptor::integer())]).unwrap(),
            TypeDescriptor::record([("b", TypeDescriptor::string())]).unwrap(),
        ]);
        assert!(records.is_ok());

        let mixed = TypeDescriptor::enumeration([
            TypeDescriptor::record([("a", TypeDescriptor::integer())]).unwrap(),
            TypeDescriptor::integer(),
        ]);
        assert!(mixed.is_err());
    }
}
