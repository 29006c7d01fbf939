use std::fmt;

use ordered_float::OrderedFloat;
use serde_json::Value;

use crate::value::TypedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Integer,
    Float,
    String,
    Boolean,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
        }
    }

    /// Native type identity: no coercion happens here.
    pub fn contains(self, value: &TypedValue) -> bool {
        matches!(
            (self, value),
            (Self::Integer, TypedValue::Integer(_))
                | (Self::Float, TypedValue::Float(_))
                | (Self::String, TypedValue::String(_))
                | (Self::Boolean, TypedValue::Bool(_))
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete scalar an enum can list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Literal {
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(String),
    Boolean(bool),
}

impl Literal {
    pub fn primitive(&self) -> Primitive {
        match self {
            Self::Integer(_) => Primitive::Integer,
            Self::Float(_) => Primitive::Float,
            Self::String(_) => Primitive::String,
            Self::Boolean(_) => Primitive::Boolean,
        }
    }

    pub fn to_typed(&self) -> TypedValue {
        match self {
            Self::Integer(i) => TypedValue::Integer(*i),
            Self::Float(f) => TypedValue::Float(f.0),
            Self::String(s) => TypedValue::String(s.clone()),
            Self::Boolean(b) => TypedValue::Bool(*b),
        }
    }

    /// Direct equality against untyped input. Float literals compare
    /// numerically against any JSON number; integer literals only match
    /// JSON integers.
    pub fn matches_input(&self, input: &Value) -> bool {
        match (self, input) {
            (Self::Integer(i), Value::Number(n)) => n.as_i64() == Some(*i),
            (Self::Float(f), Value::Number(n)) => n.as_f64().map(OrderedFloat) == Some(*f),
            (Self::String(s), Value::String(t)) => s == t,
            (Self::Boolean(b), Value::Bool(c)) => b == c,
            _ => false,
        }
    }

    pub fn matches_typed(&self, value: &TypedValue) -> bool {
        match (self, value) {
            (Self::Integer(i), TypedValue::Integer(j)) => i == j,
            (Self::Float(f), TypedValue::Float(g)) => *f == OrderedFloat(*g),
            (Self::String(s), TypedValue::String(t)) => s == t,
            (Self::Boolean(b), TypedValue::Bool(c)) => b == c,
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{:?}", x.0),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Literal {
    fn from(x: f64) -> Self {
        Self::Float(OrderedFloat(x))
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn float_literals_match_integral_json_numbers() {
        let lit = Literal::from(3.0);
        assert!(lit.matches_input(&json!(3)));
        assert!(lit.matches_input(&json!(3.0)));
        assert!(!lit.matches_input(&json!("3")));
    }

    #[test]
    fn integer_literals_reject_floats() {
        let lit = Literal::from(3_i64);
        assert!(lit.matches_input(&json!(3)));
        assert!(!lit.matches_input(&json!(3.0)));
        assert!(!lit.matches_typed(&TypedValue::Float(3.0)));
    }

    #[test]
    fn literals_render_like_json() {
        assert_eq!(Literal::from("paid").to_string(), r#""paid""#);
        assert_eq!(Literal::from(2.0).to_string(), "2.0");
        assert_eq!(Literal::from(false).to_string(), "false");
    }
}
