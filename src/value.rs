// Validated output values. Mirrors the input shape one-for-one; no serde_json::Value here.
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Tuples and lists.
    Seq(Vec<TypedValue>),
    /// Records and maps.
    Map(IndexMap<String, TypedValue>),
}

impl TypedValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[TypedValue]> {
        match self {
            Self::Seq(xs) => Some(xs),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, TypedValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Field or key lookup on mappings.
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Back to plain JSON. Non-finite floats become null, as with `Value::from(f64)`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::String(s) => Value::String(s.clone()),
            Self::Seq(xs) => Value::Array(xs.iter().map(Self::to_json).collect()),
            Self::Map(m) => Value::Object(m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
        }
    }
}

/// Native view of an untyped value, for probing `contains` directly.
impl From<&Value> for TypedValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Array(xs) => Self::Seq(xs.iter().map(Self::from).collect()),
            Value::Object(m) => Self::Map(m.iter().map(|(k, v)| (k.clone(), Self::from(v))).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_conversion_keeps_shape_and_order() {
        let src = json!({"z": [1, 2.5, "x", null, true], "a": {"nested": -3}});
        let typed = TypedValue::from(&src);
        let keys: Vec<&String> = typed.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(typed.get("a").and_then(|a| a.get("nested")).and_then(TypedValue::as_i64), Some(-3));
        assert_eq!(typed.to_json(), src);
    }

    #[test]
    fn serializes_as_plain_json() {
        let typed = TypedValue::Seq(vec![TypedValue::Integer(1), TypedValue::Null, TypedValue::Float(0.5)]);
        assert_eq!(serde_json::to_string(&typed).unwrap(), "[1,null,0.5]");
    }
}
