//! Runtime algebraic type descriptors and a validating decoder for JSON-like data.
//!
//! Build a descriptor graph out of primitives, aliases, unions, enums, tuples,
//! records, lists and maps, then feed untyped `serde_json::Value` trees through
//! [`de::deserialize`] to get back a [`value::TypedValue`] that is known to
//! conform, or a [`error::DeserializationError`] pointing at the first offending
//! node.
//!
//! ```
//! use json_adt::descriptor::TypeDescriptor;
//!
//! let error = TypeDescriptor::record([
//!     ("code", TypeDescriptor::integer()),
//!     ("message", TypeDescriptor::string()),
//! ]).unwrap();
//! let value = json_adt::de::deserialize(&error, &serde_json::json!({"code": "4", "message": "nope"})).unwrap();
//! assert!(error.contains(&value));
//! ```
pub mod catalog;
pub mod de;
pub mod descriptor;
pub mod error;
pub mod order;
pub mod path_de;
pub mod target;
pub mod value;

pub use de::{deserialize, deserialize_with, Deserializer, Options, Validator};
pub use descriptor::{Kind, Primitive, TypeDescriptor};
pub use error::{ConstructionError, DeErrorKind, DeserializationError, Error};
pub use order::SubtypeOrder;
pub use value::TypedValue;
