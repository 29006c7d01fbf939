use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::de::{Deserializer, Options};
use crate::descriptor::TypeDescriptor;
use crate::error::Error;
use crate::value::TypedValue;

/// Validate against `descriptor`, then deserialize the validated value into
/// `T` with JSON-path context in error messages.
pub fn deserialize_as<T: DeserializeOwned>(
    descriptor: &TypeDescriptor,
    input: &Value,
    options: Options,
) -> Result<T, Error> {
    let typed = Deserializer::new(options).deserialize(descriptor, input)?;
    into_target(&typed)
}

/// Parse JSON text and validate it against `descriptor`.
pub fn from_str_with_path(descriptor: &TypeDescriptor, src: &str, options: Options) -> Result<TypedValue, Error> {
    let input = serde_json::from_str::<Value>(src)?;
    Ok(Deserializer::new(options).deserialize(descriptor, &input)?)
}

pub fn into_target<T: DeserializeOwned>(typed: &TypedValue) -> Result<T, Error> {
    match serde_path_to_error::deserialize::<_, T>(typed.to_json()) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(Error::Target { path, message: err.into_inner().to_string() })
        }
    }
}
