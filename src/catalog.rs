//! Built-in example schemas: a small mock payments API.
//!
//! Built once per process on first use and shared read-only afterwards.
use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::descriptor::{Primitive, TypeDescriptor};
use crate::error::ConstructionError;
use crate::order::SubtypeOrder;

#[derive(Debug)]
pub struct Catalog {
    entries: IndexMap<&'static str, TypeDescriptor>,
}

static BUILTIN: OnceCell<Catalog> = OnceCell::new();

impl Catalog {
    pub fn builtin() -> Result<&'static Catalog, ConstructionError> {
        BUILTIN.get_or_try_init(Catalog::build)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TypeDescriptor)> {
        self.entries.iter().map(|(name, ty)| (*name, ty))
    }

    fn build() -> Result<Self, ConstructionError> {
        let order = SubtypeOrder::new();
        let mut entries = IndexMap::new();

        let charge_status = TypeDescriptor::enumeration(["submitted", "pending", "paid", "rejected"])?;
        let currency = TypeDescriptor::alias("Currency", Primitive::String)?;
        let charge_amount = TypeDescriptor::tuple([TypeDescriptor::integer(), currency.clone()])?;
        let metadata = TypeDescriptor::record([(
            "data",
            TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::string())?,
        )])?;
        let charge = TypeDescriptor::record([
            ("status", charge_status.clone()),
            ("currency", currency.clone()),
            ("amount", charge_amount.clone()),
        ])?
        .merge(&metadata, &order)?;
        let error = TypeDescriptor::record([
            ("code", TypeDescriptor::integer()),
            ("message", TypeDescriptor::string()),
        ])?;
        let api_response = charge.clone() | error.clone();

        let basic_value = TypeDescriptor::union([
            TypeDescriptor::integer(),
            TypeDescriptor::float(),
            TypeDescriptor::string(),
        ])?;
        let success = TypeDescriptor::record([
            ("object", TypeDescriptor::string()),
            ("data", TypeDescriptor::map(TypeDescriptor::string(), basic_value.clone())?),
        ])?;
        let result = error.clone() | success.clone();
        let two_bits = TypeDescriptor::tuple([TypeDescriptor::boolean(), TypeDescriptor::boolean()])?;

        entries.insert("charge-status", charge_status);
        entries.insert("currency", currency);
        entries.insert("charge-amount", charge_amount);
        entries.insert("metadata", metadata);
        entries.insert("charge", charge);
        entries.insert("error", error);
        entries.insert("api-response", api_response);
        entries.insert("basic-value", basic_value);
        entries.insert("success", success);
        entries.insert("result", result);
        entries.insert("two-bits", two_bits);

        tracing::debug!(schemas = entries.len(), "built-in catalog ready");
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::deserialize;
    use serde_json::json;

    #[test]
    fn builtin_schemas_are_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.names().count(), 11);
        for (name, ty) in catalog.iter() {
            assert!(ty.valid(), "{name} is invalid");
        }
    }

    #[test]
    fn charge_includes_metadata_fields() {
        let charge = Catalog::builtin().unwrap().get("charge").unwrap();
        let names: Vec<&String> = charge.as_record().unwrap().fields().keys().collect();
        assert_eq!(names, ["status", "currency", "amount", "data"]);

        let input = json!({
            "status": "paid",
            "currency": "USD",
            "amount": [1200, "USD"],
            "data": {"order": "A-17"}
        });
        assert!(deserialize(charge, &input).is_ok());
    }

    #[test]
    fn api_response_accepts_errors_and_charges() {
        let response = Catalog::builtin().unwrap().get("api-response").unwrap();
        assert!(deserialize(response, &json!({"code": 402, "message": "declined"})).is_ok());
        assert!(deserialize(response, &json!({"status": "lost", "currency": "USD", "amount": [1, "USD"], "data": {}})).is_err());
    }

    #[test]
    fn two_bits_is_a_boolean_pair() {
        let two_bits = Catalog::builtin().unwrap().get("two-bits").unwrap();
        assert!(deserialize(two_bits, &json!([true, false])).is_ok());
        assert!(deserialize(two_bits, &json!([true, "false"])).is_err());
    }
}
