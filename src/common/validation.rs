//! Field-level validation of JSON payloads.
//!
//! Models read their fields through a [`FieldReader`], which collects every
//! violation into a [`ValidationErrors`] map keyed by field path instead of
//! stopping at the first one.

use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub name: &'static str,
    pub message: String,
    pub kind: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    pub fn required(path: &str, message: impl Into<String>) -> Self {
        Self {
            name: "ValidatorError",
            message: message.into(),
            kind: "required".to_string(),
            path: path.to_string(),
            value: None,
        }
    }

    pub fn cast(path: &str, kind: &str, value: &Value) -> Self {
        Self {
            name: "CastError",
            message: format!(
                "Cast to {} failed for value \"{}\" (type {}) at path \"{}\"",
                kind,
                display_value(value),
                json_type(value),
                path
            ),
            kind: kind.to_string(),
            path: path.to_string(),
            value: Some(value.clone()),
        }
    }

    pub fn enum_value(path: &str, value: &str) -> Self {
        Self {
            name: "ValidatorError",
            message: format!("`{}` is not a valid enum value for path `{}`.", value, path),
            kind: "enum".to_string(),
            path: path.to_string(),
            value: Some(Value::String(value.to_string())),
        }
    }

    pub fn min(path: &str, message: impl Into<String>, value: &Value) -> Self {
        Self {
            name: "ValidatorError",
            message: message.into(),
            kind: "min".to_string(),
            path: path.to_string(),
            value: Some(value.clone()),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Field errors of one payload, keyed by field path
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. Only the first error per path is kept.
    pub fn insert(&mut self, error: FieldError) {
        self.0.entry(error.path.clone()).or_insert(error);
    }

    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.0.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldError)> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, error) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", path, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Conversion from a JSON value into a typed field
pub trait FieldValue: Sized {
    /// Kind name reported in cast errors
    const KIND: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for String {
    const KIND: &'static str = "String";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FieldValue for f64 {
    const KIND: &'static str = "Number";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

/// 2^63, the first whole float past `i64::MAX`
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

impl FieldValue for i64 {
    const KIND: &'static str = "Integer";

    /// Whole floats are accepted only inside the `i64` range.
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|n| n.fract() == 0.0 && *n >= -I64_LIMIT && *n < I64_LIMIT)
                .map(|n| n as i64)
        })
    }
}

impl FieldValue for bool {
    const KIND: &'static str = "Boolean";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FieldValue for ObjectId {
    const KIND: &'static str = "ObjectId";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| ObjectId::parse_str(s).ok())
    }
}

/// Reads typed fields out of a JSON payload, accumulating errors.
///
/// A non-object payload reads as if every field were absent.
pub struct FieldReader<'a> {
    fields: Option<&'a Map<String, Value>>,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a Value) -> Self {
        Self {
            fields: payload.as_object(),
            errors: ValidationErrors::new(),
        }
    }

    /// Whether the payload carries the key at all, `null` included
    pub fn has(&self, path: &str) -> bool {
        self.fields.is_some_and(|fields| fields.contains_key(path))
    }

    fn get(&self, path: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(path))
    }

    /// Read a field that must be present. `null` and `""` count as missing.
    pub fn required<T: FieldValue>(&mut self, path: &str, message: &str) -> Option<T> {
        match self.get(path) {
            Some(value) if !is_blank(value) => self.cast(path, value),
            _ => {
                self.errors.insert(FieldError::required(path, message));
                None
            }
        }
    }

    /// Read a required field only when the payload supplies it.
    ///
    /// Used for partial updates: an absent key is left alone, a supplied
    /// blank value fails the required constraint.
    pub fn supplied<T: FieldValue>(&mut self, path: &str, message: &str) -> Option<T> {
        if !self.has(path) {
            return None;
        }
        self.required(path, message)
    }

    /// Read a field without a required constraint.
    pub fn optional<T: FieldValue>(&mut self, path: &str) -> Option<T> {
        match self.get(path) {
            None | Some(Value::Null) => None,
            Some(value) => self.cast(path, value),
        }
    }

    fn cast<T: FieldValue>(&mut self, path: &str, value: &Value) -> Option<T> {
        let parsed = T::from_value(value);
        if parsed.is_none() {
            self.errors.insert(FieldError::cast(path, T::KIND, value));
        }
        parsed
    }

    pub fn reject(&mut self, error: FieldError) {
        self.errors.insert(error);
    }

    pub fn finish(self) -> std::result::Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

fn is_blank(value: &Value) -> bool {
    value.is_null() || value.as_str() == Some("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_collects_every_missing_field() {
        let payload = json!({ "name": "", "price": null });
        let mut reader = FieldReader::new(&payload);
        assert_eq!(reader.required::<String>("name", "Name is required"), None);
        assert_eq!(reader.required::<f64>("price", "Price is required"), None);
        assert_eq!(reader.required::<bool>("inStock", "In stock is required"), None);

        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name").unwrap().kind, "required");
        assert_eq!(errors.get("price").unwrap().message, "Price is required");
    }

    #[test]
    fn test_wrong_type_is_a_cast_error() {
        let payload = json!({ "price": "cheap", "quantity": 2.5 });
        let mut reader = FieldReader::new(&payload);
        assert_eq!(reader.required::<f64>("price", "Price is required"), None);
        assert_eq!(reader.required::<i64>("quantity", "Quantity is required"), None);

        let errors = reader.finish().unwrap_err();
        let price = errors.get("price").unwrap();
        assert_eq!(price.name, "CastError");
        assert_eq!(
            price.message,
            "Cast to Number failed for value \"cheap\" (type string) at path \"price\""
        );
        assert_eq!(errors.get("quantity").unwrap().kind, "Integer");
    }

    #[test]
    fn test_integral_float_reads_as_integer() {
        let payload = json!({ "quantity": 10.0 });
        let mut reader = FieldReader::new(&payload);
        assert_eq!(reader.required::<i64>("quantity", "Quantity is required"), Some(10));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_out_of_range_integer_is_a_cast_error() {
        let payload = json!({ "quantity": 1e20, "stock": -1e20 });
        let mut reader = FieldReader::new(&payload);
        assert_eq!(reader.required::<i64>("quantity", "Quantity is required"), None);
        assert_eq!(reader.required::<i64>("stock", "Stock is required"), None);

        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.get("quantity").unwrap().name, "CastError");
        assert_eq!(errors.get("quantity").unwrap().kind, "Integer");
        assert_eq!(errors.get("stock").unwrap().name, "CastError");
    }

    #[test]
    fn test_supplied_skips_absent_keys() {
        let payload = json!({ "brand": null });
        let mut reader = FieldReader::new(&payload);
        assert_eq!(reader.supplied::<String>("name", "Name is required"), None);
        assert_eq!(reader.supplied::<String>("brand", "Brand is required"), None);

        let errors = reader.finish().unwrap_err();
        assert!(!errors.contains("name"));
        assert!(errors.contains("brand"));
    }

    #[test]
    fn test_non_object_payload_reads_as_empty() {
        let payload = json!([1, 2, 3]);
        let mut reader = FieldReader::new(&payload);
        assert!(!reader.has("name"));
        assert_eq!(reader.optional::<bool>("isDeleted"), None);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_display_joins_paths() {
        let mut errors = ValidationErrors::new();
        errors.insert(FieldError::required("name", "Name is required"));
        errors.insert(FieldError::enum_value("category", "Off-road"));
        assert_eq!(
            errors.to_string(),
            "category: `Off-road` is not a valid enum value for path `category`., name: Name is required"
        );
    }
}
