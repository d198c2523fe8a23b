//! JSON documents as object graphs.
//!
//! Objects become dictionaries keyed by member name and arrays become
//! collections, so two documents compare key-by-key and, by default,
//! without regard to array order.

use std::path::Path as FsPath;

use crate::catalog::{TypeCatalog, TypeDescriptor};
use crate::errors::{EquivError, Result};
use crate::model::{type_name, ObjectRef, Value};

/// Runtime type of converted JSON objects
pub const JSON_OBJECT: &str = "json-object";
/// Runtime type of converted JSON arrays
pub const JSON_ARRAY: &str = "json-array";

/// Convert a parsed JSON document
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Ref(ObjectRef::collection(JSON_ARRAY, items.iter().map(from_json)))
        }
        serde_json::Value::Object(members) => Value::Ref(ObjectRef::dictionary(
            JSON_OBJECT,
            members.iter().map(|(k, v)| (k.as_str(), from_json(v))),
        )),
    }
}

/// Parse and convert JSON text
///
/// # Errors
///
/// `Serialization` if the text is not valid JSON.
pub fn parse_json(text: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(from_json(&json))
}

/// Read, parse, and convert a JSON file
///
/// # Errors
///
/// `Io` if the file cannot be read, `Serialization` if it is not JSON.
pub fn load_json(path: &FsPath) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| EquivError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_json(&text)
}

impl TypeCatalog {
    /// Register the types JSON documents convert to
    ///
    /// # Errors
    ///
    /// `DuplicateType` if either type is already registered.
    pub fn with_json_types(self) -> Result<Self> {
        self.with_type(
            TypeDescriptor::class(JSON_OBJECT).dictionary_of(type_name::STRING, type_name::OBJECT),
        )?
        .with_type(TypeDescriptor::class(JSON_ARRAY).enumerable_of(type_name::OBJECT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemberProvider;
    use crate::model::{PayloadShape, TypeName};

    #[test]
    fn test_scalars_convert() {
        assert!(from_json(&serde_json::json!(null)).is_null());
        assert!(from_json(&serde_json::json!(3)).scalar_eq(&Value::Int(3)));
        assert!(from_json(&serde_json::json!(u64::MAX)).scalar_eq(&Value::UInt(u64::MAX)));
        assert!(from_json(&serde_json::json!(1.5)).scalar_eq(&Value::Float(1.5)));
        assert_eq!(from_json(&serde_json::json!("x")).as_str(), Some("x"));
    }

    #[test]
    fn test_containers_convert() {
        let value = parse_json(r#"{"name": "John", "tags": ["a", "b"]}"#).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.type_name(), JSON_OBJECT);
        assert_eq!(object.shape(), PayloadShape::Entries);

        let tags = object
            .entries()
            .unwrap()
            .into_iter()
            .find(|(k, _)| k.as_str() == Some("tags"))
            .map(|(_, v)| v)
            .unwrap();
        assert_eq!(tags.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_json_is_a_serialization_error() {
        let err = parse_json("{").unwrap_err();
        assert!(matches!(err, EquivError::Serialization { .. }));
    }

    #[test]
    fn test_json_types_register_shapes() {
        let catalog = TypeCatalog::new().with_json_types().unwrap();
        assert_eq!(
            catalog
                .dictionary_shape(&TypeName::new(JSON_OBJECT))
                .unwrap(),
            Some((TypeName::new("string"), TypeName::object()))
        );
        assert_eq!(
            catalog
                .enumerable_element_types(&TypeName::new(JSON_ARRAY))
                .unwrap(),
            vec![TypeName::object()]
        );
    }
}
