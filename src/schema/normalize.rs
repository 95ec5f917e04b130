//! Payload normalization and validation.
//!
//! The analyzer emits snake_case JSON. Normalization rewrites every object
//! key to camelCase, then builds the typed entity model. Components and
//! instances are checked field by field in wire order; their leaf values
//! (strings, spans, props, packages) go through serde, with
//! `serde_path_to_error` locating the offending field inside them.

use std::fs;
use std::path::Path;

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use serde_path_to_error::Segment;
use tracing::debug;

use super::types::{ComponentRecord, Instance, Meta, Payload};

/// The first structural violation found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: expected {expected}, found {found}")]
pub struct ValidationError {
    /// Location of the offending field, e.g. `components[2].instances[0].props[0].prop_type`.
    pub path: String,
    /// What the field should have been.
    pub expected: String,
    /// What was actually there (`missing` when the field is absent).
    pub found: String,
}

impl ValidationError {
    fn new(path: &str, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            path: if path.is_empty() {
                "payload".to_string()
            } else {
                path.to_string()
            },
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Errors that can occur while loading a payload.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Failed to read the payload from disk.
    #[error("Failed to read payload: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not valid JSON.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is JSON but does not have the expected shape.
    #[error("Invalid payload: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

type Validated<T> = Result<T, ValidationError>;

/// Reads and normalizes a payload file.
pub fn parse_file(path: &Path) -> SchemaResult<Payload> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses and normalizes a payload from a JSON string.
///
/// # Example
///
/// ```
/// use cuin::schema::parse_str;
///
/// let payload = parse_str(r#"{"meta": {"base_path": "/repo"}, "components": []}"#).unwrap();
/// assert_eq!(payload.meta.base_path, "/repo");
/// assert!(payload.components.is_empty());
/// ```
pub fn parse_str(content: &str) -> SchemaResult<Payload> {
    let value: Value = serde_json::from_str(content)?;
    Ok(normalize(value)?)
}

/// Recursively rewrites object keys from snake_case to camelCase.
///
/// Only keys are touched; string values (prop keys, raw source) are kept verbatim.
pub fn to_camel_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lower_camel_case(), to_camel_case_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(to_camel_case_keys).collect()),
        other => other,
    }
}

/// Normalizes an untyped JSON document into a [`Payload`].
pub fn normalize(value: Value) -> Validated<Payload> {
    let value = to_camel_case_keys(value);
    let root = object(&value, "")?;

    let meta: Meta = field(root, "meta", "")?;
    let components = array(root, "components", "")?
        .iter()
        .enumerate()
        .map(|(i, c)| component(c, &index("components", i)))
        .collect::<Validated<Vec<_>>>()?;

    debug!(
        components = components.len(),
        instances = components.iter().map(|c| c.instances.len()).sum::<usize>(),
        "normalized payload"
    );

    Ok(Payload { meta, components })
}

fn component(value: &Value, path: &str) -> Validated<ComponentRecord> {
    let obj = object(value, path)?;
    let id = field(obj, "id", path)?;
    let name = field(obj, "name", path)?;
    let package = field(obj, "package", path)?;

    let instances_path = join(path, "instances");
    let instances = array(obj, "instances", path)?
        .iter()
        .enumerate()
        .map(|(i, v)| instance(v, &index(&instances_path, i)))
        .collect::<Validated<Vec<_>>>()?;

    Ok(ComponentRecord {
        id,
        name,
        package,
        instances,
    })
}

fn instance(value: &Value, path: &str) -> Validated<Instance> {
    let obj = object(value, path)?;

    Ok(Instance {
        file_path: field(obj, "filePath", path)?,
        props: field(obj, "props", path)?,
        raw: field(obj, "raw", path)?,
        span: field(obj, "span", path)?,
        import_specifier: field(obj, "importSpecifier", path)?,
        resolved_path: field(obj, "resolvedPath", path)?,
        package: field(obj, "package", path)?,
    })
}

/// Deserializes the required field `key` of `obj`.
///
/// A present `null` is accepted only where `T` is an `Option`.
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str, path: &str) -> Validated<T> {
    let path = join(path, key);
    let value = obj
        .get(key)
        .ok_or_else(|| ValidationError::new(&path, expected_for(key), "missing"))?;
    serde_path_to_error::deserialize(value).map_err(|err| violation(key, path, value, &err))
}

/// Locates a deserialization failure inside `value`, the field `key` at `path`.
fn violation(
    key: &str,
    mut path: String,
    value: &Value,
    err: &serde_path_to_error::Error<serde_json::Error>,
) -> ValidationError {
    let message = err.inner().to_string();
    let mut expected = expected_for(key);
    let mut found = Some(value);

    let steps = err
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Map { key } => Some(Ok(key.as_str())),
            Segment::Seq { index } => Some(Err(*index)),
            _ => None,
        })
        .chain(missing_field(&message).map(Ok));

    for step in steps {
        match step {
            Ok(key) => {
                path = join(&path, key);
                expected = expected_for(key);
                found = found.and_then(|v| v.get(key));
            }
            Err(i) => {
                path = index(&path, i);
                expected = "an object";
                found = found.and_then(|v| v.get(i));
            }
        }
    }

    ValidationError::new(&path, expected, found.map_or_else(|| "missing".to_string(), describe))
}

/// Field name of a serde "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

/// Appends an object key to a path, using the wire (snake_case) spelling.
fn join(path: &str, key: &str) -> String {
    let key = key.to_snake_case();
    if path.is_empty() {
        key
    } else {
        format!("{}.{}", path, key)
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

fn expected_for(key: &str) -> &'static str {
    match key {
        "meta" | "span" | "package" => "an object",
        "components" | "instances" | "props" => "an array",
        "start" | "end" | "startLine" | "endLine" | "startCol" | "endCol" => {
            "a non-negative integer"
        }
        "importSpecifier" => "a string or null",
        "type" => r#""native", "internal" or "external""#,
        _ => "a string",
    }
}

fn object<'a>(value: &'a Value, path: &str) -> Validated<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::new(path, "an object", describe(value)))
}

/// The required array field `key` of `obj`, walked element by element.
fn array<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Validated<&'a Vec<Value>> {
    let path = join(path, key);
    let value = obj
        .get(key)
        .ok_or_else(|| ValidationError::new(&path, "an array", "missing"))?;
    value
        .as_array()
        .ok_or_else(|| ValidationError::new(&path, "an array", describe(value)))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PackageIdentity;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "meta": { "base_path": "path/to/base" },
            "components": [
                {
                    "id": "1",
                    "name": "Component 1",
                    "package": { "type": "native" },
                    "instances": [
                        {
                            "file_path": "path/to/component1.ts",
                            "props": [
                                { "key": "prop1", "raw": "value1", "prop_type": "string" }
                            ],
                            "raw": "<Component1 prop1='value1' />",
                            "span": {
                                "start": 1, "end": 2,
                                "start_line": 1, "end_line": 1,
                                "start_col": 1, "end_col": 2
                            },
                            "import_specifier": "Component1",
                            "resolved_path": "path/to/component1.ts",
                            "package": { "type": "external", "name": "ui", "version": "1.0.0" }
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_normalize_valid_payload() {
        let payload = normalize(sample_payload()).unwrap();

        assert_eq!(payload.meta.base_path, "path/to/base");
        assert_eq!(payload.components.len(), 1);

        let component = &payload.components[0];
        assert_eq!(component.package, PackageIdentity::Native);

        let instance = &component.instances[0];
        assert_eq!(instance.file_path, "path/to/component1.ts");
        assert_eq!(instance.import_specifier.as_deref(), Some("Component1"));
        assert_eq!(instance.span.start_line, 1);
        assert_eq!(instance.span.end_col, 2);
        assert_eq!(instance.package, PackageIdentity::external("ui", "1.0.0"));
        assert_eq!(instance.props[0].prop_type, "string");
        assert_eq!(instance.props[0].value, None);
    }

    #[test]
    fn test_camel_case_keys_leaves_values_alone() {
        let value = to_camel_case_keys(json!({
            "base_path": "snake_value",
            "nested": [{ "prop_type": "x" }]
        }));
        assert_eq!(
            value,
            json!({ "basePath": "snake_value", "nested": [{ "propType": "x" }] })
        );
    }

    #[test]
    fn test_already_camel_case_input_is_accepted() {
        let value = to_camel_case_keys(sample_payload());
        assert!(normalize(value).is_ok());
    }

    #[test]
    fn test_missing_field_reports_wire_path() {
        let mut value = sample_payload();
        value["components"][0]["instances"][0]["props"][0]
            .as_object_mut()
            .unwrap()
            .remove("prop_type");

        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "components[0].instances[0].props[0].prop_type");
        assert_eq!(err.expected, "a string");
        assert_eq!(err.found, "missing");
    }

    #[test]
    fn test_wrong_type_reports_found_value() {
        let mut value = sample_payload();
        value["components"][0]["instances"][0]["span"]["start_line"] = json!(-3);

        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "components[0].instances[0].span.start_line");
        assert_eq!(err.found, "number -3");
    }

    #[test]
    fn test_unknown_package_type_rejected() {
        let mut value = sample_payload();
        value["components"][0]["package"] = json!({ "type": "npm" });

        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "components[0].package.type");
        assert_eq!(err.expected, r#""native", "internal" or "external""#);
        assert_eq!(err.found, "string \"npm\"");
    }

    #[test]
    fn test_non_native_package_requires_version() {
        let mut value = sample_payload();
        value["components"][0]["package"] = json!({ "type": "internal", "name": "app" });

        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "components[0].package.version");
        assert_eq!(err.found, "missing");
    }

    #[test]
    fn test_import_specifier_nullable_but_required() {
        let mut value = sample_payload();
        value["components"][0]["instances"][0]["import_specifier"] = Value::Null;
        let payload = normalize(value.clone()).unwrap();
        assert_eq!(payload.components[0].instances[0].import_specifier, None);

        value["components"][0]["instances"][0]
            .as_object_mut()
            .unwrap()
            .remove("import_specifier");
        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "components[0].instances[0].import_specifier");
    }

    #[test]
    fn test_optional_prop_value() {
        let mut value = sample_payload();
        value["components"][0]["instances"][0]["props"][0]["value"] = json!("value1");
        let payload = normalize(value.clone()).unwrap();
        assert_eq!(
            payload.components[0].instances[0].props[0].value.as_deref(),
            Some("value1")
        );

        value["components"][0]["instances"][0]["props"][0]["value"] = json!(1);
        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "components[0].instances[0].props[0].value");
    }

    #[test]
    fn test_component_fields_checked_in_wire_order() {
        let mut value = sample_payload();
        value["components"][0].as_object_mut().unwrap().remove("id");
        value["components"][0]["instances"][0]["raw"] = json!(7);

        let err = normalize(value.clone()).unwrap_err();
        assert_eq!(err.path, "components[0].id");
        assert_eq!(err.found, "missing");

        value["components"][0]["id"] = json!("1");
        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "components[0].instances[0].raw");
        assert_eq!(err.found, "number 7");
    }

    #[test]
    fn test_prop_that_is_not_an_object() {
        let mut value = sample_payload();
        value["components"][0]["instances"][0]["props"][0] = json!("prop1");

        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "components[0].instances[0].props[0]");
        assert_eq!(err.expected, "an object");
        assert_eq!(err.found, "string \"prop1\"");
    }

    #[test]
    fn test_first_violation_wins() {
        let mut value = sample_payload();
        value["meta"] = json!({});
        value["components"] = json!("nope");

        let err = normalize(value).unwrap_err();
        assert_eq!(err.path, "meta.base_path");
    }

    #[test]
    fn test_root_must_be_object() {
        let err = normalize(json!([1, 2])).unwrap_err();
        assert_eq!(err.path, "payload");
        assert_eq!(err.expected, "an object");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let mut value = sample_payload();
        value["components"][0]["props_usages"] = json!([]);
        value["components"][0]["package"] =
            json!({ "type": "internal", "name": "app", "version": "0.1.0", "canonical_path": "/x" });
        assert!(normalize(value).is_ok());
    }

    #[test]
    fn test_parse_str_invalid_json() {
        let result = parse_str("{ not json");
        assert!(matches!(result.unwrap_err(), SchemaError::Json(_)));
    }

    #[test]
    fn test_parse_str_validation_error() {
        let result = parse_str(r#"{"meta": {"base_path": 1}, "components": []}"#);
        match result.unwrap_err() {
            SchemaError::Validation(err) => assert_eq!(err.path, "meta.base_path"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("meta.base_path", "a string", "missing");
        assert_eq!(err.to_string(), "meta.base_path: expected a string, found missing");
    }
}
