use std::io::Read;
use std::path::Path;

use jsonschema::Validator;
use serde_json::{Map, Value};

use crate::config::SchemaConfig;
use crate::error::{Issue, Result, SchemaError, ValidationFailure};
use crate::primitives::{number_value, parse_float, parse_flag};
use crate::schema::Schema;

const MAX_REPORTED_ERRORS: usize = 4;

/// Keywords whose value is a map of subschemas.
const MAP_KEYWORDS: [&str; 5] = [
    "properties",
    "patternProperties",
    "dependentSchemas",
    "$defs",
    "definitions",
];

/// Keywords whose value is a single subschema.
const SINGLE_KEYWORDS: [&str; 11] = [
    "propertyNames",
    "additionalProperties",
    "unevaluatedProperties",
    "items",
    "contains",
    "additionalItems",
    "unevaluatedItems",
    "not",
    "if",
    "then",
    "else",
];

/// Keywords whose value is a list of subschemas.
const ARRAY_KEYWORDS: [&str; 4] = ["prefixItems", "allOf", "anyOf", "oneOf"];

/// A compiled JSON Schema document used as a [`Schema`].
///
/// Environment values are always strings, so by default the input is first
/// coerced toward the primitive types the document declares (see
/// [`SchemaConfig::coerce_types`]). The output is the coerced input.
pub struct JsonSchema {
    validator: Validator,
    document: Value,
    config: SchemaConfig,
}

impl JsonSchema {
    /// Compile a schema from a JSON string with default config.
    pub fn new(schema_json: &str) -> Result<Self> {
        Self::with_config(schema_json, SchemaConfig::default())
    }

    /// Compile a schema from a JSON string with explicit config.
    pub fn with_config(schema_json: &str, config: SchemaConfig) -> Result<Self> {
        let document: Value = serde_json::from_str(schema_json)?;
        Self::from_value(&document, config)
    }

    /// Compile a schema from a JSON value.
    pub fn from_value(document: &Value, config: SchemaConfig) -> Result<Self> {
        let mut document = document.clone();
        if config.strict_mode {
            apply_strict_mode(&mut document);
        }

        let validator = jsonschema::validator_for(&document)
            .map_err(|err| SchemaError::CompileFailed(err.to_string()))?;

        Ok(Self {
            validator,
            document,
            config,
        })
    }

    /// Load and compile a schema file, bounded by `config.max_schema_file_size`.
    pub fn from_file(path: &Path, config: SchemaConfig) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;
        let metadata = file
            .metadata()
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

        if !metadata.is_file() {
            return Err(SchemaError::LoadFailed(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let max_bytes = config.max_schema_file_size;
        if metadata.len() > max_bytes as u64 {
            return Err(SchemaError::LoadFailed(format!(
                "schema file too large ({} bytes): {}",
                metadata.len(),
                path.display()
            )));
        }

        // The file may grow between metadata and read.
        let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut content = String::new();
        file.take(read_limit)
            .read_to_string(&mut content)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;
        if content.len() > max_bytes {
            return Err(SchemaError::LoadFailed(format!(
                "schema file too large while reading: {}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded schema file");
        Self::with_config(&content, config)
    }

    /// The compiled document, after strict-mode rewriting.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Names listed under the document's top-level `properties`.
    pub fn property_names(&self) -> Vec<String> {
        match self.document.get("properties") {
            Some(Value::Object(properties)) => properties.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }
}

impl Schema for JsonSchema {
    type Output = Value;

    fn parse(&self, input: &Value) -> std::result::Result<Value, ValidationFailure> {
        let value = if self.config.coerce_types {
            coerce_to_schema(&self.document, input)
        } else {
            input.clone()
        };

        // Masked messages never quote the instance; values may be secrets.
        let issues: Vec<Issue> = self
            .validator
            .iter_errors(&value)
            .take(MAX_REPORTED_ERRORS)
            .map(|err| Issue {
                path: err
                    .instance_path()
                    .iter()
                    .map(|segment| segment.to_string())
                    .collect(),
                message: err.masked().to_string(),
            })
            .collect();

        match ValidationFailure::from_issues(issues) {
            Some(failure) => Err(failure),
            None => Ok(value),
        }
    }
}

fn coerce_to_schema(schema: &Value, input: &Value) -> Value {
    let Value::Object(schema) = schema else {
        return input.clone();
    };

    match input {
        Value::String(text) => coerce_string(schema, text).unwrap_or_else(|| input.clone()),
        Value::Object(fields) => {
            let Some(Value::Object(properties)) = schema.get("properties") else {
                return input.clone();
            };
            let coerced = fields
                .iter()
                .map(|(key, value)| {
                    let value = match properties.get(key) {
                        Some(property) => coerce_to_schema(property, value),
                        None => value.clone(),
                    };
                    (key.clone(), value)
                })
                .collect::<Map<_, _>>();
            Value::Object(coerced)
        }
        Value::Array(items) => match schema.get("items") {
            Some(item_schema) => Value::Array(
                items
                    .iter()
                    .map(|item| coerce_to_schema(item_schema, item))
                    .collect(),
            ),
            None => input.clone(),
        },
        _ => input.clone(),
    }
}

/// Convert `text` to the first declared primitive type it parses as.
/// Strings are left alone when the schema also accepts strings.
fn coerce_string(schema: &Map<String, Value>, text: &str) -> Option<Value> {
    let types: Vec<&str> = match schema.get("type") {
        Some(Value::String(kind)) => vec![kind.as_str()],
        Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).collect(),
        _ => return None,
    };
    if types.contains(&"string") {
        return None;
    }

    types.iter().find_map(|kind| match *kind {
        "integer" => text.trim().parse::<i64>().ok().map(Value::from),
        "number" => parse_float(text).and_then(number_value),
        "boolean" => parse_flag(text).map(Value::Bool),
        "null" if text.is_empty() => Some(Value::Null),
        _ => None,
    })
}

fn apply_strict_mode(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            for (key, child) in map.iter_mut() {
                let key = key.as_str();
                if MAP_KEYWORDS.contains(&key) {
                    if let Value::Object(children) = child {
                        children.values_mut().for_each(apply_strict_mode);
                    }
                } else if SINGLE_KEYWORDS.contains(&key) || ARRAY_KEYWORDS.contains(&key) {
                    apply_strict_mode(child);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(apply_strict_mode),
        _ => {}
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(kinds)) => kinds.iter().any(|kind| kind == "object"),
        _ => ["properties", "patternProperties", "required", "propertyNames"]
            .iter()
            .any(|keyword| map.contains_key(*keyword)),
    }
}
