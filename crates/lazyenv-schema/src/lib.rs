//! Schema contract and built-in schemas for lazily validated environment
//! variables.
//!
//! A [`Schema`] turns a raw JSON value into a typed value or rejects it with
//! a [`ValidationFailure`]. Environment values arrive as strings, so the
//! [`coerce`] constructors and [`JsonSchema`] convert them to the declared
//! type as part of a successful parse.

pub mod config;
pub mod error;
pub mod json;
pub mod modifiers;
pub mod object;
pub mod primitives;
pub mod schema;

pub use config::SchemaConfig;
pub use error::{Issue, Result, SchemaError, ValidationFailure};
pub use json::JsonSchema;
pub use modifiers::{Mapped, Optional, WithDefault};
pub use object::{ObjectSchema, TypedSchema};
pub use primitives::{
    boolean, coerce, integer, number, one_of, string, BooleanSchema, EnumSchema, IntegerSchema,
    NumberSchema, StringSchema,
};
pub use schema::{BoxedSchema, BoxedSchemaOf, DynSchema, Schema, SchemaExt};

/// JSON type name used in "expected X, received Y" messages.
pub fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
