use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationFailure;
use crate::modifiers::{Mapped, Optional, WithDefault};
use crate::primitives::number_value;

/// A validator for values of type [`Schema::Output`].
///
/// `parse` either accepts the input, possibly coercing it to a canonical
/// representation, or rejects it with a [`ValidationFailure`]. An absent
/// input is passed as [`Value::Null`].
pub trait Schema {
    type Output;

    fn parse(&self, input: &Value) -> Result<Self::Output, ValidationFailure>;
}

impl<S: Schema + ?Sized> Schema for &S {
    type Output = S::Output;

    fn parse(&self, input: &Value) -> Result<Self::Output, ValidationFailure> {
        (**self).parse(input)
    }
}

/// Combinators available on every schema.
pub trait SchemaExt: Schema + Sized {
    /// Accept an absent input as `None`.
    fn optional(self) -> Optional<Self> {
        Optional::new(self)
    }

    /// Parse `value` in place of an absent input.
    fn default(self, value: impl Into<Value>) -> WithDefault<Self> {
        WithDefault::new(self, value.into())
    }

    /// Post-process a successful parse.
    fn map<U, F>(self, f: F) -> Mapped<Self, F>
    where
        F: Fn(Self::Output) -> U,
    {
        Mapped::new(self, f)
    }

    /// Erase the output type so schemas of different types share a collection.
    fn boxed(self) -> BoxedSchema
    where
        Self: Send + Sync + 'static,
        Self::Output: Serialize,
    {
        Box::new(self)
    }
}

impl<S: Schema> SchemaExt for S {}

/// Object-safe view of a schema whose output is rendered back to JSON.
pub trait DynSchema: Send + Sync {
    fn parse_value(&self, input: &Value) -> Result<Value, ValidationFailure>;
}

impl<S> DynSchema for S
where
    S: Schema + Send + Sync,
    S::Output: Serialize,
{
    fn parse_value(&self, input: &Value) -> Result<Value, ValidationFailure> {
        let parsed = self.parse(input)?;
        let value = serde_json::to_value(parsed).map_err(|err| {
            ValidationFailure::new(format!("parsed value is not representable: {err}"))
        })?;

        // `"123"` under a number schema reads back as `123`, not `123.0`.
        let whole = value
            .as_f64()
            .filter(|_| value.is_f64())
            .and_then(number_value);
        Ok(whole.unwrap_or(value))
    }
}

/// A type-erased schema producing JSON values.
pub type BoxedSchema = Box<dyn DynSchema>;

impl Schema for dyn DynSchema {
    type Output = Value;

    fn parse(&self, input: &Value) -> Result<Value, ValidationFailure> {
        self.parse_value(input)
    }
}

impl Schema for BoxedSchema {
    type Output = Value;

    fn parse(&self, input: &Value) -> Result<Value, ValidationFailure> {
        (**self).parse_value(input)
    }
}

/// A boxed schema that keeps its output type.
pub type BoxedSchemaOf<T> = Box<dyn Schema<Output = T> + Send + Sync>;

impl<T> Schema for BoxedSchemaOf<T> {
    type Output = T;

    fn parse(&self, input: &Value) -> Result<T, ValidationFailure> {
        (**self).parse(input)
    }
}
