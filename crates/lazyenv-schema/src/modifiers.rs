use serde_json::Value;

use crate::error::ValidationFailure;
use crate::schema::Schema;

/// See [`SchemaExt::optional`](crate::SchemaExt::optional).
#[derive(Debug, Clone)]
pub struct Optional<S> {
    inner: S,
}

impl<S> Optional<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Schema> Schema for Optional<S> {
    type Output = Option<S::Output>;

    fn parse(&self, input: &Value) -> Result<Self::Output, ValidationFailure> {
        match input {
            Value::Null => Ok(None),
            other => self.inner.parse(other).map(Some),
        }
    }
}

/// See [`SchemaExt::default`](crate::SchemaExt::default).
///
/// The default is parsed by the inner schema like any other input, so a
/// default that the schema rejects surfaces on first access.
#[derive(Debug, Clone)]
pub struct WithDefault<S> {
    inner: S,
    default: Value,
}

impl<S> WithDefault<S> {
    pub(crate) fn new(inner: S, default: Value) -> Self {
        Self { inner, default }
    }
}

impl<S: Schema> Schema for WithDefault<S> {
    type Output = S::Output;

    fn parse(&self, input: &Value) -> Result<Self::Output, ValidationFailure> {
        match input {
            Value::Null => self.inner.parse(&self.default),
            other => self.inner.parse(other),
        }
    }
}

/// See [`SchemaExt::map`](crate::SchemaExt::map).
#[derive(Clone)]
pub struct Mapped<S, F> {
    inner: S,
    f: F,
}

impl<S, F> Mapped<S, F> {
    pub(crate) fn new(inner: S, f: F) -> Self {
        Self { inner, f }
    }
}

impl<S, F, U> Schema for Mapped<S, F>
where
    S: Schema,
    F: Fn(S::Output) -> U,
{
    type Output = U;

    fn parse(&self, input: &Value) -> Result<U, ValidationFailure> {
        self.inner.parse(input).map(&self.f)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::primitives::{coerce, string};
    use crate::schema::{Schema, SchemaExt};

    #[test]
    fn optional_maps_absent_to_none() {
        let schema = coerce::integer().optional();
        assert_eq!(schema.parse(&json!(null)).unwrap(), None);
        assert_eq!(schema.parse(&json!("3")).unwrap(), Some(3));
        assert!(schema.parse(&json!("x")).is_err());
    }

    #[test]
    fn default_substitutes_absent_input() {
        let schema = string().default("haiyaa");
        assert_eq!(schema.parse(&json!(null)).unwrap(), "haiyaa");
        assert_eq!(schema.parse(&json!("set")).unwrap(), "set");
        assert!(schema.parse(&json!(1)).is_err());
    }

    #[test]
    fn rejected_default_fails_like_any_input() {
        let schema = coerce::integer().default("not-a-number");
        assert!(schema.parse(&json!(null)).is_err());
    }

    #[test]
    fn map_transforms_successful_parse() {
        let schema = string().map(|s| s.split(',').map(str::to_string).collect::<Vec<_>>());
        assert_eq!(schema.parse(&json!("a,b")).unwrap(), vec!["a", "b"]);
        assert!(schema.parse(&json!(null)).is_err());
    }
}
