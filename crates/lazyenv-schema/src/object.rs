use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidationFailure;
use crate::schema::{BoxedSchema, Schema, SchemaExt};

/// Validates an object key by key.
///
/// Only declared keys appear in the output; everything else in the input is
/// dropped. Every failing key is reported, each issue prefixed with its key.
#[derive(Default)]
pub struct ObjectSchema {
    fields: Vec<(String, BoxedSchema)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare `name`. Redeclaring a name replaces its schema.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: Schema + Send + Sync + 'static,
        S::Output: Serialize,
    {
        let name = name.into();
        let schema = schema.boxed();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((name, schema)),
        }
        self
    }

    /// Declared names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Deserialize the validated object into `T`.
    pub fn typed<T: DeserializeOwned>(self) -> TypedSchema<T> {
        TypedSchema {
            object: self,
            _marker: PhantomData,
        }
    }
}

impl Schema for ObjectSchema {
    type Output = Map<String, Value>;

    fn parse(&self, input: &Value) -> Result<Self::Output, ValidationFailure> {
        let Value::Object(source) = input else {
            return Err(ValidationFailure::expected("object", input));
        };

        let mut output = Map::new();
        let mut issues = Vec::new();
        for (name, schema) in &self.fields {
            let raw = source.get(name).unwrap_or(&Value::Null);
            match (**schema).parse_value(raw) {
                Ok(value) => {
                    output.insert(name.clone(), value);
                }
                Err(failure) => issues.extend(failure.at(name).into_issues()),
            }
        }

        match ValidationFailure::from_issues(issues) {
            Some(failure) => Err(failure),
            None => Ok(output),
        }
    }
}

/// An [`ObjectSchema`] whose result is decoded into `T`.
pub struct TypedSchema<T> {
    object: ObjectSchema,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Schema for TypedSchema<T> {
    type Output = T;

    fn parse(&self, input: &Value) -> Result<T, ValidationFailure> {
        let object = self.object.parse(input)?;
        serde_json::from_value(Value::Object(object))
            .map_err(|err| ValidationFailure::new(format!("cannot decode validated object: {err}")))
    }
}
