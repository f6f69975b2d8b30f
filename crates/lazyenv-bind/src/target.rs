use std::collections::BTreeMap;

use lazyenv_schema::{BoxedSchema, Schema, SchemaExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{EnvError, Result};
use crate::field::FieldValidator;
use crate::source::{ProcessEnv, Source};

/// Field names and their schemas, in declaration order.
#[derive(Default)]
pub struct FieldSpec {
    fields: Vec<(String, BoxedSchema)>,
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
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

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

enum Entry {
    Plain(Value),
    Bound(FieldValidator<BoxedSchema>),
}

impl Entry {
    fn raw_value(self) -> Value {
        match self {
            Entry::Plain(raw) => raw,
            Entry::Bound(field) => field.into_raw_value(),
        }
    }
}

/// A key-value environment whose keys can be bound to schemas.
///
/// Unbound keys read back exactly what was stored. Bound keys read through a
/// [`FieldValidator`]: parsed on first read, re-validated on every write.
#[derive(Default)]
pub struct EnvTarget {
    entries: BTreeMap<String, Entry>,
}

impl EnvTarget {
    /// An empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every entry of `source`.
    pub fn from_source<S: Source + ?Sized>(source: &S) -> Self {
        Self {
            entries: source
                .to_object()
                .into_iter()
                .map(|(key, value)| (key, Entry::Plain(value)))
                .collect(),
        }
    }

    /// Snapshot the process environment.
    pub fn from_process_env() -> Self {
        Self::from_source(&ProcessEnv)
    }

    /// Bind every field of `spec` in place and return this same target.
    ///
    /// Each field captures the key's current raw value; a missing key
    /// captures [`Value::Null`]. Nothing is parsed here, so binding over
    /// invalid or missing values always succeeds. Binding an already-bound
    /// key replaces its schema and keeps its last accepted raw value.
    pub fn bind(&mut self, spec: FieldSpec) -> &mut Self {
        let count = spec.len();
        for (name, schema) in spec.fields {
            let raw = self
                .entries
                .remove(&name)
                .map_or(Value::Null, Entry::raw_value);
            self.entries
                .insert(name, Entry::Bound(FieldValidator::new(raw, schema)));
        }
        tracing::debug!(fields = count, "bound environment fields");
        self
    }

    /// Read `key`. Bound keys are parsed on first read and fail if invalid.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Entry::Plain(raw)) => Ok(Some(raw.clone())),
            Some(Entry::Bound(field)) => field.get_value().map(Some).map_err(|failure| {
                tracing::debug!(
                    key,
                    issues = failure.issues().len(),
                    "field failed validation on read"
                );
                EnvError::Field {
                    key: key.to_string(),
                    failure,
                }
            }),
        }
    }

    /// Read `key` and decode it into `T`. A missing key decodes from `null`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key)?.unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|source| EnvError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// Write `key`. Bound keys validate first and reject invalid values
    /// without changing state; unbound keys store `value` as is.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match self.entries.get(key) {
            Some(Entry::Bound(field)) => field.set_value(value).map_err(|failure| {
                tracing::debug!(
                    key,
                    issues = failure.issues().len(),
                    "rejected write to field"
                );
                EnvError::Field {
                    key: key.to_string(),
                    failure,
                }
            }),
            _ => {
                self.entries.insert(key.to_string(), Entry::Plain(value));
                Ok(())
            }
        }
    }

    /// Every key, bound or not, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_bound(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(Entry::Bound(_)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvTarget
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), Entry::Plain(Value::String(value.into()))))
                .collect(),
        }
    }
}

/// Bind `spec` over a snapshot of the process environment.
pub fn bind(spec: FieldSpec) -> EnvTarget {
    let mut target = EnvTarget::from_process_env();
    target.bind(spec);
    target
}

#[cfg(test)]
mod tests {
    use lazyenv_schema::{coerce, string};
    use serde_json::json;

    use super::*;

    #[test]
    fn unbound_keys_read_back_as_stored() {
        let mut target: EnvTarget = [("A", "1")].into_iter().collect();
        assert_eq!(target.get("A").unwrap(), Some(json!("1")));
        assert_eq!(target.get("B").unwrap(), None);

        target.set("B", 2).unwrap();
        assert_eq!(target.get("B").unwrap(), Some(json!(2)));
    }

    #[test]
    fn bound_keys_stay_enumerable() {
        let mut target: EnvTarget = [("A", "1"), ("B", "2")].into_iter().collect();
        target.bind(FieldSpec::new().field("B", string()).field("C", string()));

        assert_eq!(target.keys().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert!(!target.is_bound("A"));
        assert!(target.is_bound("B"));
        assert!(target.is_bound("C"));
        assert_eq!(target.len(), 3);
    }

    #[test]
    fn rebinding_keeps_last_accepted_raw_value() {
        let mut target: EnvTarget = [("X", "5")].into_iter().collect();
        target.bind(FieldSpec::new().field("X", string()));
        target.set("X", "7").unwrap();

        target.bind(FieldSpec::new().field("X", coerce::integer()));
        assert_eq!(target.get("X").unwrap(), Some(json!(7)));
    }

    #[test]
    fn get_as_decodes_parsed_value() {
        let mut target: EnvTarget = [("PORT", "8080")].into_iter().collect();
        target.bind(FieldSpec::new().field("PORT", coerce::integer()));

        assert_eq!(target.get_as::<u16>("PORT").unwrap(), 8080);
        assert!(matches!(
            target.get_as::<bool>("PORT"),
            Err(EnvError::Decode { .. })
        ));
        assert_eq!(target.get_as::<Option<String>>("MISSING").unwrap(), None);
    }

    #[test]
    fn field_errors_name_the_key() {
        let mut target = EnvTarget::new();
        target.bind(FieldSpec::new().field("X", string()));

        let err = target.get("X").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for X: expected string, received null"
        );
        assert!(err.failure().is_some());
    }

    #[test]
    fn spec_redeclaration_replaces_schema() {
        let spec = FieldSpec::new()
            .field("X", string())
            .field("X", coerce::number());
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["X"]);
    }
}
