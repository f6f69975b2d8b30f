//! Key-value sources an environment is bound over.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Value};

/// A string-keyed table of string values.
///
/// [`ProcessEnv`] is the default wherever a source is optional; tests and
/// embedders inject maps instead.
pub trait Source: Send + Sync {
    /// Current value of `key`, if set.
    fn get(&self, key: &str) -> Option<String>;

    /// Every entry, as a JSON object of strings.
    fn to_object(&self) -> Map<String, Value>;
}

/// The live process environment.
///
/// Entries whose key or value is not valid Unicode are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn to_object(&self) -> Map<String, Value> {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .map(|(key, value)| (key, Value::String(value)))
            .collect()
    }
}

impl Source for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }

    fn to_object(&self) -> Map<String, Value> {
        self.iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect()
    }
}

impl Source for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn to_object(&self) -> Map<String, Value> {
        self.iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect()
    }
}

/// Another source narrowed to a fixed set of keys.
///
/// Keys outside the set read as unset and are left out of
/// [`Source::to_object`], so a schema that rejects unknown keys only sees the
/// ones it declares.
#[derive(Debug, Clone)]
pub struct Subset<S> {
    inner: S,
    keys: BTreeSet<String>,
}

impl<S: Source> Subset<S> {
    pub fn new<I, K>(inner: S, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            inner,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source> Source for Subset<S> {
    fn get(&self, key: &str) -> Option<String> {
        if self.keys.contains(key) {
            self.inner.get(key)
        } else {
            None
        }
    }

    fn to_object(&self) -> Map<String, Value> {
        self.keys
            .iter()
            .filter_map(|key| Some((key.clone(), Value::String(self.inner.get(key)?))))
            .collect()
    }
}

/// A source another owner may update while it is bound.
impl<S: Source> Source for RwLock<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.read().unwrap_or_else(PoisonError::into_inner).get(key)
    }

    fn to_object(&self) -> Map<String, Value> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .to_object()
    }
}

impl<S: Source + ?Sized> Source for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn to_object(&self) -> Map<String, Value> {
        (**self).to_object()
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn to_object(&self) -> Map<String, Value> {
        (**self).to_object()
    }
}
