use std::sync::{Mutex, PoisonError};

use lazyenv_schema::{Schema, ValidationFailure};
use serde::Serialize;
use serde_json::Value;

use crate::error::{EnvError, Result};
use crate::source::{ProcessEnv, Source};

/// A read-through view that validates a whole source with one schema.
///
/// The first access of any field parses the entire source; later accesses
/// reuse that result. A failed parse is not cached: the source is re-read and
/// re-parsed on the next access, so fixing it takes effect without
/// rebuilding the view.
///
/// [`valid`](Self::valid) and [`error`](Self::error) report the outcome
/// without failing; [`get`](Self::get) and [`value`](Self::value) propagate
/// it.
pub struct EnvView<S: Schema, Src = ProcessEnv> {
    schema: S,
    source: Src,
    result: Mutex<Option<S::Output>>,
}

impl<S: Schema> EnvView<S> {
    /// View the live process environment.
    pub fn new(schema: S) -> Self {
        Self::with_source(schema, ProcessEnv)
    }
}

impl<S: Schema, Src: Source> EnvView<S, Src> {
    /// View `source`. Nothing is read or parsed until first access.
    pub fn with_source(schema: S, source: Src) -> Self {
        Self {
            schema,
            source,
            result: Mutex::new(None),
        }
    }

    /// Run `f` on the parsed source, parsing it first if needed.
    pub fn with<R>(&self, f: impl FnOnce(&S::Output) -> R) -> Result<R> {
        let mut result = self.result.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parsed) = result.as_ref() {
            return Ok(f(parsed));
        }

        let input = Value::Object(self.source.to_object());
        let parsed = self.schema.parse(&input).map_err(|failure| {
            tracing::debug!(
                issues = failure.issues().len(),
                "environment failed validation"
            );
            EnvError::Object(failure)
        })?;
        tracing::debug!("environment validated");

        let output = f(&parsed);
        *result = Some(parsed);
        Ok(output)
    }

    /// Whether the source validates. Never fails.
    pub fn valid(&self) -> bool {
        self.with(|_| ()).is_ok()
    }

    /// The validation failure, or `None` when the source validates. Never fails.
    pub fn error(&self) -> Option<ValidationFailure> {
        match self.with(|_| ()) {
            Ok(()) => None,
            Err(EnvError::Object(failure)) => Some(failure),
            Err(other) => Some(ValidationFailure::new(other.to_string())),
        }
    }

    pub fn source(&self) -> &Src {
        &self.source
    }
}

impl<S, Src> EnvView<S, Src>
where
    S: Schema,
    S::Output: Clone,
    Src: Source,
{
    /// The whole parsed record.
    pub fn value(&self) -> Result<S::Output> {
        self.with(Clone::clone)
    }
}

impl<S, Src> EnvView<S, Src>
where
    S: Schema,
    S::Output: Serialize,
    Src: Source,
{
    /// Field `name` of the parsed record, or `None` if the record has no
    /// such field.
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        self.with(|parsed| {
            serde_json::to_value(parsed).map(|mut record| record.get_mut(name).map(Value::take))
        })?
        .map_err(|source| EnvError::Decode {
            key: name.to_string(),
            source,
        })
    }
}
