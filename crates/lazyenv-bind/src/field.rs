use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lazyenv_schema::{Schema, ValidationFailure};
use serde_json::Value;

/// One field's raw value, its schema, and the cached parse of that value.
///
/// Reads parse lazily and cache only successes, so a value that failed keeps
/// failing until it is replaced. Writes parse eagerly and are all-or-nothing.
///
/// The cache check, parse and store happen under one lock: concurrent first
/// reads parse once.
pub struct FieldValidator<S: Schema> {
    schema: S,
    state: Mutex<FieldState<S::Output>>,
}

struct FieldState<T> {
    raw: Value,
    cache: Option<T>,
}

impl<S: Schema> FieldValidator<S> {
    /// Wrap `raw` without parsing it. An absent value is [`Value::Null`].
    pub fn new(raw: impl Into<Value>, schema: S) -> Self {
        Self {
            schema,
            state: Mutex::new(FieldState {
                raw: raw.into(),
                cache: None,
            }),
        }
    }

    /// Replace the raw value after it parses. On failure nothing changes.
    pub fn set_value(&self, raw: impl Into<Value>) -> Result<(), ValidationFailure> {
        let raw = raw.into();
        let parsed = self.schema.parse(&raw)?;

        let mut state = self.lock();
        state.raw = raw;
        state.cache = Some(parsed);
        Ok(())
    }

    /// The last accepted raw value.
    pub fn raw_value(&self) -> Value {
        self.lock().raw.clone()
    }

    /// Whether the current raw value has been parsed successfully.
    pub fn is_cached(&self) -> bool {
        self.lock().cache.is_some()
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn into_raw_value(self) -> Value {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .raw
    }

    // State is replaced wholesale after a successful parse, never left
    // half-written, so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, FieldState<S::Output>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> FieldValidator<S>
where
    S: Schema,
    S::Output: Clone,
{
    /// The parsed value, parsing the raw value on first use.
    pub fn get_value(&self) -> Result<S::Output, ValidationFailure> {
        let mut state = self.lock();
        if let Some(cached) = &state.cache {
            tracing::trace!("field cache hit");
            return Ok(cached.clone());
        }

        tracing::trace!("parsing field");
        let parsed = self.schema.parse(&state.raw)?;
        state.cache = Some(parsed.clone());
        Ok(parsed)
    }
}

impl<S: Schema> fmt::Debug for FieldValidator<S> {
    // Raw values may be secrets.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("cached", &self.is_cached())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use lazyenv_schema::{coerce, string, SchemaExt};
    use serde_json::json;

    use super::*;

    /// Counts parses and delegates to a string schema.
    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl Schema for Counting {
        type Output = String;

        fn parse(&self, input: &Value) -> Result<String, ValidationFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            string().parse(input)
        }
    }

    fn counting(raw: Value) -> (FieldValidator<Counting>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let field = FieldValidator::new(
            raw,
            Counting {
                calls: Arc::clone(&calls),
            },
        );
        (field, calls)
    }

    #[test]
    fn construction_does_not_parse() {
        let (field, calls) = counting(json!(42));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!field.is_cached());
    }

    #[test]
    fn successful_read_is_cached() {
        let (field, calls) = counting(json!("hello"));

        assert_eq!(field.get_value().unwrap(), "hello");
        assert_eq!(field.get_value().unwrap(), "hello");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(field.is_cached());
    }

    #[test]
    fn failed_read_is_retried() {
        let (field, calls) = counting(Value::Null);

        assert!(field.get_value().is_err());
        assert!(field.get_value().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!field.is_cached());
    }

    #[test]
    fn write_parses_eagerly_and_replaces_cache() {
        let (field, calls) = counting(Value::Null);

        field.set_value("fixed").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(field.get_value().unwrap(), "fixed");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(field.raw_value(), json!("fixed"));
    }

    #[test]
    fn rejected_write_leaves_state_untouched() {
        let field = FieldValidator::new("cool", string());
        assert_eq!(field.get_value().unwrap(), "cool");

        let err = field.set_value(123).unwrap_err();
        assert_eq!(err.to_string(), "expected string, received number");
        assert_eq!(field.raw_value(), json!("cool"));
        assert_eq!(field.get_value().unwrap(), "cool");
    }

    #[test]
    fn rejected_write_keeps_an_unparsed_value_unparsed() {
        let (field, calls) = counting(json!("later"));

        assert!(field.set_value(false).is_err());
        assert!(!field.is_cached());
        assert_eq!(field.get_value().unwrap(), "later");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn coerces_on_read() {
        let field = FieldValidator::new("123", coerce::number());
        assert_eq!(field.get_value().unwrap(), 123.0);
    }

    #[test]
    fn concurrent_first_reads_parse_once() {
        let (field, calls) = counting(json!("shared"));
        let field = Arc::new(field);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let field = Arc::clone(&field);
                std::thread::spawn(move || field.get_value().unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "shared");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_parse_leaves_field_usable() {
        let armed = Arc::new(AtomicBool::new(true));
        let trigger = Arc::clone(&armed);
        let field = FieldValidator::new(
            "ok",
            string().map(move |text| {
                if trigger.swap(false, Ordering::SeqCst) {
                    panic!("transform panicked");
                }
                text
            }),
        );

        assert!(catch_unwind(AssertUnwindSafe(|| field.get_value())).is_err());
        assert!(field.state.is_poisoned());

        assert_eq!(field.get_value().unwrap(), "ok");
        field.set_value("next").unwrap();
        assert_eq!(field.get_value().unwrap(), "next");
        assert!(!armed.load(Ordering::SeqCst));
    }

    #[test]
    fn debug_does_not_print_raw_value() {
        let field = FieldValidator::new("s3cr3t", string());
        assert!(!format!("{field:?}").contains("s3cr3t"));
    }
}
