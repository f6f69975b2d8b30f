//! Scalar schemas.
//!
//! The plain constructors ([`string`], [`number`], [`boolean`]) accept only
//! values of their own JSON type. The [`coerce`] constructors also accept
//! the string forms found in environment variables.

use serde_json::{Number, Value};

use crate::error::ValidationFailure;
use crate::schema::Schema;

/// Strings, optionally length-bounded.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    coerce: bool,
    min_len: Option<usize>,
    max_len: Option<usize>,
}

impl StringSchema {
    /// Reject strings shorter than `len` characters.
    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Reject strings longer than `len` characters.
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Reject the empty string.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }
}

impl Schema for StringSchema {
    type Output = String;

    fn parse(&self, input: &Value) -> Result<String, ValidationFailure> {
        let text = match input {
            Value::String(text) => text.clone(),
            Value::Number(number) if self.coerce => number.to_string(),
            Value::Bool(flag) if self.coerce => flag.to_string(),
            other => return Err(ValidationFailure::expected("string", other)),
        };

        let len = text.chars().count();
        if let Some(min) = self.min_len {
            if len < min {
                return Err(ValidationFailure::new(format!(
                    "string must contain at least {min} character(s)"
                )));
            }
        }
        if let Some(max) = self.max_len {
            if len > max {
                return Err(ValidationFailure::new(format!(
                    "string must contain at most {max} character(s)"
                )));
            }
        }

        Ok(text)
    }
}

/// Finite floating point numbers, optionally range-bounded.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    coerce: bool,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumberSchema {
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

impl Schema for NumberSchema {
    type Output = f64;

    fn parse(&self, input: &Value) -> Result<f64, ValidationFailure> {
        let number = match input {
            Value::Number(number) => number.as_f64(),
            Value::String(text) if self.coerce => parse_float(text),
            Value::Bool(flag) if self.coerce => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        };

        let number = number.ok_or_else(|| ValidationFailure::expected("number", input))?;
        check_range(number, self.min, self.max)?;
        Ok(number)
    }
}

/// 64-bit signed integers, optionally range-bounded.
#[derive(Debug, Clone, Default)]
pub struct IntegerSchema {
    coerce: bool,
    min: Option<i64>,
    max: Option<i64>,
}

impl IntegerSchema {
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl Schema for IntegerSchema {
    type Output = i64;

    fn parse(&self, input: &Value) -> Result<i64, ValidationFailure> {
        let integer = match input {
            Value::Number(number) => number.as_i64(),
            Value::String(text) if self.coerce => text.trim().parse::<i64>().ok(),
            _ => None,
        };

        let integer = integer.ok_or_else(|| ValidationFailure::expected("integer", input))?;
        if self.min.is_some_and(|min| integer < min) || self.max.is_some_and(|max| integer > max)
        {
            return Err(ValidationFailure::new(format!(
                "integer {integer} is out of range{}",
                describe_range(self.min, self.max)
            )));
        }
        Ok(integer)
    }
}

/// Booleans. The coercing form accepts the usual environment spellings.
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    coerce: bool,
}

impl Schema for BooleanSchema {
    type Output = bool;

    fn parse(&self, input: &Value) -> Result<bool, ValidationFailure> {
        match input {
            Value::Bool(flag) => Ok(*flag),
            Value::String(text) if self.coerce => {
                parse_flag(text).ok_or_else(|| ValidationFailure::expected("boolean", input))
            }
            other => Err(ValidationFailure::expected("boolean", other)),
        }
    }
}

/// One string out of a fixed set.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    variants: Vec<String>,
}

impl Schema for EnumSchema {
    type Output = String;

    fn parse(&self, input: &Value) -> Result<String, ValidationFailure> {
        match input {
            Value::String(text) if self.variants.iter().any(|v| v == text) => Ok(text.clone()),
            Value::String(text) => Err(ValidationFailure::new(format!(
                "invalid value {text:?}, expected one of: {}",
                self.variants.join(", ")
            ))),
            other => Err(ValidationFailure::expected("string", other)),
        }
    }
}

pub fn string() -> StringSchema {
    StringSchema::default()
}

pub fn number() -> NumberSchema {
    NumberSchema::default()
}

pub fn integer() -> IntegerSchema {
    IntegerSchema::default()
}

pub fn boolean() -> BooleanSchema {
    BooleanSchema::default()
}

/// A string restricted to `variants`.
pub fn one_of<I, S>(variants: I) -> EnumSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumSchema {
        variants: variants.into_iter().map(Into::into).collect(),
    }
}

/// Coercing constructors.
pub mod coerce {
    use super::{BooleanSchema, IntegerSchema, NumberSchema, StringSchema};

    /// Numbers and booleans are rendered to their string form.
    pub fn string() -> StringSchema {
        StringSchema {
            coerce: true,
            ..StringSchema::default()
        }
    }

    /// Numeric strings are parsed; `true`/`false` become `1`/`0`.
    pub fn number() -> NumberSchema {
        NumberSchema {
            coerce: true,
            ..NumberSchema::default()
        }
    }

    pub fn integer() -> IntegerSchema {
        IntegerSchema {
            coerce: true,
            ..IntegerSchema::default()
        }
    }

    /// `true/1/yes/on` and `false/0/no/off`, case-insensitive.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema { coerce: true }
    }
}

pub(crate) fn parse_float(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render `number` as JSON, as an integer when it is whole and fits `i64`.
pub(crate) fn number_value(number: f64) -> Option<Value> {
    if number.fract() == 0.0 && number >= i64::MIN as f64 && number < i64::MAX as f64 {
        return Some(Value::from(number as i64));
    }
    Number::from_f64(number).map(Value::Number)
}

pub(crate) fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn check_range(number: f64, min: Option<f64>, max: Option<f64>) -> Result<(), ValidationFailure> {
    if min.is_some_and(|min| number < min) || max.is_some_and(|max| number > max) {
        return Err(ValidationFailure::new(format!(
            "number {number} is out of range{}",
            describe_range(min, max)
        )));
    }
    Ok(())
}

fn describe_range<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(" [{min}, {max}]"),
        (Some(min), None) => format!(" (min {min})"),
        (None, Some(max)) => format!(" (max {max})"),
        (None, None) => String::new(),
    }
}
