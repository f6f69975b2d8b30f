use std::fmt;

use lazyenv_bind::EnvError;
use lazyenv_schema::SchemaError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::LoadFailed(_) => CliError::new(USAGE, format!("{context}: {err}")),
        SchemaError::CompileFailed(_) | SchemaError::InvalidJson(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn env_error(context: &str, err: EnvError) -> CliError {
    match err {
        EnvError::Field { .. } | EnvError::Object(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        EnvError::Decode { .. } => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}
