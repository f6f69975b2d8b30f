use lazyenv_schema::ValidationFailure;

/// Errors surfaced when reading or writing a bound environment.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// A bound key's raw value, or a value being written to it, failed validation.
    #[error("invalid value for {key}: {failure}")]
    Field {
        key: String,
        #[source]
        failure: ValidationFailure,
    },

    /// The environment as a whole failed validation.
    #[error("invalid environment: {0}")]
    Object(#[source] ValidationFailure),

    /// A validated value could not be decoded into the requested type.
    #[error("cannot decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl EnvError {
    /// The underlying validation failure, if this error is one.
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            EnvError::Field { failure, .. } | EnvError::Object(failure) => Some(failure),
            EnvError::Decode { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnvError>;
