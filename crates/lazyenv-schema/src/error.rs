use std::fmt;

/// One reason a value was rejected, located by key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Keys leading to the rejected value. Empty for the value itself.
    pub path: Vec<String>,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

/// A value did not conform to its schema.
///
/// Always carries at least one [`Issue`]. Object schemas collect every
/// failing key into a single failure instead of stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    issues: Vec<Issue>,
}

impl ValidationFailure {
    /// Failure with a single issue at the root path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            issues: vec![Issue {
                path: Vec::new(),
                message: message.into(),
            }],
        }
    }

    /// Failure with a single "expected X, received Y" issue.
    pub fn expected(expected: &str, received: &serde_json::Value) -> Self {
        Self::new(format!(
            "expected {expected}, received {}",
            crate::type_name(received)
        ))
    }

    /// Build from issues collected elsewhere. Returns `None` when empty.
    pub fn from_issues(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self { issues })
        }
    }

    /// Prefix every issue path with `key`.
    pub fn at(mut self, key: &str) -> Self {
        for issue in &mut self.issues {
            issue.path.insert(0, key.to_string());
        }
        self
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Errors that can occur while building a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file could not be loaded.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// The schema could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// The schema document is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
