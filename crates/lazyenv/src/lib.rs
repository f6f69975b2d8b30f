//! Lazily validated environment variables.
//!
//! Declare a schema per key (or one for the whole environment) and read
//! values through it. A key is validated the first time it is read, so
//! variables the running code path never consults cost nothing and cannot
//! fail startup.
//!
//! # Crate Structure
//!
//! - [`schema`]: the `Schema` contract, scalar schemas, object and JSON Schema support
//! - [`bind`]: field-mode targets, whole-object views, and the `lazy_env!` macro
//!
//! ```
//! use lazyenv::{coerce, string, EnvView, ObjectSchema};
//! use std::collections::BTreeMap;
//!
//! let source = BTreeMap::from([("PORT".to_string(), "8080".to_string())]);
//! let env = EnvView::with_source(
//!     ObjectSchema::new()
//!         .field("PORT", coerce::integer())
//!         .field("HOST", string()),
//!     source,
//! );
//!
//! assert!(!env.valid());
//! assert!(env.error().unwrap().to_string().contains("HOST"));
//! ```

/// Re-export schema types.
pub mod schema {
    pub use lazyenv_schema::*;
}

/// Re-export binding types.
pub mod bind {
    pub use lazyenv_bind::*;
}

pub use lazyenv_bind::{
    bind, lazy_env, EnvError, EnvTarget, EnvView, FieldSpec, FieldValidator, ProcessEnv, Source,
    Subset,
};
pub use lazyenv_schema::{
    boolean, coerce, integer, number, one_of, string, JsonSchema, ObjectSchema, Schema,
    SchemaConfig, SchemaExt, ValidationFailure,
};
