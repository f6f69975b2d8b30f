//! Lazy, on-access validation of environment variables.
//!
//! Two ways to bind a schema to a key-value source:
//!
//! - **Field mode**: [`EnvTarget::bind`] attaches one [`FieldValidator`] per
//!   declared key. A key is parsed the first time it is read and re-validated
//!   on every write; keys that are never read are never parsed. The
//!   [`lazy_env!`] macro builds the same thing as a typed struct.
//! - **Whole-object mode**: [`EnvView`] parses the entire source with one
//!   schema on first access and exposes [`EnvView::valid`] /
//!   [`EnvView::error`] status queries that never fail.
//!
//! Successful parses are cached. Failures are not: the next access parses
//! again, so a corrected value is picked up without rebinding.
//!
//! ```
//! use lazyenv_bind::{EnvTarget, FieldSpec};
//! use lazyenv_schema::{coerce, string};
//!
//! let mut target: EnvTarget = [("PORT", "8080")].into_iter().collect();
//! target.bind(
//!     FieldSpec::new()
//!         .field("PORT", coerce::integer())
//!         .field("TOKEN", string()),
//! );
//!
//! assert_eq!(target.get_as::<u16>("PORT").unwrap(), 8080);
//! assert!(target.get("TOKEN").is_err());
//! ```

mod macros;

pub mod error;
pub mod field;
pub mod source;
pub mod target;
pub mod view;

pub use error::{EnvError, Result};
pub use field::FieldValidator;
pub use lazyenv_schema::BoxedSchemaOf;
pub use source::{ProcessEnv, Source, Subset};
pub use target::{bind, EnvTarget, FieldSpec};
pub use view::EnvView;

#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value;
}
