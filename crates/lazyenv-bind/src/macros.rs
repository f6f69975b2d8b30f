/// Declare a struct with one lazily validated field per environment key.
///
/// Each field gets a named accessor returning its [`FieldValidator`], so
/// reads and writes go through `get_value` / `set_value`. Construction never
/// parses.
///
/// ```
/// use lazyenv_bind::lazy_env;
/// use lazyenv_schema::{coerce, string, SchemaExt};
///
/// lazy_env! {
///     pub struct ServerEnv {
///         host: String = "HOST" => string().default("127.0.0.1"),
///         port: i64 = "PORT" => coerce::integer().min(1).max(65535),
///     }
/// }
///
/// let source = std::collections::BTreeMap::from([("PORT".to_string(), "8080".to_string())]);
/// let env = ServerEnv::from_source(&source);
/// assert_eq!(env.port().get_value().unwrap(), 8080);
/// assert_eq!(env.host().get_value().unwrap(), "127.0.0.1");
/// assert!(env.port().set_value("http").is_err());
/// assert_eq!(ServerEnv::KEYS, &["HOST", "PORT"]);
/// ```
///
/// [`FieldValidator`]: crate::FieldValidator
#[macro_export]
macro_rules! lazy_env {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty = $key:literal => $schema:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $field: $crate::FieldValidator<$crate::BoxedSchemaOf<$ty>>, )*
        }

        impl $name {
            /// Environment keys, in declaration order.
            $vis const KEYS: &'static [&'static str] = &[$($key),*];

            /// Capture every declared key from `source` without parsing.
            $vis fn from_source<Src: $crate::Source + ?Sized>(source: &Src) -> Self {
                Self {
                    $(
                        $field: $crate::FieldValidator::new(
                            source
                                .get($key)
                                .map_or($crate::__private::Value::Null, $crate::__private::Value::String),
                            ::std::boxed::Box::new($schema) as $crate::BoxedSchemaOf<$ty>,
                        ),
                    )*
                }
            }

            /// Capture every declared key from the process environment.
            $vis fn from_process_env() -> Self {
                Self::from_source(&$crate::ProcessEnv)
            }

            $(
                $(#[$field_meta])*
                $vis fn $field(&self) -> &$crate::FieldValidator<$crate::BoxedSchemaOf<$ty>> {
                    &self.$field
                }
            )*
        }
    };
}
