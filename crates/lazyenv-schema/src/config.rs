/// Controls how JSON Schema documents are compiled and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaConfig {
    /// When true, object schemas reject additional properties not in the schema.
    pub strict_mode: bool,
    /// When true, string inputs are converted to the primitive type the
    /// schema declares (`"8080"` to `8080` for `"type": "integer"`) before
    /// validation.
    pub coerce_types: bool,
    /// Maximum bytes allowed for a schema file.
    pub max_schema_file_size: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            coerce_types: true,
            max_schema_file_size: 256 * 1024,
        }
    }
}
