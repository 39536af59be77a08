//! Error types for kernel operations.
//!
//! Misconfiguration (missing type metadata, missing schema, unregistered
//! permission) is deliberately *not* an error anywhere in this crate:
//! those paths degrade to a safe default. Only attribute misses and
//! invalid schema construction surface as `Err`.

/// Errors arising from field resolution or schema construction.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// No schema or subtype defines the requested field.
    ///
    /// Routinely handled upstream by falling back to other lookup
    /// mechanisms.
    #[error("attribute not found: {name}")]
    AttributeNotFound { name: String },

    /// A schema declared the same field twice.
    #[error("schema {schema} declares duplicate field {field}")]
    DuplicateField { schema: String, field: String },
}
