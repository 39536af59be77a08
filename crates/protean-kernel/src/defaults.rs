//! Schema-backed attribute fallback.
//!
//! When an attribute is not found by normal lookup, the active schema
//! (and its subtype schemas, in registry order) may still define a field
//! with that name; resolution then yields the field's declared default.
//! Every hit hands back a deep copy — defaults are shared values, and a
//! caller mutating a returned sequence in place must not corrupt the
//! default seen by every other instance.

use crate::cache::SchemaCache;
use crate::error::KernelError;
use serde_json::Value;

/// Names reserved for core object-model hooks; resolution never touches
/// them so the fallback cannot interfere with the host's own protocol.
pub const RESERVED_PREFIX: &str = "__";

/// Resolve `name` to a fresh copy of a schema-declared default.
///
/// The primary schema wins over subtypes; subtypes are scanned in
/// registry order. Untyped carriers, unknown names, and reserved names
/// all fail with [`KernelError::AttributeNotFound`].
pub fn default_for(
    schemas: &dyn SchemaCache,
    type_id: Option<&str>,
    name: &str,
) -> Result<Value, KernelError> {
    if name.starts_with(RESERVED_PREFIX) {
        return Err(KernelError::AttributeNotFound {
            name: name.to_string(),
        });
    }

    let Some(type_id) = type_id else {
        return Err(KernelError::AttributeNotFound {
            name: name.to_string(),
        });
    };

    if let Some(schema) = schemas.get(type_id)
        && let Some(field) = schema.field(name)
    {
        return Ok(field.default.clone());
    }

    for subtype in schemas.subtypes(type_id).iter() {
        if let Some(field) = subtype.field(name) {
            return Ok(field.default.clone());
        }
    }

    Err(KernelError::AttributeNotFound {
        name: name.to_string(),
    })
}
