//! Import-ID parsing
//!
//! Existing cluster objects are imported with a `"namespace/name"` composite
//! identifier. Any other shape is rejected.

use crate::error::{CoreError, Result};

/// Split an import ID into `(namespace, name)`.
///
/// The ID must contain exactly one `/` and both segments must be non-empty.
pub fn parse_import_id(id: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = id.split('/').collect();
    match parts.as_slice() {
        [namespace, name] if !namespace.is_empty() && !name.is_empty() => {
            Ok((namespace.to_string(), name.to_string()))
        }
        _ => Err(CoreError::InvalidImportId { id: id.to_string() }),
    }
}
