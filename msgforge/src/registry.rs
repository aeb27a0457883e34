//! Runtime type registry.
//!
//! Hosts that need to dispatch on wire payloads dynamically (for example a
//! transport edge receiving envelopes of many types) register every
//! generated type once at startup; the registry is append-only and treated
//! as read-only afterwards. Instance checks go through per-type capability
//! functions rather than any per-module singleton identity.

use std::collections::HashMap;

use thiserror::Error;

/// Capabilities registered for one generated type.
#[derive(Debug, Clone, Copy)]
pub struct TypeEntry {
    /// Declared type name.
    pub type_name: &'static str,

    /// Wire type id (name or explicit override).
    pub type_id: &'static str,

    /// Content-addressed schema hash.
    pub type_hash: &'static str,

    /// Whether the type uses the compact encoding.
    pub compact: bool,

    /// Whether the given wire text is a payload of this type.
    pub is_instance: fn(&str) -> bool,
}

/// Error returned when a type id is registered twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type id `{0}` is already registered")]
pub struct DuplicateTypeId(pub String);

/// Append-only registry of generated types, keyed by wire type id.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: HashMap<&'static str, TypeEntry>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. Registration is append-only: a second entry for
    /// the same type id is rejected.
    pub fn register(&mut self, entry: TypeEntry) -> Result<(), DuplicateTypeId> {
        if self.entries.contains_key(entry.type_id) {
            return Err(DuplicateTypeId(entry.type_id.to_string()));
        }
        self.entries.insert(entry.type_id, entry);
        Ok(())
    }

    /// Look up a type by wire id.
    pub fn get(&self, type_id: &str) -> Option<&TypeEntry> {
        self.entries.get(type_id)
    }

    /// Whether a type id is registered.
    pub fn contains(&self, type_id: &str) -> bool {
        self.entries.contains_key(type_id)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over registered entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.values()
    }

    /// Resolve the concrete type of a wire payload.
    ///
    /// Tries the tagged envelope's `$type` first, then a compact
    /// discriminator prefix; the matched entry's own `is_instance` check
    /// confirms the result.
    pub fn resolve(&self, text: &str) -> Option<&TypeEntry> {
        if let Some(type_id) = crate::tagged::peek_type_id(text) {
            if let Some(entry) = self.get(&type_id) {
                if (entry.is_instance)(text) {
                    return Some(entry);
                }
            }
        }

        if let Some(type_id) = crate::compact::peek_discriminator(text) {
            if let Some(entry) = self.get(type_id) {
                if entry.compact && (entry.is_instance)(text) {
                    return Some(entry);
                }
            }
        }

        None
    }
}
