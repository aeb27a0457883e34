//! Project-wide declared-type-name registry.
//!
//! Built during an initial discovery pass over every input file, before any
//! file is fully compiled; afterwards it is read-only. This is the only
//! state shared across compilation units, and it exists so forward
//! references to types declared in other files can be resolved and union
//! members classified.

use std::collections::BTreeMap;

use crate::ir::WrapperKind;

/// Discovery-pass facts about one declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    /// Declared type name.
    pub name: String,

    /// Wrapper kind.
    pub wrapper: WrapperKind,

    /// Whether the type is compact-encoded.
    pub compact: bool,
}

/// Append-only registry of declared type names.
#[derive(Debug, Clone, Default)]
pub struct TypeNameRegistry {
    entries: BTreeMap<String, DeclaredType>,
}

impl TypeNameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declared type. Returns the previously registered entry
    /// when the name is already taken (a project-level duplicate).
    pub fn register(&mut self, entry: DeclaredType) -> Option<DeclaredType> {
        if let Some(existing) = self.entries.get(&entry.name) {
            return Some(existing.clone());
        }
        self.entries.insert(entry.name.clone(), entry);
        None
    }

    /// Look up a declared type by name.
    pub fn get(&self, name: &str) -> Option<&DeclaredType> {
        self.entries.get(name)
    }

    /// Whether a name is declared anywhere in the project.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether a name is declared and compact-encoded.
    pub fn is_compact(&self, name: &str) -> bool {
        self.get(name).map(|t| t.compact).unwrap_or(false)
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over declared types in name order.
    pub fn declared(&self) -> impl Iterator<Item = &DeclaredType> {
        self.entries.values()
    }
}
