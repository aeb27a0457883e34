//! Rust code generation.
//!
//! Turns sealed schemas plus their resolved validation rules into one
//! generated Rust module per compilation unit. Generated types follow the
//! immutable-value contract implemented by the `msgforge` runtime crate:
//! validated construction, a cached default instance, copy-producing
//! setters and no-op-preserving collection mutators, cached structural
//! hashing, and both wire codecs.

mod emitter;
mod types;

pub use emitter::emit_type;
pub use types::{method_name, union_enum_name};

use crate::ir::{CanonicalSchema, TypeShape};
use crate::resolver::ResolvedSchema;

/// One generated type in an output module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedItem {
    /// Declared schema name.
    pub name: String,

    /// Emitted Rust type name; differs from `name` for extendable types,
    /// which are emitted as `<Name>Base`.
    pub rust_name: String,

    /// Extension source path, when the type is extendable.
    pub extend_path: Option<String>,

    /// The type's content hash.
    pub type_hash: String,
}

/// A complete generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// The module source text.
    pub content: String,

    /// The emitted types, in declaration order.
    pub items: Vec<GeneratedItem>,
}

/// Generate a module for a compilation unit's schemas.
///
/// Schemas are emitted in declaration order; Rust items may reference each
/// other freely, so no dependency ordering is needed.
pub fn generate_module(pairs: &[(&CanonicalSchema, &ResolvedSchema)]) -> GeneratedOutput {
    let mut content = String::new();
    content.push_str("// Generated by msgforge. Do not edit manually.\n\n");
    content.push_str(&render_imports(pairs));

    let mut items = Vec::with_capacity(pairs.len());
    for (schema, rules) in pairs {
        let item = emitter::emit_type(schema, rules, &mut content);
        items.push(item);
    }

    GeneratedOutput { content, items }
}

/// The import block, trimmed to what the module actually uses.
fn render_imports(pairs: &[(&CanonicalSchema, &ResolvedSchema)]) -> String {
    let mut uses_map = false;
    let mut uses_set = false;
    let mut uses_compact = false;
    let mut uses_collections = false;

    for (schema, rules) in pairs {
        if schema.compact {
            uses_compact = true;
        }
        // Unions over compact members reach for the compact codec even
        // when this module declares no compact type of its own.
        for field_rules in &rules.fields {
            if let Some(guards) = &field_rules.union {
                if guards.iter().any(|g| g.compact) {
                    uses_compact = true;
                }
            }
        }
        for field in &schema.fields {
            visit_shapes(&field.shape, &mut |shape| match shape {
                TypeShape::Map { .. } => uses_map = true,
                TypeShape::Set(_) => uses_set = true,
                _ => {}
            });
            if field.shape.is_collection() && !field.optional && !field.nullable {
                uses_collections = true;
            }
        }
    }

    let mut out = String::new();
    match (uses_map, uses_set) {
        (true, true) => out.push_str("use std::collections::{BTreeMap, BTreeSet};\n"),
        (true, false) => out.push_str("use std::collections::BTreeMap;\n"),
        (false, true) => out.push_str("use std::collections::BTreeSet;\n"),
        (false, false) => {}
    }
    out.push_str("use std::sync::{Arc, OnceLock};\n\n");

    let mut runtime = vec!["tagged"];
    if uses_collections {
        runtime.insert(0, "collections");
    }
    if uses_compact {
        runtime.insert(runtime.len() - 1, "compact");
    }
    let mut names = vec![
        "DecodeError",
        "FieldSpec",
        "MapKey",
        "Message",
        "MessageDescriptor",
        "ValidationError",
        "ValidationIssues",
        "Value",
    ];
    if uses_compact {
        names.insert(0, "CompactMessage");
    }

    out.push_str(&format!(
        "use msgforge::{{\n    {},\n    {},\n}};\n\n",
        runtime.join(", "),
        names.join(", ")
    ));
    out
}

fn visit_shapes(shape: &TypeShape, visit: &mut impl FnMut(&TypeShape)) {
    visit(shape);
    match shape {
        TypeShape::Array(element) | TypeShape::Set(element) => visit_shapes(element, visit),
        TypeShape::Map { value, .. } => visit_shapes(value, visit),
        _ => {}
    }
}
