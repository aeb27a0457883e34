//! Mapping from type shapes to emitted Rust types and expressions.

use convert_case::{Case, Casing};

use crate::ir::{MapKeyKind, PrimitiveKind, TypeShape};

/// The Rust storage type for a shape.
///
/// `owner` is the Rust name of the enclosing generated type, used to name
/// per-field union enums; `field` is the schema field name.
pub fn storage_type(shape: &TypeShape, owner: &str, field: &str) -> String {
    match shape {
        TypeShape::Primitive(kind) | TypeShape::Brand { base: kind, .. } => {
            primitive_type(*kind).to_string()
        }
        TypeShape::Array(element) => format!("Vec<{}>", storage_type(element, owner, field)),
        TypeShape::Set(element) => format!("BTreeSet<{}>", storage_type(element, owner, field)),
        TypeShape::Map { key, value } => format!(
            "BTreeMap<{}, {}>",
            map_key_type(*key),
            storage_type(value, owner, field)
        ),
        TypeShape::Nested(name) => name.clone(),
        TypeShape::Union(_) => union_enum_name(owner, field),
        TypeShape::GenericParam(name) => name.clone(),
    }
}

/// The Rust type of a primitive shape.
pub fn primitive_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "String",
        PrimitiveKind::Number => "f64",
        PrimitiveKind::Int => "i64",
        PrimitiveKind::Bool => "bool",
        // Decimals are opaque canonical strings; the arithmetic runtime is
        // an external collaborator.
        PrimitiveKind::Decimal => "String",
    }
}

/// The Rust type of a map key kind.
pub fn map_key_type(kind: MapKeyKind) -> &'static str {
    match kind {
        MapKeyKind::String => "String",
        MapKeyKind::Int => "i64",
        MapKeyKind::Bool => "bool",
    }
}

/// Whether the storage type is `Copy` (passed and returned by value).
pub fn is_copy(shape: &TypeShape) -> bool {
    matches!(
        shape,
        TypeShape::Primitive(PrimitiveKind::Number | PrimitiveKind::Int | PrimitiveKind::Bool)
            | TypeShape::Brand {
                base: PrimitiveKind::Number | PrimitiveKind::Int | PrimitiveKind::Bool,
                ..
            }
    )
}

/// Whether the storage type implements `Default`, which decides if the
/// props struct can derive it and the default instance can be built from
/// `Props::default()`.
pub fn is_defaultable(shape: &TypeShape) -> bool {
    match shape {
        TypeShape::Primitive(_) | TypeShape::Brand { .. } => true,
        TypeShape::Array(_) | TypeShape::Set(_) | TypeShape::Map { .. } => true,
        TypeShape::Nested(_) | TypeShape::Union(_) | TypeShape::GenericParam(_) => false,
    }
}

/// Accessor return type and expression for a field.
///
/// `expr` is the storage access path, e.g. `self.inner.x`.
pub fn accessor(shape: &TypeShape, owner: &str, field: &str, expr: &str) -> (String, String) {
    if is_copy(shape) {
        return (storage_type(shape, owner, field), expr.to_string());
    }
    match shape {
        TypeShape::Primitive(PrimitiveKind::String | PrimitiveKind::Decimal)
        | TypeShape::Brand {
            base: PrimitiveKind::String | PrimitiveKind::Decimal,
            ..
        } => ("&str".to_string(), format!("&{}", expr)),
        TypeShape::Array(element) => (
            format!("&[{}]", storage_type(element, owner, field)),
            format!("&{}", expr),
        ),
        other => (
            format!("&{}", storage_type(other, owner, field)),
            format!("&{}", expr),
        ),
    }
}

/// The Rust method-name fragment for a schema field name.
pub fn method_name(field: &str) -> String {
    field.to_case(Case::Snake)
}

/// The per-field union enum name, e.g. `DrawingShape`.
pub fn union_enum_name(owner: &str, field: &str) -> String {
    format!("{}{}", owner, field.to_case(Case::Pascal))
}

/// The screaming-snake prefix for per-type consts, e.g. `POINT`.
pub fn const_prefix(rust_name: &str) -> String {
    rust_name.to_case(Case::UpperSnake)
}
