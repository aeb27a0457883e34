//! Type shape definitions.
//!
//! A [`TypeShape`] is the recursive, tagged description of a field's type.
//! Nested messages and union members are referenced by name, never by
//! resolved body, so a shape (and therefore a type hash) can be computed
//! without the whole program graph.

use serde::{Deserialize, Serialize};

/// Primitive type kinds.
///
/// `Decimal` is carried opaquely: the compiler never interprets decimal
/// values beyond threading their canonical string rendering through the
/// wire forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// UTF-8 string.
    String,

    /// Floating point number.
    Number,

    /// 64-bit signed integer.
    Int,

    /// Boolean.
    Bool,

    /// Arbitrary-precision decimal, opaque canonical string.
    Decimal,
}

impl PrimitiveKind {
    /// The schema-surface keyword for this primitive.
    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Decimal => "decimal",
        }
    }

    /// Parse a schema-surface keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "string" => Some(PrimitiveKind::String),
            "number" => Some(PrimitiveKind::Number),
            "int" => Some(PrimitiveKind::Int),
            "bool" => Some(PrimitiveKind::Bool),
            "decimal" => Some(PrimitiveKind::Decimal),
            _ => None,
        }
    }
}

/// Key kinds admitted by map-shaped fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKeyKind {
    /// String keys.
    String,

    /// Integer keys.
    Int,

    /// Boolean keys.
    Bool,
}

impl MapKeyKind {
    /// The schema-surface keyword for this key kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            MapKeyKind::String => "string",
            MapKeyKind::Int => "int",
            MapKeyKind::Bool => "bool",
        }
    }

    /// Parse a schema-surface keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "string" => Some(MapKeyKind::String),
            "int" => Some(MapKeyKind::Int),
            "bool" => Some(MapKeyKind::Bool),
            _ => None,
        }
    }
}

/// Recursive tagged type shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum TypeShape {
    /// A primitive.
    Primitive(PrimitiveKind),

    /// Ordered sequence of one element shape.
    Array(Box<TypeShape>),

    /// Keyed map.
    Map {
        key: MapKeyKind,
        value: Box<TypeShape>,
    },

    /// Unordered unique collection.
    Set(Box<TypeShape>),

    /// Another generated message type, by name.
    Nested(String),

    /// Discriminated union of message type names.
    Union(Vec<String>),

    /// A declared type parameter of the enclosing type.
    GenericParam(String),

    /// A branded primitive: the base kind refined by a named predicate.
    /// Exactly two authored type arguments; the disambiguating third is
    /// synthesized by the generator.
    Brand {
        base: PrimitiveKind,
        name: String,
    },
}

impl TypeShape {
    /// Shorthand for an array shape.
    pub fn array(element: TypeShape) -> Self {
        TypeShape::Array(Box::new(element))
    }

    /// Shorthand for a map shape.
    pub fn map(key: MapKeyKind, value: TypeShape) -> Self {
        TypeShape::Map {
            key,
            value: Box::new(value),
        }
    }

    /// Shorthand for a set shape.
    pub fn set(element: TypeShape) -> Self {
        TypeShape::Set(Box::new(element))
    }

    /// Whether this shape is a primitive or brand (single logical value).
    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeShape::Primitive(_) | TypeShape::Brand { .. })
    }

    /// Whether this shape is an array, map, or set.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            TypeShape::Array(_) | TypeShape::Map { .. } | TypeShape::Set(_)
        )
    }

    /// Every type name this shape refers to, in order of appearance.
    pub fn referenced_names(&self) -> Vec<&str> {
        match self {
            TypeShape::Primitive(_) | TypeShape::GenericParam(_) | TypeShape::Brand { .. } => {
                Vec::new()
            }
            TypeShape::Array(element) | TypeShape::Set(element) => element.referenced_names(),
            TypeShape::Map { value, .. } => value.referenced_names(),
            TypeShape::Nested(name) => vec![name.as_str()],
            TypeShape::Union(members) => members.iter().map(String::as_str).collect(),
        }
    }

    /// The canonical rendering folded into the type hash.
    ///
    /// Stable across every cosmetic property of the source: only the
    /// structure and referenced names appear.
    pub fn canonical(&self) -> String {
        match self {
            TypeShape::Primitive(kind) => kind.keyword().to_string(),
            TypeShape::Array(element) => format!("array<{}>", element.canonical()),
            TypeShape::Map { key, value } => {
                format!("map<{},{}>", key.keyword(), value.canonical())
            }
            TypeShape::Set(element) => format!("set<{}>", element.canonical()),
            TypeShape::Nested(name) => format!("nested:{}", name),
            TypeShape::Union(members) => format!("union:{}", members.join("|")),
            TypeShape::GenericParam(name) => format!("param:{}", name),
            TypeShape::Brand { base, name } => format!("brand<{},{}>", base.keyword(), name),
        }
    }
}
