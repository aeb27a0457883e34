//! Canonical schema definitions.

use serde::{Deserialize, Serialize};

use super::field::FieldDescriptor;
use super::shape::TypeShape;

/// The wrapper kind of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WrapperKind {
    /// A plain message.
    Plain,

    /// A database-table-backed message; downstream tooling reads extra
    /// metadata from this, the compiler itself treats it like a message.
    Table,

    /// A request/response pair: the braced field list is the request body,
    /// `response` names the response type.
    Endpoint {
        /// Response type name.
        response: String,
    },
}

impl WrapperKind {
    /// Discriminator folded into the type hash.
    pub fn canonical(&self) -> String {
        match self {
            WrapperKind::Plain => "plain".to_string(),
            WrapperKind::Table => "table".to_string(),
            WrapperKind::Endpoint { response } => format!("endpoint:{}", response),
        }
    }
}

/// A declared type parameter with its mandatory constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParameter {
    /// Parameter name, e.g. `"T"`.
    pub name: String,

    /// Constraint shape. Never absent: an unconstrained parameter is a
    /// compile error in both front ends.
    pub constraint: TypeShape,

    /// True when the constraint resolves to a declared message type,
    /// meaning generated code must be able to construct instances of it.
    #[serde(default)]
    pub requires_instantiation: bool,
}

impl TypeParameter {
    /// Create a parameter with the given constraint.
    pub fn new(name: impl Into<String>, constraint: TypeShape) -> Self {
        Self {
            name: name.into(),
            constraint,
            requires_instantiation: false,
        }
    }

    /// Set the instantiation requirement.
    pub fn with_requires_instantiation(mut self, requires: bool) -> Self {
        self.requires_instantiation = requires;
        self
    }
}

/// Reference to a user-authored extension source.
///
/// Presence implies the type carries the generate marker; the generated
/// implementation is emitted under `<Name>Base` and the file at `path` is
/// expected to export the public `<Name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendInfo {
    /// Path of the user-authored extension source, as written in the
    /// directive.
    pub path: String,
}

impl ExtendInfo {
    /// Create an extension reference.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// The canonical, validated description of one declared type.
///
/// Built once per compilation unit by whichever front end parsed the
/// declaration, then read immutably by the resolver, the hash computer,
/// and the generator. Both front ends produce bit-identical values for
/// equivalent input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSchema {
    /// Declared type name.
    pub name: String,

    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,

    /// Type parameters in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParameter>,

    /// Wrapper kind.
    pub wrapper: WrapperKind,

    /// Whether the type uses the compact encoding.
    #[serde(default)]
    pub compact: bool,

    /// Explicit wire type-id override, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,

    /// Extension reference, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extend: Option<ExtendInfo>,

    /// Content-addressed schema hash, `"sha256:<hex>"`. Filled by the
    /// lowering step that seals the schema.
    pub hash: String,
}

impl CanonicalSchema {
    /// The wire type id: the explicit override when present, the type name
    /// otherwise.
    pub fn wire_type_id(&self) -> &str {
        self.type_id.as_deref().unwrap_or(&self.name)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a type parameter by name.
    pub fn type_param(&self, name: &str) -> Option<&TypeParameter> {
        self.type_params.iter().find(|p| p.name == name)
    }

    /// Whether the type declares any type parameters.
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}
