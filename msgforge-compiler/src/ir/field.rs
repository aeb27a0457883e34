//! Field descriptor definitions.

use serde::{Deserialize, Serialize};

use super::shape::TypeShape;

/// A literal argument to a validator reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ValidatorArg {
    /// Integer literal.
    Int(i64),

    /// Floating point literal.
    Float(f64),

    /// String literal.
    Str(String),
}

impl ValidatorArg {
    /// The argument as a float, when numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ValidatorArg::Int(i) => Some(*i as f64),
            ValidatorArg::Float(f) => Some(*f),
            ValidatorArg::Str(_) => None,
        }
    }

    /// The argument as a non-negative integer, when it is one.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            ValidatorArg::Int(i) if *i >= 0 => Some(*i as usize),
            _ => None,
        }
    }

    /// The argument as a string, when it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValidatorArg::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Render for diagnostics.
    pub fn render(&self) -> String {
        match self {
            ValidatorArg::Int(i) => i.to_string(),
            ValidatorArg::Float(f) => f.to_string(),
            ValidatorArg::Str(s) => format!("{:?}", s),
        }
    }
}

/// A reference to a registered validator, with its literal arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorRef {
    /// Registered validator name, e.g. `"min"` or `"matches"`.
    pub name: String,

    /// Literal arguments in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ValidatorArg>,
}

impl ValidatorRef {
    /// Create a validator reference.
    pub fn new(name: impl Into<String>, args: Vec<ValidatorArg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// One field of a message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within the type.
    pub name: String,

    /// Wire tag, unique and positive when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<u32>,

    /// The field's type shape.
    pub shape: TypeShape,

    /// Whether the field may be omitted.
    #[serde(default)]
    pub optional: bool,

    /// Whether the field admits an explicit null.
    #[serde(default)]
    pub nullable: bool,

    /// Validator references in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorRef>,
}

impl FieldDescriptor {
    /// Create a required field with the given name and shape.
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            tag: None,
            shape,
            optional: false,
            nullable: false,
            validators: Vec::new(),
        }
    }

    /// Set the wire tag.
    pub fn with_tag(mut self, tag: u32) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Mark as optional.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Mark as nullable.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Attach validator references.
    pub fn with_validators(mut self, validators: Vec<ValidatorRef>) -> Self {
        self.validators = validators;
        self
    }
}
