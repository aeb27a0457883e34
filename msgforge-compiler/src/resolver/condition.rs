//! Structured validation conditions.
//!
//! Validator and brand registrations contribute [`Condition`] values
//! directly; nothing is rendered to text and re-parsed. Rendering to a
//! target-language expression happens exactly once, in the code generator,
//! via [`Condition::render`].

use serde::{Deserialize, Serialize};

/// Comparison operators used by range and length conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `==`
    Eq,
}

impl CompareOp {
    /// The Rust operator token.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Eq => "==",
        }
    }
}

/// A numeric bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Bound {
    /// Integer bound.
    Int(i64),

    /// Floating point bound.
    Float(f64),
}

impl Bound {
    /// Render as a Rust literal against the given numeric field kind.
    pub fn render(&self, float_context: bool) -> String {
        match self {
            Bound::Int(value) if float_context => format!("{}_f64", value),
            Bound::Int(value) => format!("{}_i64", value),
            Bound::Float(value) => format!("{}_f64", value),
        }
    }

    /// Render for error message templates.
    pub fn display(&self) -> String {
        match self {
            Bound::Int(value) => value.to_string(),
            Bound::Float(value) => value.to_string(),
        }
    }
}

/// A single boolean condition over a field's runtime value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Condition {
    /// Numeric comparison against a bound.
    Compare { op: CompareOp, bound: Bound },

    /// Length comparison for strings and collections.
    LengthCompare { op: CompareOp, len: usize },

    /// Regex match for strings.
    Matches { pattern: String },

    /// String prefix check.
    StartsWith { prefix: String },

    /// String suffix check.
    EndsWith { suffix: String },

    /// Non-emptiness for strings and collections.
    NonEmpty,

    /// The number has no fractional part.
    IsInteger,

    /// Conjunction.
    All { conditions: Vec<Condition> },
}

impl Condition {
    /// Render as a Rust boolean expression over `value_expr`.
    ///
    /// `float_context` selects literal suffixes for numeric bounds;
    /// `value_expr` must evaluate to the field's runtime value (a number
    /// for numeric conditions, `&str` for string conditions, a collection
    /// for length conditions).
    pub fn render(&self, value_expr: &str, float_context: bool) -> String {
        match self {
            Condition::Compare { op, bound } => {
                format!("{} {} {}", value_expr, op.symbol(), bound.render(float_context))
            }
            Condition::LengthCompare { op, len } => {
                format!("{}.len() {} {}", value_expr, op.symbol(), len)
            }
            Condition::Matches { pattern } => {
                format!("msgforge::pattern::matches_pattern({:?}, {})", pattern, value_expr)
            }
            Condition::StartsWith { prefix } => {
                format!("{}.starts_with({:?})", value_expr, prefix)
            }
            Condition::EndsWith { suffix } => {
                format!("{}.ends_with({:?})", value_expr, suffix)
            }
            Condition::NonEmpty => format!("!{}.is_empty()", value_expr),
            Condition::IsInteger => format!("{}.fract() == 0.0", value_expr),
            Condition::All { conditions } => {
                let parts: Vec<String> = conditions
                    .iter()
                    .map(|c| format!("({})", c.render(value_expr, float_context)))
                    .collect();
                parts.join(" && ")
            }
        }
    }
}

/// One validator contribution: a condition plus its failure message and
/// stable error code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// The boolean condition that must hold.
    pub condition: Condition,

    /// Failure message.
    pub message: String,

    /// Stable error code, e.g. `"range.min"`.
    pub code: String,
}

impl Check {
    /// Create a check.
    pub fn new(condition: Condition, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            condition,
            message: message.into(),
            code: code.into(),
        }
    }
}
