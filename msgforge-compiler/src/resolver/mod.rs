//! Validator and brand resolution.
//!
//! Takes a sealed [`CanonicalSchema`] and produces per-field symbolic
//! condition trees: each validator or brand registration contributes a
//! structured [`Check`] (condition, message, error code), checks compose
//! with logical AND within a field, and optional/nullable fields have
//! their checks applied only when a value is present. Union fields instead
//! yield an ordered guard list evaluated first-match at decode time.

mod builtins;
mod condition;

pub use condition::{Bound, Check, CompareOp, Condition};

use std::collections::BTreeMap;

use crate::diagnostics::{Diagnostic, DiagnosticSet};
use crate::ir::{CanonicalSchema, PrimitiveKind, TypeShape, ValidatorRef};
use crate::registry::TypeNameRegistry;
use crate::suggest::suggest_similar;

/// What kind of field values a validator can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    /// Numbers and integers.
    Numeric,

    /// Strings (including string-based brands).
    Text,

    /// Anything with a length: strings and collections.
    Sized,

    /// Any field.
    Any,
}

/// A named validator: given a reference with its literal arguments, it
/// produces a structured check or an arity/argument error.
pub struct ValidatorRegistration {
    /// Registered name.
    pub name: String,

    /// What shapes the validator applies to.
    pub applies: Applicability,

    /// Build the check from a reference.
    pub build: Box<dyn Fn(&ValidatorRef) -> Result<Check, String> + Send + Sync>,
}

impl ValidatorRegistration {
    /// Create a registration.
    pub fn new(
        name: impl Into<String>,
        applies: Applicability,
        build: impl Fn(&ValidatorRef) -> Result<Check, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            applies,
            build: Box::new(build),
        }
    }
}

impl std::fmt::Debug for ValidatorRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistration")
            .field("name", &self.name)
            .field("applies", &self.applies)
            .finish()
    }
}

/// Name-keyed validator registry.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    entries: BTreeMap<String, ValidatorRegistration>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for registration in builtins::builtin_validators() {
            registry.register(registration);
        }
        registry
    }

    /// Register a validator, replacing any previous entry of the same name.
    pub fn register(&mut self, registration: ValidatorRegistration) {
        self.entries.insert(registration.name.clone(), registration);
    }

    /// Look up a validator by name.
    pub fn get(&self, name: &str) -> Option<&ValidatorRegistration> {
        self.entries.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// A registered brand: a base primitive refined by a fixed check list.
///
/// The schema surface gives brands exactly two type arguments (base kind
/// and brand name); the disambiguating third parameter of the source
/// system is synthesized by the generator and never appears here.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandRegistration {
    /// Brand name as written in `brand<base, Name>`.
    pub name: String,

    /// Base primitive the brand refines.
    pub base: PrimitiveKind,

    /// Checks every branded value must satisfy.
    pub checks: Vec<Check>,
}

impl BrandRegistration {
    /// Create a brand registration.
    pub fn new(name: impl Into<String>, base: PrimitiveKind, checks: Vec<Check>) -> Self {
        Self {
            name: name.into(),
            base,
            checks,
        }
    }
}

/// Name-keyed brand registry.
#[derive(Debug, Default)]
pub struct BrandRegistry {
    entries: BTreeMap<String, BrandRegistration>,
}

impl BrandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a brand, replacing any previous entry of the same name.
    pub fn register(&mut self, registration: BrandRegistration) {
        self.entries.insert(registration.name.clone(), registration);
    }

    /// Look up a brand by name.
    pub fn get(&self, name: &str) -> Option<&BrandRegistration> {
        self.entries.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// How an unmatched union value is treated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Unmatched union values are hard construction/decode errors.
    #[default]
    Strict,

    /// Unmatched union values are collected as soft diagnostics by
    /// `validate_all`; decoding still cannot materialize a value.
    Lenient,
}

/// One ordered union branch: the type guard plus branch-specific checks.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionGuard {
    /// Member type name.
    pub member: String,

    /// Whether the member is compact-encoded (guards on the discriminator
    /// prefix rather than the envelope type id).
    pub compact: bool,

    /// Branch-specific checks.
    pub checks: Vec<Check>,
}

/// The resolved validation rules for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    /// Field name.
    pub field: String,

    /// True for optional/nullable fields: checks apply only when a value
    /// is present.
    pub guard_presence: bool,

    /// Whether numeric bounds render in floating point context.
    pub float_context: bool,

    /// AND-composed checks in contribution order (brand checks first,
    /// then declared validators).
    pub checks: Vec<Check>,

    /// Ordered union guards, for union-shaped fields.
    pub union: Option<Vec<UnionGuard>>,
}

/// The resolved validation rules for one type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    /// Type name.
    pub type_name: String,

    /// Union no-match policy.
    pub mode: ResolveMode,

    /// Per-field rules in field order.
    pub fields: Vec<FieldRules>,
}

impl ResolvedSchema {
    /// Look up rules for a field.
    pub fn field(&self, name: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|f| f.field == name)
    }
}

/// Resolve a schema's validator and brand references.
///
/// Returns `None` (plus diagnostics) when any reference fails to resolve;
/// per spec there is no partial output for a failed type.
pub fn resolve(
    schema: &CanonicalSchema,
    validators: &ValidatorRegistry,
    brands: &BrandRegistry,
    types: &TypeNameRegistry,
    mode: ResolveMode,
) -> (Option<ResolvedSchema>, DiagnosticSet) {
    let mut diagnostics = DiagnosticSet::new();
    let mut fields = Vec::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let mut checks = Vec::new();

        // Brand checks come first: the brand's refinement is part of the
        // field's type, declared validators narrow it further.
        if let TypeShape::Brand { base, name } = &field.shape {
            match brands.get(name) {
                Some(registration) => {
                    if registration.base != *base {
                        diagnostics.push(Diagnostic::error(
                            "resolver.brand-base",
                            format!(
                                "brand `{}` refines {}, but field `{}` declares base {}",
                                name,
                                registration.base.keyword(),
                                field.name,
                                base.keyword()
                            ),
                        ));
                    }
                    checks.extend(registration.checks.iter().cloned());
                }
                None => {
                    let mut diagnostic = Diagnostic::error(
                        "resolver.unknown-brand",
                        format!("field `{}` uses unregistered brand `{}`", field.name, name),
                    );
                    if let Some(suggestion) = suggest_similar(name, brands.names()) {
                        diagnostic = diagnostic.with_suggestion(suggestion);
                    }
                    diagnostics.push(diagnostic);
                }
            }
        }

        for reference in &field.validators {
            match validators.get(&reference.name) {
                Some(registration) => {
                    if !applies_to(registration.applies, &field.shape) {
                        diagnostics.push(Diagnostic::error(
                            "resolver.applicability",
                            format!(
                                "validator `{}` does not apply to field `{}` of shape {}",
                                reference.name,
                                field.name,
                                field.shape.canonical()
                            ),
                        ));
                        continue;
                    }
                    match (registration.build)(reference) {
                        Ok(check) => {
                            if let Condition::Matches { pattern } = &check.condition {
                                if let Err(error) = msgforge::pattern::check_pattern(pattern) {
                                    diagnostics.push(Diagnostic::error(
                                        "resolver.bad-pattern",
                                        format!(
                                            "field `{}`: malformed pattern `{}`: {}",
                                            field.name, pattern, error
                                        ),
                                    ));
                                    continue;
                                }
                            }
                            checks.push(check);
                        }
                        Err(message) => diagnostics.push(Diagnostic::error(
                            "resolver.bad-arguments",
                            format!("field `{}`: {}", field.name, message),
                        )),
                    }
                }
                None => {
                    let mut diagnostic = Diagnostic::error(
                        "resolver.unknown-validator",
                        format!(
                            "field `{}` references unknown validator `{}`",
                            field.name, reference.name
                        ),
                    );
                    if let Some(suggestion) = suggest_similar(&reference.name, validators.names()) {
                        diagnostic = diagnostic.with_suggestion(suggestion);
                    }
                    diagnostics.push(diagnostic);
                }
            }
        }

        let union = match &field.shape {
            TypeShape::Union(members) => Some(
                members
                    .iter()
                    .map(|member| UnionGuard {
                        member: member.clone(),
                        compact: types.is_compact(member),
                        checks: Vec::new(),
                    })
                    .collect(),
            ),
            _ => None,
        };

        fields.push(FieldRules {
            field: field.name.clone(),
            guard_presence: field.optional || field.nullable,
            float_context: float_context(&field.shape),
            checks,
            union,
        });
    }

    if diagnostics.has_errors() {
        return (None, diagnostics);
    }

    (
        Some(ResolvedSchema {
            type_name: schema.name.clone(),
            mode,
            fields,
        }),
        diagnostics,
    )
}

fn applies_to(applies: Applicability, shape: &TypeShape) -> bool {
    let base = match shape {
        TypeShape::Brand { base, .. } => Some(*base),
        TypeShape::Primitive(kind) => Some(*kind),
        _ => None,
    };

    match applies {
        Applicability::Any => true,
        Applicability::Numeric => matches!(base, Some(PrimitiveKind::Number | PrimitiveKind::Int)),
        Applicability::Text => matches!(base, Some(PrimitiveKind::String)),
        Applicability::Sized => {
            matches!(base, Some(PrimitiveKind::String)) || shape.is_collection()
        }
    }
}

fn float_context(shape: &TypeShape) -> bool {
    matches!(
        shape,
        TypeShape::Primitive(PrimitiveKind::Number)
            | TypeShape::Brand {
                base: PrimitiveKind::Number,
                ..
            }
    )
}
