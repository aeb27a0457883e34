//! Lowering and sealing: raw front-end output to canonical schemas.
//!
//! Both front ends produce [`RawSchema`] values and hand them to [`seal`],
//! which runs every structural check, resolves generic-parameter
//! references, computes the content hash, and yields the immutable
//! [`CanonicalSchema`]. Routing both front ends through this single step is
//! what guarantees they produce bit-identical canonical values for
//! equivalent input.

use crate::diagnostics::{Diagnostic, DiagnosticSet, Span};
use crate::hash;
use crate::ir::{
    CanonicalSchema, ExtendInfo, FieldDescriptor, TypeShape, TypeParameter, ValidatorRef,
    WrapperKind,
};
use crate::registry::TypeNameRegistry;

/// Unvalidated output of a front end for one type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSchema {
    /// Declared type name.
    pub name: String,

    /// Declaration position, when the front end has one.
    pub span: Option<Span>,

    /// Wrapper kind.
    pub wrapper: WrapperKind,

    /// Compact-encoding flag.
    pub compact: bool,

    /// Explicit type-id override.
    pub type_id: Option<String>,

    /// Extension reference.
    pub extend: Option<ExtendInfo>,

    /// Type parameters. Constraints are already present: an unconstrained
    /// parameter is rejected by the front end before lowering.
    pub params: Vec<RawParam>,

    /// Fields in declaration order.
    pub fields: Vec<RawField>,
}

/// Unvalidated type parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParam {
    /// Parameter name.
    pub name: String,

    /// Constraint shape.
    pub constraint: TypeShape,

    /// Declaration position.
    pub span: Option<Span>,
}

/// Unvalidated field.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    /// Field name.
    pub name: String,

    /// Wire tag as written; positivity and range are checked here.
    pub tag: Option<i64>,

    /// Optional flag.
    pub optional: bool,

    /// Nullable flag.
    pub nullable: bool,

    /// Parsed type shape.
    pub shape: TypeShape,

    /// Validator references.
    pub validators: Vec<ValidatorRef>,

    /// Declaration position.
    pub span: Option<Span>,
}

/// Validate a raw schema and seal it into a canonical one.
///
/// Every violation is recorded into `diagnostics`; `None` is returned when
/// any of them is fatal, and nothing is emitted for the type.
pub fn seal(
    raw: RawSchema,
    registry: &TypeNameRegistry,
    diagnostics: &mut DiagnosticSet,
) -> Option<CanonicalSchema> {
    let before = diagnostics.errors().count();

    check_duplicate_fields(&raw, diagnostics);
    check_tags(&raw, diagnostics);

    let param_names: Vec<&str> = raw.params.iter().map(|p| p.name.as_str()).collect();

    // Resolve bare identifiers that name a declared parameter.
    let fields: Vec<FieldDescriptor> = raw
        .fields
        .iter()
        .map(|field| {
            let shape = resolve_params(&field.shape, &param_names);
            check_shape(&raw, field, &shape, registry, diagnostics);
            FieldDescriptor {
                name: field.name.clone(),
                tag: field.tag.and_then(|t| u32::try_from(t).ok()),
                shape,
                optional: field.optional,
                nullable: field.nullable,
                validators: field.validators.clone(),
            }
        })
        .collect();

    let type_params: Vec<TypeParameter> = raw
        .params
        .iter()
        .map(|param| {
            let constraint = resolve_params(&param.constraint, &[]);
            check_constraint(&raw, param, &constraint, registry, diagnostics);
            let requires_instantiation = match &constraint {
                TypeShape::Nested(name) => registry.contains(name),
                _ => false,
            };
            TypeParameter {
                name: param.name.clone(),
                constraint,
                requires_instantiation,
            }
        })
        .collect();

    check_compact(&raw, &fields, diagnostics);
    check_endpoint(&raw, registry, diagnostics);

    if diagnostics.errors().count() > before {
        return None;
    }

    let hash = hash::compute(&raw.name, &raw.wrapper, raw.compact, &fields);

    Some(CanonicalSchema {
        name: raw.name,
        fields,
        type_params,
        wrapper: raw.wrapper,
        compact: raw.compact,
        type_id: raw.type_id,
        extend: raw.extend,
        hash,
    })
}

/// Replace `Nested(name)` with `GenericParam(name)` wherever `name` is a
/// declared parameter of the enclosing type.
fn resolve_params(shape: &TypeShape, params: &[&str]) -> TypeShape {
    match shape {
        TypeShape::Nested(name) if params.contains(&name.as_str()) => {
            TypeShape::GenericParam(name.clone())
        }
        TypeShape::Array(element) => TypeShape::array(resolve_params(element, params)),
        TypeShape::Set(element) => TypeShape::set(resolve_params(element, params)),
        TypeShape::Map { key, value } => TypeShape::map(*key, resolve_params(value, params)),
        other => other.clone(),
    }
}

fn check_duplicate_fields(raw: &RawSchema, diagnostics: &mut DiagnosticSet) {
    let mut seen: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
    for field in &raw.fields {
        if !seen.insert(field.name.as_str()) {
            diagnostics.push(
                with_span(
                    Diagnostic::error(
                        "schema.field-duplicate",
                        format!("duplicate field `{}` in `{}`", field.name, raw.name),
                    ),
                    field.span,
                ),
            );
        }
    }
}

fn check_tags(raw: &RawSchema, diagnostics: &mut DiagnosticSet) {
    let mut seen: std::collections::BTreeSet<i64> = std::collections::BTreeSet::new();
    for field in &raw.fields {
        let Some(tag) = field.tag else { continue };

        if tag <= 0 || u32::try_from(tag).is_err() {
            diagnostics.push(with_span(
                Diagnostic::error(
                    "schema.tag-positive",
                    format!(
                        "wire tag {} on field `{}` must be a positive integer",
                        tag, field.name
                    ),
                ),
                field.span,
            ));
            continue;
        }

        if !seen.insert(tag) {
            diagnostics.push(with_span(
                Diagnostic::error(
                    "schema.tag-duplicate",
                    format!("wire tag {} is used by more than one field in `{}`", tag, raw.name),
                ),
                field.span,
            ));
        }
    }
}

fn check_shape(
    raw: &RawSchema,
    field: &RawField,
    shape: &TypeShape,
    registry: &TypeNameRegistry,
    diagnostics: &mut DiagnosticSet,
) {
    match shape {
        TypeShape::Nested(name) => {
            if !registry.contains(name) {
                diagnostics.push(with_span(
                    Diagnostic::error(
                        "schema.unknown-type",
                        format!("field `{}` references unknown type `{}`", field.name, name),
                    ),
                    field.span,
                ));
            }
        }
        TypeShape::Union(members) => {
            for member in members {
                if !registry.contains(member) {
                    diagnostics.push(with_span(
                        Diagnostic::error(
                            "schema.unknown-type",
                            format!(
                                "union member `{}` of field `{}` is not a declared type",
                                member, field.name
                            ),
                        ),
                        field.span,
                    ));
                }
            }
            if members.len() < 2 {
                diagnostics.push(with_span(
                    Diagnostic::error(
                        "schema.union-arity",
                        format!("union field `{}` needs at least two members", field.name),
                    ),
                    field.span,
                ));
            }
        }
        TypeShape::Array(element) => {
            check_shape(raw, field, element, registry, diagnostics);
        }
        TypeShape::Set(element) => {
            // Set members need total order and equality on the wire and in
            // generated storage.
            let orderable = matches!(
                element.as_ref(),
                TypeShape::Primitive(
                    crate::ir::PrimitiveKind::String
                        | crate::ir::PrimitiveKind::Int
                        | crate::ir::PrimitiveKind::Bool
                        | crate::ir::PrimitiveKind::Decimal
                ) | TypeShape::Brand {
                    base: crate::ir::PrimitiveKind::String
                        | crate::ir::PrimitiveKind::Int
                        | crate::ir::PrimitiveKind::Bool
                        | crate::ir::PrimitiveKind::Decimal,
                    ..
                }
            );
            if !orderable {
                diagnostics.push(with_span(
                    Diagnostic::error(
                        "schema.set-element",
                        format!(
                            "set field `{}` needs orderable members: string, int, bool, decimal, or a brand of one",
                            field.name
                        ),
                    ),
                    field.span,
                ));
            }
            check_shape(raw, field, element, registry, diagnostics);
        }
        TypeShape::Map { value, .. } => {
            check_shape(raw, field, value, registry, diagnostics);
        }
        TypeShape::Primitive(_) | TypeShape::GenericParam(_) | TypeShape::Brand { .. } => {}
    }
}

fn check_constraint(
    raw: &RawSchema,
    param: &RawParam,
    constraint: &TypeShape,
    registry: &TypeNameRegistry,
    diagnostics: &mut DiagnosticSet,
) {
    if let TypeShape::Nested(name) = constraint {
        if !registry.contains(name) {
            diagnostics.push(with_span(
                Diagnostic::error(
                    "schema.unknown-type",
                    format!(
                        "constraint of parameter `{}` on `{}` references unknown type `{}`",
                        param.name, raw.name, name
                    ),
                ),
                param.span,
            ));
        }
    }
}

fn check_compact(raw: &RawSchema, fields: &[FieldDescriptor], diagnostics: &mut DiagnosticSet) {
    if !raw.compact {
        return;
    }
    let ok = fields.len() == 1 && fields[0].shape.is_scalar();
    if !ok {
        diagnostics.push(with_span(
            Diagnostic::error(
                "schema.compact-shape",
                format!(
                    "compact type `{}` must have exactly one primitive or branded field",
                    raw.name
                ),
            ),
            raw.span,
        ));
    }
}

fn check_endpoint(raw: &RawSchema, registry: &TypeNameRegistry, diagnostics: &mut DiagnosticSet) {
    if let WrapperKind::Endpoint { response } = &raw.wrapper {
        if !registry.contains(response) {
            diagnostics.push(with_span(
                Diagnostic::error(
                    "schema.unknown-type",
                    format!(
                        "endpoint `{}` names unknown response type `{}`",
                        raw.name, response
                    ),
                ),
                raw.span,
            ));
        }
    }
}

fn with_span(diagnostic: Diagnostic, span: Option<Span>) -> Diagnostic {
    match span {
        Some(span) => diagnostic.with_span(span),
        None => diagnostic,
    }
}
