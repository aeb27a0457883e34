//! Annotation scanner: the in-source front end.
//!
//! Scans ordinary Rust source text for struct declarations carrying a
//! `#[message(...)]` attribute whose directives include `generate`, and
//! reduces each one to the same [`RawSchema`] the schema-file parser
//! produces. Directives are structured attributes parsed with `syn` —
//! never pattern matching over comment text — and schema-only type
//! constructs (unions, brands) are written as schema type expressions in a
//! `ty = "..."` field directive, parsed by the schema-file grammar. The
//! scanner is a thin adapter; the standalone parser is the reference.

use syn::{Fields, Item, Type};

use crate::diagnostics::{Diagnostic, DiagnosticSet};
use crate::ir::{ExtendInfo, MapKeyKind, PrimitiveKind, TypeShape, ValidatorArg, ValidatorRef, WrapperKind};
use crate::lower::{RawField, RawParam, RawSchema};
use crate::schemafile::parser::parse_type_expr_text;
use crate::suggest::suggest_similar;

/// Directives understood on `#[message(...)]`.
const KNOWN_TYPE_DIRECTIVES: &[&str] =
    &["generate", "table", "endpoint", "compact", "id", "extend_from"];

/// Directives understood on `#[field(...)]`.
const KNOWN_FIELD_DIRECTIVES: &[&str] = &[
    "tag",
    "optional",
    "nullable",
    "ty",
    "min",
    "max",
    "gt",
    "lt",
    "min_len",
    "max_len",
    "len",
    "matches",
    "starts_with",
    "ends_with",
    "nonempty",
    "positive",
    "int",
];

/// Field directives that are validator references.
const VALIDATOR_DIRECTIVES: &[&str] = &[
    "min",
    "max",
    "gt",
    "lt",
    "min_len",
    "max_len",
    "len",
    "matches",
    "starts_with",
    "ends_with",
    "nonempty",
    "positive",
    "int",
];

/// Scan Rust source text for annotated type declarations.
///
/// Like the schema-file parser, scanning is exhaustive and two-phase: the
/// whole file's diagnostics are collected before anything is sealed or
/// generated.
pub fn scan_source(text: &str) -> (Vec<RawSchema>, DiagnosticSet) {
    let mut diagnostics = DiagnosticSet::new();

    let file = match syn::parse_file(text) {
        Ok(file) => file,
        Err(error) => {
            diagnostics.push(Diagnostic::error(
                "scanner.syntax",
                format!("not valid Rust source: {}", error),
            ));
            return (Vec::new(), diagnostics);
        }
    };

    let mut schemas = Vec::new();
    for item in file.items {
        if let Item::Struct(item_struct) = item {
            if let Some(schema) = scan_struct(&item_struct, &mut diagnostics) {
                schemas.push(schema);
            }
        }
    }

    (schemas, diagnostics)
}

/// Directives collected from one `#[message(...)]` attribute set.
#[derive(Debug, Default)]
struct TypeDirectives {
    generate: bool,
    table: bool,
    endpoint_response: Option<String>,
    compact: bool,
    type_id: Option<String>,
    extend_from: Vec<String>,
}

fn scan_struct(
    item_struct: &syn::ItemStruct,
    diagnostics: &mut DiagnosticSet,
) -> Option<RawSchema> {
    let mut directives = TypeDirectives::default();
    let mut saw_attribute = false;
    let before = diagnostics.errors().count();

    for attr in &item_struct.attrs {
        if !attr.path().is_ident("message") {
            continue;
        }
        saw_attribute = true;
        parse_type_directives(attr, &mut directives, diagnostics);
    }

    if !saw_attribute {
        return None;
    }

    let name = item_struct.ident.to_string();

    if !directives.generate {
        if directives.extend_from.is_empty() {
            diagnostics.push(Diagnostic::error(
                "directive.generate-missing",
                format!("`{}` has message directives but no `generate` marker", name),
            ));
        } else {
            diagnostics.push(Diagnostic::error(
                "directive.extend-without-generate",
                format!("`extend_from` on `{}` requires the `generate` directive", name),
            ));
        }
    }

    if directives.extend_from.len() > 1 {
        diagnostics.push(Diagnostic::error(
            "directive.extend-duplicate",
            format!("at most one `extend_from` directive on `{}`", name),
        ));
    }

    let wrapper = match (directives.table, directives.endpoint_response.clone()) {
        (false, None) => WrapperKind::Plain,
        (true, None) => WrapperKind::Table,
        (false, Some(response)) => WrapperKind::Endpoint { response },
        (true, Some(_)) => {
            diagnostics.push(Diagnostic::error(
                "schema.wrapper-arity",
                format!("`{}` declares both `table` and `endpoint`", name),
            ));
            WrapperKind::Plain
        }
    };

    let params = scan_generics(&name, &item_struct.generics, diagnostics);
    let fields = scan_fields(&name, &item_struct.fields, diagnostics);

    if diagnostics.errors().count() > before {
        return None;
    }

    Some(RawSchema {
        name,
        span: None,
        wrapper,
        compact: directives.compact,
        type_id: directives.type_id,
        extend: directives.extend_from.first().map(ExtendInfo::new),
        params,
        fields: fields?,
    })
}

fn parse_type_directives(
    attr: &syn::Attribute,
    directives: &mut TypeDirectives,
    diagnostics: &mut DiagnosticSet,
) {
    let outcome = attr.parse_nested_meta(|meta| {
        let Some(ident) = meta.path.get_ident().map(|i| i.to_string()) else {
            diagnostics.push(Diagnostic::error(
                "directive.malformed",
                "directives are plain identifiers",
            ));
            return Ok(());
        };

        match ident.as_str() {
            "generate" => directives.generate = true,
            "table" => directives.table = true,
            "compact" => directives.compact = true,
            "endpoint" => {
                let mut response = None;
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("response") {
                        let value: syn::LitStr = inner.value()?.parse()?;
                        response = Some(value.value());
                        Ok(())
                    } else {
                        Err(inner.error("endpoint takes `response = \"TypeName\"`"))
                    }
                })?;
                match response {
                    Some(response) => directives.endpoint_response = Some(response),
                    None => diagnostics.push(Diagnostic::error(
                        "schema.wrapper-arity",
                        "endpoint needs a response type: `endpoint(response = \"TypeName\")`",
                    )),
                }
            }
            "id" => {
                let value: syn::LitStr = meta.value()?.parse()?;
                directives.type_id = Some(value.value());
            }
            "extend_from" => {
                let value: syn::LitStr = meta.value()?.parse()?;
                directives.extend_from.push(value.value());
            }
            other => {
                let mut diagnostic = Diagnostic::error(
                    "directive.unknown",
                    format!("unknown directive `{}`", other),
                );
                if let Some(suggestion) =
                    suggest_similar(other, KNOWN_TYPE_DIRECTIVES.iter().copied())
                {
                    diagnostic = diagnostic.with_suggestion(suggestion);
                }
                diagnostics.push(diagnostic);
                // Swallow any value so parsing can continue.
                if meta.input.peek(syn::Token![=]) {
                    let _ = meta.value()?.parse::<syn::Lit>()?;
                }
            }
        }
        Ok(())
    });

    if let Err(error) = outcome {
        diagnostics.push(Diagnostic::error(
            "directive.malformed",
            format!("malformed `#[message(...)]` attribute: {}", error),
        ));
    }
}

fn scan_generics(
    type_name: &str,
    generics: &syn::Generics,
    diagnostics: &mut DiagnosticSet,
) -> Vec<RawParam> {
    let mut params = Vec::new();

    for param in generics.type_params() {
        let name = param.ident.to_string();

        let constraint = param.bounds.iter().find_map(|bound| match bound {
            syn::TypeParamBound::Trait(bound) => bound
                .path
                .segments
                .last()
                .map(|segment| segment.ident.to_string()),
            _ => None,
        });

        match constraint {
            Some(constraint) => params.push(RawParam {
                name,
                constraint: TypeShape::Nested(constraint),
                span: None,
            }),
            None => diagnostics.push(Diagnostic::error(
                "schema.param-unconstrained",
                format!(
                    "type parameter `{}` on `{}` needs a constraint bound",
                    name, type_name
                ),
            )),
        }
    }

    params
}

fn scan_fields(
    type_name: &str,
    fields: &Fields,
    diagnostics: &mut DiagnosticSet,
) -> Option<Vec<RawField>> {
    let named = match fields {
        Fields::Named(named) => named,
        _ => {
            diagnostics.push(Diagnostic::error(
                "scanner.unsupported-type",
                format!("`{}` must be a struct with named fields", type_name),
            ));
            return None;
        }
    };

    let mut out = Vec::new();
    for field in &named.named {
        let name = field
            .ident
            .as_ref()
            .expect("named fields have identifiers")
            .to_string();
        if let Some(raw) = scan_field(type_name, &name, field, diagnostics) {
            out.push(raw);
        }
    }

    Some(out)
}

/// Directives collected from one `#[field(...)]` attribute set.
#[derive(Debug, Default)]
struct FieldDirectives {
    tag: Option<i64>,
    optional: bool,
    nullable: bool,
    ty: Option<String>,
    validators: Vec<ValidatorRef>,
}

fn scan_field(
    type_name: &str,
    field_name: &str,
    field: &syn::Field,
    diagnostics: &mut DiagnosticSet,
) -> Option<RawField> {
    let mut directives = FieldDirectives::default();
    let before = diagnostics.errors().count();

    for attr in &field.attrs {
        if !attr.path().is_ident("field") {
            continue;
        }
        parse_field_directives(attr, &mut directives, diagnostics);
    }

    let (shape, adapter_optional, nullable) = match &directives.ty {
        Some(expr_text) => match parse_type_expr_text(expr_text) {
            Ok(expr) => (expr.shape, false, expr.nullable),
            Err(diagnostic) => {
                diagnostics.push(Diagnostic::error(
                    diagnostic.code.clone(),
                    format!(
                        "in `ty` directive of `{}.{}`: {}",
                        type_name, field_name, diagnostic.message
                    ),
                ));
                return None;
            }
        },
        None => match adapt_rust_type(&field.ty) {
            Ok((shape, optional)) => (shape, optional, false),
            Err(message) => {
                diagnostics.push(Diagnostic::error(
                    "scanner.unsupported-type",
                    format!(
                        "field `{}.{}`: {}; spell the schema type with `ty = \"...\"`",
                        type_name, field_name, message
                    ),
                ));
                return None;
            }
        },
    };

    if diagnostics.errors().count() > before {
        return None;
    }

    Some(RawField {
        name: field_name.to_string(),
        tag: directives.tag,
        optional: directives.optional || adapter_optional,
        nullable: directives.nullable || nullable,
        shape,
        validators: directives.validators,
        span: None,
    })
}

fn parse_field_directives(
    attr: &syn::Attribute,
    directives: &mut FieldDirectives,
    diagnostics: &mut DiagnosticSet,
) {
    let outcome = attr.parse_nested_meta(|meta| {
        let Some(ident) = meta.path.get_ident().map(|i| i.to_string()) else {
            diagnostics.push(Diagnostic::error(
                "directive.malformed",
                "directives are plain identifiers",
            ));
            return Ok(());
        };

        match ident.as_str() {
            "tag" => {
                let value: syn::LitInt = meta.value()?.parse()?;
                match value.base10_parse::<i64>() {
                    Ok(tag) => directives.tag = Some(tag),
                    Err(error) => diagnostics.push(Diagnostic::error(
                        "schema.tag-positive",
                        format!("malformed wire tag: {}", error),
                    )),
                }
            }
            "optional" => directives.optional = true,
            "nullable" => directives.nullable = true,
            "ty" => {
                let value: syn::LitStr = meta.value()?.parse()?;
                directives.ty = Some(value.value());
            }
            name if VALIDATOR_DIRECTIVES.contains(&name) => {
                let args = if meta.input.peek(syn::Token![=]) {
                    let expr: syn::Expr = meta.value()?.parse()?;
                    match expr_to_arg(&expr) {
                        Some(arg) => vec![arg],
                        None => {
                            diagnostics.push(Diagnostic::error(
                                "parse.validator-arg",
                                format!("validator `{}` takes a literal argument", name),
                            ));
                            vec![]
                        }
                    }
                } else {
                    vec![]
                };
                directives.validators.push(ValidatorRef::new(name, args));
            }
            other => {
                let mut diagnostic = Diagnostic::error(
                    "directive.unknown",
                    format!("unknown directive `{}`", other),
                );
                if let Some(suggestion) =
                    suggest_similar(other, KNOWN_FIELD_DIRECTIVES.iter().copied())
                {
                    diagnostic = diagnostic.with_suggestion(suggestion);
                }
                diagnostics.push(diagnostic);
                if meta.input.peek(syn::Token![=]) {
                    let _ = meta.value()?.parse::<syn::Lit>()?;
                }
            }
        }
        Ok(())
    });

    if let Err(error) = outcome {
        diagnostics.push(Diagnostic::error(
            "directive.malformed",
            format!("malformed `#[field(...)]` attribute: {}", error),
        ));
    }
}

fn expr_to_arg(expr: &syn::Expr) -> Option<ValidatorArg> {
    match expr {
        syn::Expr::Lit(lit) => literal_to_arg(&lit.lit),
        // Negative literals arrive as a unary minus over a literal.
        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr,
            ..
        }) => match expr_to_arg(expr)? {
            ValidatorArg::Int(value) => Some(ValidatorArg::Int(-value)),
            ValidatorArg::Float(value) => Some(ValidatorArg::Float(-value)),
            ValidatorArg::Str(_) => None,
        },
        _ => None,
    }
}

fn literal_to_arg(literal: &syn::Lit) -> Option<ValidatorArg> {
    match literal {
        syn::Lit::Int(value) => value.base10_parse::<i64>().ok().map(ValidatorArg::Int),
        syn::Lit::Float(value) => value.base10_parse::<f64>().ok().map(ValidatorArg::Float),
        syn::Lit::Str(value) => Some(ValidatorArg::Str(value.value())),
        _ => None,
    }
}

/// Map a plain Rust field type onto the schema type grammar.
///
/// Returns the shape plus whether an outer `Option<...>` marked the field
/// optional. Anything outside this adapter's vocabulary must be written as
/// a `ty = "..."` directive.
fn adapt_rust_type(ty: &Type) -> Result<(TypeShape, bool), String> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let segment = type_path
                .path
                .segments
                .last()
                .ok_or_else(|| "empty type path".to_string())?;
            let ident = segment.ident.to_string();

            match ident.as_str() {
                "String" | "str" => Ok((TypeShape::Primitive(PrimitiveKind::String), false)),
                "bool" => Ok((TypeShape::Primitive(PrimitiveKind::Bool), false)),
                "f32" | "f64" => Ok((TypeShape::Primitive(PrimitiveKind::Number), false)),
                "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "usize" => Ok((TypeShape::Primitive(PrimitiveKind::Int), false)),
                "Option" => {
                    let inner = single_type_argument(segment)
                        .ok_or_else(|| "Option needs a type argument".to_string())?;
                    let (shape, _) = adapt_rust_type(inner)?;
                    Ok((shape, true))
                }
                "Vec" => {
                    let inner = single_type_argument(segment)
                        .ok_or_else(|| "Vec needs a type argument".to_string())?;
                    let (shape, _) = adapt_rust_type(inner)?;
                    Ok((TypeShape::array(shape), false))
                }
                "HashSet" | "BTreeSet" => {
                    let inner = single_type_argument(segment)
                        .ok_or_else(|| format!("{} needs a type argument", ident))?;
                    let (shape, _) = adapt_rust_type(inner)?;
                    Ok((TypeShape::set(shape), false))
                }
                "HashMap" | "BTreeMap" => {
                    let (key_ty, value_ty) = pair_type_arguments(segment)
                        .ok_or_else(|| format!("{} needs two type arguments", ident))?;
                    let key = adapt_map_key(key_ty)?;
                    let (value, _) = adapt_rust_type(value_ty)?;
                    Ok((TypeShape::map(key, value), false))
                }
                _ => {
                    if !segment.arguments.is_none() {
                        return Err(format!(
                            "`{}` cannot be instantiated in field position",
                            ident
                        ));
                    }
                    Ok((TypeShape::Nested(ident), false))
                }
            }
        }
        other => Err(format!(
            "unsupported Rust type `{}`",
            quote_type(other)
        )),
    }
}

fn adapt_map_key(ty: &Type) -> Result<MapKeyKind, String> {
    match adapt_rust_type(ty)? {
        (TypeShape::Primitive(PrimitiveKind::String), _) => Ok(MapKeyKind::String),
        (TypeShape::Primitive(PrimitiveKind::Int), _) => Ok(MapKeyKind::Int),
        (TypeShape::Primitive(PrimitiveKind::Bool), _) => Ok(MapKeyKind::Bool),
        _ => Err("map keys are string, int, or bool".to_string()),
    }
}

fn single_type_argument(segment: &syn::PathSegment) -> Option<&Type> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            syn::GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

fn pair_type_arguments(segment: &syn::PathSegment) -> Option<(&Type, &Type)> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => {
            let mut types = args.args.iter().filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            });
            let key = types.next()?;
            let value = types.next()?;
            Some((key, value))
        }
        _ => None,
    }
}

fn quote_type(ty: &Type) -> String {
    use quote::ToTokens;
    ty.to_token_stream().to_string()
}
