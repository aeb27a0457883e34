//! Recursive-descent parser for standalone schema documents.
//!
//! The type-expression grammar here is the reference implementation shared
//! by both front ends: the annotation scanner calls
//! [`parse_type_expr_text`] for its `ty = "..."` directives instead of
//! carrying a second grammar.

use crate::diagnostics::{Diagnostic, DiagnosticSet, Span};
use crate::ir::{ExtendInfo, MapKeyKind, PrimitiveKind, TypeShape, ValidatorArg, ValidatorRef, WrapperKind};
use crate::lower::{RawField, RawParam, RawSchema};
use crate::schemafile::lexer::{lex, Token, TokenKind};
use crate::suggest::suggest_similar;

/// Annotation names the schema-file front end understands.
const KNOWN_ANNOTATIONS: &[&str] = &["compact", "id", "extend"];

/// Top-level declaration keywords.
const KNOWN_KEYWORDS: &[&str] = &["message", "table", "endpoint"];

/// A parsed type expression: the shape plus field-level nullability
/// gathered from a `| null` member.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTypeExpr {
    /// The type shape.
    pub shape: TypeShape,

    /// Whether the expression admitted `null`.
    pub nullable: bool,
}

/// Parse a whole schema document into raw schemas plus diagnostics.
///
/// Parsing is exhaustive: every declaration is attempted even after a
/// malformed one, so the diagnostic set describes the whole file. Callers
/// must consult [`DiagnosticSet::has_errors`] before sealing or generating
/// anything.
pub fn parse_document(text: &str) -> (Vec<RawSchema>, DiagnosticSet) {
    let (tokens, lex_diagnostics) = lex(text);
    let mut diagnostics = DiagnosticSet::new();
    for diagnostic in lex_diagnostics {
        diagnostics.push(diagnostic);
    }

    let mut parser = Parser::new(tokens);
    let schemas = parser.parse_document();
    diagnostics.merge(parser.diagnostics);

    (schemas, diagnostics)
}

/// Parse a standalone type expression (the annotation scanner's entry
/// point into the shared grammar).
pub fn parse_type_expr_text(text: &str) -> Result<ParsedTypeExpr, Diagnostic> {
    let (tokens, lex_diagnostics) = lex(text);
    if let Some(diagnostic) = lex_diagnostics.into_iter().next() {
        return Err(diagnostic);
    }

    let mut parser = Parser::new(tokens);
    let expr = parser.parse_type_expr()?;

    if let Some(token) = parser.peek() {
        return Err(Diagnostic::error(
            "parse.trailing-tokens",
            format!("unexpected {} after type expression", token.kind.describe()),
        )
        .with_span(token.span));
    }
    if let Some(diagnostic) = parser.diagnostics.into_iter().next() {
        return Err(diagnostic);
    }

    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    diagnostics: DiagnosticSet,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            diagnostics: DiagnosticSet::new(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn last_span(&self) -> Span {
        self.tokens
            .get(self.position.saturating_sub(1))
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or(Span::new(1, 1))
    }

    fn error_here(&self, code: &str, message: impl Into<String>) -> Diagnostic {
        let span = self.peek().map(|t| t.span).unwrap_or_else(|| self.last_span());
        Diagnostic::error(code, message).with_span(span)
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, Span), Diagnostic> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Ident(name),
                span,
            }) => Ok((name, span)),
            Some(token) => Err(Diagnostic::error(
                "parse.expected-ident",
                format!("expected {}, found {}", what, token.kind.describe()),
            )
            .with_span(token.span)),
            None => Err(Diagnostic::error(
                "parse.expected-ident",
                format!("expected {}, found end of input", what),
            )
            .with_span(self.last_span())),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Span, Diagnostic> {
        match self.next() {
            Some(token) if token.kind == kind => Ok(token.span),
            Some(token) => Err(Diagnostic::error(
                "parse.expected-token",
                format!("expected {}, found {}", kind.describe(), token.kind.describe()),
            )
            .with_span(token.span)),
            None => Err(Diagnostic::error(
                "parse.expected-token",
                format!("expected {}, found end of input", kind.describe()),
            )
            .with_span(self.last_span())),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind) == Some(kind) {
            self.position += 1;
            return true;
        }
        false
    }

    // =========================================================================
    // Documents and declarations
    // =========================================================================

    fn parse_document(&mut self) -> Vec<RawSchema> {
        let mut schemas = Vec::new();

        while self.peek().is_some() {
            match self.parse_decl() {
                Ok(schema) => schemas.push(schema),
                Err(diagnostic) => {
                    self.diagnostics.push(diagnostic);
                    self.recover_to_next_decl();
                }
            }
        }

        schemas
    }

    fn parse_decl(&mut self) -> Result<RawSchema, Diagnostic> {
        let annotations = self.parse_annotations()?;

        let (keyword, span) = self.expect_ident("a declaration keyword")?;
        let wrapper_base = match keyword.as_str() {
            "message" => WrapperKind::Plain,
            "table" => WrapperKind::Table,
            "endpoint" => WrapperKind::Plain, // response filled below
            other => {
                let mut diagnostic = Diagnostic::error(
                    "parse.unknown-keyword",
                    format!("unknown declaration keyword `{}`", other),
                )
                .with_span(span);
                if let Some(suggestion) = suggest_similar(other, KNOWN_KEYWORDS.iter().copied()) {
                    diagnostic = diagnostic.with_suggestion(suggestion);
                }
                return Err(diagnostic);
            }
        };

        let (name, name_span) = self.expect_ident("a type name")?;

        let params = if self.peek().map(|t| &t.kind) == Some(&TokenKind::Lt) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let wrapper = if keyword == "endpoint" {
            match self.eat(&TokenKind::Arrow) {
                true => {
                    let (response, _) = self.expect_ident("a response type name")?;
                    WrapperKind::Endpoint { response }
                }
                false => {
                    return Err(Diagnostic::error(
                        "schema.wrapper-arity",
                        format!(
                            "endpoint `{}` needs a response type: `endpoint {} -> Response`",
                            name, name
                        ),
                    )
                    .with_span(name_span));
                }
            }
        } else {
            if self.peek().map(|t| &t.kind) == Some(&TokenKind::Arrow) {
                return Err(Diagnostic::error(
                    "schema.wrapper-arity",
                    format!("`{}` takes one type argument; only endpoints declare a response", keyword),
                )
                .with_span(name_span));
            }
            wrapper_base
        };

        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        loop {
            if self.eat(&TokenKind::RBrace) {
                break;
            }
            if self.peek().is_none() {
                return Err(Diagnostic::error(
                    "parse.expected-token",
                    format!("unterminated body of `{}`", name),
                )
                .with_span(name_span));
            }
            fields.push(self.parse_field()?);
            self.eat(&TokenKind::Comma);
        }

        Ok(RawSchema {
            name,
            span: Some(name_span),
            wrapper,
            compact: annotations.compact,
            type_id: annotations.type_id,
            extend: annotations.extend,
            params,
            fields,
        })
    }

    fn parse_annotations(&mut self) -> Result<DeclAnnotations, Diagnostic> {
        let mut annotations = DeclAnnotations::default();

        while self.eat(&TokenKind::At) {
            let (name, span) = self.expect_ident("an annotation name")?;
            match name.as_str() {
                "compact" => annotations.compact = true,
                "id" => {
                    let argument = self.parse_string_argument("@id")?;
                    annotations.type_id = Some(argument);
                }
                "extend" => {
                    if annotations.extend.is_some() {
                        return Err(Diagnostic::error(
                            "directive.extend-duplicate",
                            "at most one @extend annotation per type",
                        )
                        .with_span(span));
                    }
                    let argument = self.parse_string_argument("@extend")?;
                    annotations.extend = Some(ExtendInfo::new(argument));
                }
                other => {
                    let mut diagnostic = Diagnostic::error(
                        "directive.unknown",
                        format!("unknown annotation `@{}`", other),
                    )
                    .with_span(span);
                    if let Some(suggestion) =
                        suggest_similar(other, KNOWN_ANNOTATIONS.iter().copied())
                    {
                        diagnostic = diagnostic.with_suggestion(suggestion);
                    }
                    return Err(diagnostic);
                }
            }
        }

        Ok(annotations)
    }

    fn parse_string_argument(&mut self, what: &str) -> Result<String, Diagnostic> {
        self.expect(TokenKind::LParen)?;
        let value = match self.next() {
            Some(Token {
                kind: TokenKind::Str(value),
                ..
            }) => value,
            Some(token) => {
                return Err(Diagnostic::error(
                    "directive.malformed",
                    format!("{} takes one string argument", what),
                )
                .with_span(token.span));
            }
            None => {
                return Err(Diagnostic::error(
                    "directive.malformed",
                    format!("{} takes one string argument", what),
                )
                .with_span(self.last_span()));
            }
        };
        self.expect(TokenKind::RParen)?;
        Ok(value)
    }

    fn parse_type_params(&mut self) -> Result<Vec<RawParam>, Diagnostic> {
        self.expect(TokenKind::Lt)?;
        let mut params = Vec::new();

        loop {
            let (name, span) = self.expect_ident("a type parameter name")?;

            if !self.eat(&TokenKind::Colon) {
                return Err(Diagnostic::error(
                    "schema.param-unconstrained",
                    format!("type parameter `{}` needs a constraint: `{}: SomeType`", name, name),
                )
                .with_span(span));
            }

            let constraint = self.parse_type_expr()?;
            if constraint.nullable {
                return Err(Diagnostic::error(
                    "schema.param-unconstrained",
                    format!("constraint of `{}` cannot be nullable", name),
                )
                .with_span(span));
            }

            params.push(RawParam {
                name,
                constraint: constraint.shape,
                span: Some(span),
            });

            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::Gt)?;
            break;
        }

        Ok(params)
    }

    // =========================================================================
    // Fields
    // =========================================================================

    fn parse_field(&mut self) -> Result<RawField, Diagnostic> {
        let tag = match self.peek() {
            Some(Token {
                kind: TokenKind::Int(value),
                ..
            }) => {
                let value = *value;
                self.position += 1;
                self.expect(TokenKind::Colon)?;
                Some(value)
            }
            _ => None,
        };

        let (name, span) = self.expect_ident("a field name")?;
        let optional = self.eat(&TokenKind::Question);
        self.expect(TokenKind::Colon)?;

        let expr = self.parse_type_expr()?;
        let validators = self.parse_validators()?;

        Ok(RawField {
            name,
            tag,
            optional,
            nullable: expr.nullable,
            shape: expr.shape,
            validators,
            span: Some(span),
        })
    }

    fn parse_validators(&mut self) -> Result<Vec<ValidatorRef>, Diagnostic> {
        let mut validators = Vec::new();

        while self.eat(&TokenKind::At) {
            let (name, _) = self.expect_ident("a validator name")?;
            let mut args = Vec::new();

            if self.eat(&TokenKind::LParen) {
                loop {
                    if self.eat(&TokenKind::RParen) {
                        break;
                    }
                    match self.next() {
                        Some(Token {
                            kind: TokenKind::Int(value),
                            ..
                        }) => args.push(ValidatorArg::Int(value)),
                        Some(Token {
                            kind: TokenKind::Float(value),
                            ..
                        }) => args.push(ValidatorArg::Float(value)),
                        Some(Token {
                            kind: TokenKind::Str(value),
                            ..
                        }) => args.push(ValidatorArg::Str(value)),
                        Some(token) => {
                            return Err(Diagnostic::error(
                                "parse.validator-arg",
                                format!(
                                    "validator arguments are literals, found {}",
                                    token.kind.describe()
                                ),
                            )
                            .with_span(token.span));
                        }
                        None => {
                            return Err(self.error_here(
                                "parse.validator-arg",
                                "unterminated validator argument list",
                            ));
                        }
                    }
                    if !self.eat(&TokenKind::Comma) {
                        self.expect(TokenKind::RParen)?;
                        break;
                    }
                }
            }

            validators.push(ValidatorRef::new(name, args));
        }

        Ok(validators)
    }

    // =========================================================================
    // Type expressions (the shared grammar)
    // =========================================================================

    fn parse_type_expr(&mut self) -> Result<ParsedTypeExpr, Diagnostic> {
        let mut members = vec![self.parse_postfix()?];
        while self.eat(&TokenKind::Pipe) {
            members.push(self.parse_postfix()?);
        }

        let mut nullable = false;
        let mut shapes = Vec::new();
        for member in members {
            match member {
                UnionMember::Null => nullable = true,
                UnionMember::Shape(shape) => shapes.push(shape),
            }
        }

        let shape = match shapes.len() {
            0 => {
                return Err(self.error_here(
                    "parse.type-expr",
                    "a type expression cannot be only `null`",
                ));
            }
            1 => shapes.into_iter().next().expect("one element"),
            _ => {
                let mut names = Vec::with_capacity(shapes.len());
                for shape in shapes {
                    match shape {
                        TypeShape::Nested(name) => names.push(name),
                        other => {
                            return Err(self.error_here(
                                "schema.union-member",
                                format!(
                                    "union members must be declared type names, found `{}`",
                                    other.canonical()
                                ),
                            ));
                        }
                    }
                }
                TypeShape::Union(names)
            }
        };

        Ok(ParsedTypeExpr { shape, nullable })
    }

    fn parse_postfix(&mut self) -> Result<UnionMember, Diagnostic> {
        let mut member = self.parse_atom()?;

        while self.peek().map(|t| &t.kind) == Some(&TokenKind::LBracket) {
            self.position += 1;
            self.expect(TokenKind::RBracket)?;
            member = match member {
                UnionMember::Shape(shape) => UnionMember::Shape(TypeShape::array(shape)),
                UnionMember::Null => {
                    return Err(self.error_here("parse.type-expr", "`null[]` is not a type"));
                }
            };
        }

        Ok(member)
    }

    fn parse_atom(&mut self) -> Result<UnionMember, Diagnostic> {
        let (name, span) = self.expect_ident("a type")?;

        if name == "null" {
            return Ok(UnionMember::Null);
        }

        if let Some(kind) = PrimitiveKind::from_keyword(&name) {
            return Ok(UnionMember::Shape(TypeShape::Primitive(kind)));
        }

        match name.as_str() {
            "array" => {
                self.expect(TokenKind::Lt)?;
                let element = self.parse_element_expr()?;
                self.expect(TokenKind::Gt)?;
                Ok(UnionMember::Shape(TypeShape::array(element)))
            }
            "set" => {
                self.expect(TokenKind::Lt)?;
                let element = self.parse_element_expr()?;
                self.expect(TokenKind::Gt)?;
                Ok(UnionMember::Shape(TypeShape::set(element)))
            }
            "map" => {
                self.expect(TokenKind::Lt)?;
                let (key_word, key_span) = self.expect_ident("a map key kind")?;
                let key = MapKeyKind::from_keyword(&key_word).ok_or_else(|| {
                    Diagnostic::error(
                        "parse.map-key",
                        format!("map keys are string, int, or bool, found `{}`", key_word),
                    )
                    .with_span(key_span)
                })?;
                self.expect(TokenKind::Comma)?;
                let value = self.parse_element_expr()?;
                self.expect(TokenKind::Gt)?;
                Ok(UnionMember::Shape(TypeShape::map(key, value)))
            }
            "brand" => {
                self.expect(TokenKind::Lt)?;
                let (base_word, base_span) = self.expect_ident("a primitive kind")?;
                let base = PrimitiveKind::from_keyword(&base_word).ok_or_else(|| {
                    Diagnostic::error(
                        "schema.brand-base",
                        format!("brands refine primitives, found `{}`", base_word),
                    )
                    .with_span(base_span)
                })?;
                self.expect(TokenKind::Comma)?;
                let (brand_name, _) = self.expect_ident("a brand name")?;

                let mut extra = 0usize;
                while self.eat(&TokenKind::Comma) {
                    self.expect_ident("a type argument")?;
                    extra += 1;
                }
                self.expect(TokenKind::Gt)?;

                if extra > 0 {
                    return Err(Diagnostic::error(
                        "schema.brand-arity",
                        "brands take exactly two type arguments; the disambiguating third is synthesized by the generator",
                    )
                    .with_span(span));
                }

                Ok(UnionMember::Shape(TypeShape::Brand {
                    base,
                    name: brand_name,
                }))
            }
            _ => {
                if self.peek().map(|t| &t.kind) == Some(&TokenKind::Lt) {
                    return Err(Diagnostic::error(
                        "schema.unsupported-generic",
                        format!(
                            "`{}` cannot be instantiated in field position; only array, map, set, and brand take type arguments",
                            name
                        ),
                    )
                    .with_span(span));
                }
                Ok(UnionMember::Shape(TypeShape::Nested(name)))
            }
        }
    }

    /// An element expression inside `array<...>`, `set<...>`, `map<...>`:
    /// same grammar, but nullability has no meaning below field level.
    fn parse_element_expr(&mut self) -> Result<TypeShape, Diagnostic> {
        let expr = self.parse_type_expr()?;
        if expr.nullable {
            return Err(self.error_here(
                "parse.type-expr",
                "`null` is only allowed at field level, not inside collections",
            ));
        }
        Ok(expr.shape)
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Skip to the start of the next plausible top-level declaration.
    fn recover_to_next_decl(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match &token.kind {
                TokenKind::LBrace => {
                    depth += 1;
                    self.position += 1;
                }
                TokenKind::RBrace => {
                    self.position += 1;
                    if depth <= 1 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Ident(word)
                    if depth == 0 && KNOWN_KEYWORDS.contains(&word.as_str()) =>
                {
                    return;
                }
                TokenKind::At if depth == 0 => return,
                _ => {
                    self.position += 1;
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct DeclAnnotations {
    compact: bool,
    type_id: Option<String>,
    extend: Option<ExtendInfo>,
}

enum UnionMember {
    Shape(TypeShape),
    Null,
}
