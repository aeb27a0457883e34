//! # msgforge-compiler
//!
//! A schema-to-code compiler for immutable message types.
//!
//! Declarative message-type schemas enter through one of two front ends —
//! a standalone schema-file parser or an annotation scanner over ordinary
//! Rust sources — and both lower into one canonical model. Validator and
//! brand references resolve into structured condition trees, every schema
//! gets a content-addressed version hash insensitive to formatting, and
//! the generator emits a complete immutable data-model implementation per
//! type backed by the `msgforge` runtime crate.
//!
//! ## Pipeline
//!
//! ```text
//! .msg text ──► schemafile::parse_document ──┐
//!                                            ├─► lower::seal ─► resolver::resolve ─► codegen
//! .rs text ───► scanner::scan_source ────────┘        ▲
//!                                                     │
//!                         registry::TypeNameRegistry (discovery pass)
//! ```
//!
//! Compilation of one unit is synchronous and all-or-nothing: the full
//! diagnostic set is collected first, and no output is produced for a unit
//! with a fatal diagnostic.

pub mod codegen;
pub mod diagnostics;
pub mod hash;
pub mod ir;
pub mod lower;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod schemafile;
pub mod suggest;

use diagnostics::DiagnosticSet;
use ir::CanonicalSchema;
use registry::{DeclaredType, TypeNameRegistry};
use resolver::{BrandRegistry, ResolveMode, ResolvedSchema, ValidatorRegistry};

/// Which front end a compilation unit goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A standalone `.msg` schema document.
    Schema,

    /// Ordinary Rust source with `#[message(...)]` annotations.
    Rust,
}

impl SourceKind {
    /// Pick the front end from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "msg" => Some(SourceKind::Schema),
            "rs" => Some(SourceKind::Rust),
            _ => None,
        }
    }
}

/// Compilation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Union no-match policy threaded into resolved schemas.
    pub mode: ResolveMode,
}

/// The result of compiling one unit.
#[derive(Debug)]
pub struct CompileResult {
    /// Sealed schemas, in declaration order. Empty when parsing failed
    /// fatally.
    pub schemas: Vec<CanonicalSchema>,

    /// Every diagnostic the unit produced.
    pub diagnostics: DiagnosticSet,

    /// The generated module; `None` when any diagnostic is fatal (no
    /// partial output).
    pub output: Option<codegen::GeneratedOutput>,
}

impl CompileResult {
    /// Whether compilation succeeded.
    pub fn is_success(&self) -> bool {
        self.output.is_some()
    }
}

/// Discovery pass: the declared type names of one unit.
///
/// Used to build the project-wide [`TypeNameRegistry`] before any unit is
/// fully compiled; parse errors are ignored here and resurface during the
/// unit's own compilation. Units are independent, so a driver may run
/// discovery over many files in parallel as long as every file is
/// discovered before the first full compile.
pub fn discover(text: &str, kind: SourceKind) -> Vec<DeclaredType> {
    let (raws, _) = match kind {
        SourceKind::Schema => schemafile::parse_document(text),
        SourceKind::Rust => scanner::scan_source(text),
    };

    raws.into_iter()
        .map(|raw| DeclaredType {
            name: raw.name,
            wrapper: raw.wrapper,
            compact: raw.compact,
        })
        .collect()
}

/// Compile one unit end to end: front end, sealing, resolution, codegen.
pub fn compile(
    text: &str,
    kind: SourceKind,
    types: &TypeNameRegistry,
    validators: &ValidatorRegistry,
    brands: &BrandRegistry,
    options: CompileOptions,
) -> CompileResult {
    let (raws, mut diagnostics) = match kind {
        SourceKind::Schema => schemafile::parse_document(text),
        SourceKind::Rust => scanner::scan_source(text),
    };

    let mut schemas = Vec::with_capacity(raws.len());
    for raw in raws {
        if let Some(schema) = lower::seal(raw, types, &mut diagnostics) {
            schemas.push(schema);
        }
    }

    let mut resolved: Vec<ResolvedSchema> = Vec::with_capacity(schemas.len());
    for schema in &schemas {
        let (rules, resolve_diagnostics) =
            resolver::resolve(schema, validators, brands, types, options.mode);
        diagnostics.merge(resolve_diagnostics);
        if let Some(rules) = rules {
            resolved.push(rules);
        }
    }

    if diagnostics.has_errors() {
        return CompileResult {
            schemas,
            diagnostics,
            output: None,
        };
    }

    let pairs: Vec<(&CanonicalSchema, &ResolvedSchema)> =
        schemas.iter().zip(resolved.iter()).collect();
    let output = codegen::generate_module(&pairs);

    CompileResult {
        schemas,
        diagnostics,
        output: Some(output),
    }
}
