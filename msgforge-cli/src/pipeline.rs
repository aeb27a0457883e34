//! Project compilation pipeline.
//!
//! Orchestrates the two-pass model the compiler requires: first a
//! discovery pass registers every declared type name across every input
//! file, then each file is compiled independently against the read-only
//! registry. A file either yields a complete generated module or only
//! diagnostics; there is no partial output.

use std::path::PathBuf;

use msgforge_compiler::diagnostics::{Diagnostic, DiagnosticSet};
use msgforge_compiler::registry::TypeNameRegistry;
use msgforge_compiler::resolver::{BrandRegistry, ValidatorRegistry};
use msgforge_compiler::{compile, discover, CompileOptions, SourceKind};

use crate::config::Config;
use crate::error::CliResult;
use crate::scanner::InputFile;

/// The compilation outcome for one input file.
#[derive(Debug)]
pub struct CompiledFile {
    /// Input path relative to the scan root.
    pub input: PathBuf,

    /// Destination of the generated module, relative to the output dir.
    pub output: PathBuf,

    /// Declared type names in the file.
    pub type_names: Vec<String>,

    /// Diagnostics the file produced.
    pub diagnostics: DiagnosticSet,

    /// Generated module text; `None` when the file failed.
    pub content: Option<String>,
}

impl CompiledFile {
    /// Whether the file compiled cleanly.
    pub fn is_success(&self) -> bool {
        self.content.is_some()
    }
}

/// The outcome of compiling a whole project.
#[derive(Debug)]
pub struct ProjectOutcome {
    /// Per-file outcomes, in input order. Files that declare no types are
    /// omitted.
    pub files: Vec<CompiledFile>,

    /// Number of declared types across the project.
    pub declared_types: usize,
}

impl ProjectOutcome {
    /// Number of failed files.
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| !f.is_success()).count()
    }

    /// Whether every file compiled cleanly.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Compile every input file against a project-wide registry.
pub fn compile_project(files: &[InputFile], config: &Config) -> CliResult<ProjectOutcome> {
    let mode = config.compile.resolve_mode()?;

    // Discovery pass: all names first, so forward references across files
    // resolve no matter the compilation order. Duplicates are reported
    // against the later file.
    let mut types = TypeNameRegistry::new();
    let mut duplicate_diagnostics: Vec<(PathBuf, Diagnostic)> = Vec::new();
    for file in files {
        for declared in discover(&file.content, file.kind) {
            let name = declared.name.clone();
            if types.register(declared).is_some() {
                duplicate_diagnostics.push((
                    file.relative_path.clone(),
                    Diagnostic::error(
                        "schema.name-duplicate",
                        format!("type `{}` is declared more than once in the project", name),
                    ),
                ));
            }
        }
    }

    let validators = ValidatorRegistry::with_builtins();
    let brands = BrandRegistry::new();
    let options = CompileOptions { mode };

    let mut outcomes = Vec::new();
    for file in files {
        let result = compile(&file.content, file.kind, &types, &validators, &brands, options);

        let mut diagnostics = result.diagnostics;
        for (path, diagnostic) in &duplicate_diagnostics {
            if *path == file.relative_path {
                diagnostics.push(diagnostic.clone());
            }
        }

        if result.schemas.is_empty() && diagnostics.is_empty() {
            // Ordinary Rust source without annotations.
            continue;
        }

        let content = if diagnostics.has_errors() {
            None
        } else {
            result.output.map(|output| output.content)
        };

        outcomes.push(CompiledFile {
            input: file.relative_path.clone(),
            output: output_path(&file.relative_path, file.kind),
            type_names: result.schemas.iter().map(|s| s.name.clone()).collect(),
            diagnostics,
            content,
        });
    }

    Ok(ProjectOutcome {
        files: outcomes,
        declared_types: types.len(),
    })
}

/// Destination of a generated module, relative to the output directory.
///
/// Schema documents map to their stem; Rust inputs get a `_gen` suffix so
/// an output directory inside the source tree cannot collide with the
/// source itself.
fn output_path(input: &PathBuf, kind: SourceKind) -> PathBuf {
    let mut path = input.clone();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("generated")
        .to_string();
    let file_name = match kind {
        SourceKind::Schema => format!("{}.rs", stem),
        SourceKind::Rust => format!("{}_gen.rs", stem),
    };
    path.set_file_name(file_name);
    path
}
