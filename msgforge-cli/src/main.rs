//! # msgforge
//!
//! CLI for compiling declarative message-type schemas into Rust modules.
//!
//! ## Usage
//!
//! ```bash
//! # Compile every .msg and annotated .rs file under the current directory
//! msgforge generate
//!
//! # Compile into a specific output directory
//! msgforge generate --output ./generated
//!
//! # Preview without writing
//! msgforge generate --dry-run
//!
//! # Initialize configuration
//! msgforge init
//!
//! # Check that generated modules are up to date
//! msgforge validate
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use msgforge_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    pipeline::{compile_project, ProjectOutcome},
    scanner::InputScanner,
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "msgforge")]
#[command(author, version, about = "Compile message-type schemas into Rust modules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile schemas and write generated modules
    Generate {
        /// Input directory containing .msg and .rs files
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for generated modules
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter inputs by path pattern (glob)
        #[arg(long)]
        filter: Option<String>,

        /// Union no-match policy: strict or lenient
        #[arg(long)]
        mode: Option<String>,
    },

    /// Initialize a new msgforge configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "msgforge.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that generated modules are up to date
    Validate {
        /// Input directory containing .msg and .rs files
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            dry_run,
            config,
            filter,
            mode,
        } => cmd_generate(input, output, dry_run, config, filter, mode),

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Validate { input, config } => cmd_validate(input, config),
    }
}

fn load_config(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    mode: Option<String>,
) -> Result<Config, CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    Ok(ConfigManager::merge_cli_args(config, &CliArgs { output, mode }))
}

fn compile_inputs(
    input: &PathBuf,
    config: &Config,
    filter: Option<&str>,
) -> Result<Option<ProjectOutcome>, CliError> {
    println!("{}", "Scanning for schema inputs...".cyan());

    let mut scanner = InputScanner::new(input).with_rust(config.compile.scan_rust);
    if let Some(pattern) = filter {
        scanner = scanner.with_filter(pattern)?;
    }

    let files = scanner.scan_allow_empty()?;
    if files.is_empty() {
        println!("{}", "No .msg or annotated .rs files found.".yellow());
        return Ok(None);
    }
    println!("  Found {} input file(s)", files.len().to_string().green());

    println!("{}", "Compiling schemas...".cyan());
    let outcome = compile_project(&files, config)?;

    for file in &outcome.files {
        for diagnostic in file.diagnostics.items() {
            let line = format!("{}: {}", file.input.display(), diagnostic);
            if diagnostic.is_error() {
                println!("  {}", line.red());
            } else {
                println!("  {}", line.yellow());
            }
        }
    }

    println!(
        "  {} type(s) across {} compiled file(s)",
        outcome.declared_types.to_string().green(),
        outcome.files.len()
    );

    Ok(Some(outcome))
}

/// Generate command implementation.
fn cmd_generate(
    input: PathBuf,
    output: Option<PathBuf>,
    dry_run: bool,
    config_path: Option<PathBuf>,
    filter: Option<String>,
    mode: Option<String>,
) -> Result<(), CliError> {
    let config = load_config(config_path, output, mode)?;

    let Some(outcome) = compile_inputs(&input, &config, filter.as_deref())? else {
        return Ok(());
    };

    if !outcome.is_success() {
        return Err(CliError::Compile {
            failed: outcome.failed(),
            total: outcome.files.len(),
        });
    }

    let writer = FileWriter::new(dry_run);
    for file in &outcome.files {
        let Some(content) = &file.content else { continue };
        let destination = config.output.dir.join(&file.output);

        match writer.write(&destination, content)? {
            WriteResult::Written { path, bytes } => {
                println!("{} Written {} bytes to {}", "✓".green(), bytes, path.display());
            }
            WriteResult::Unchanged { path } => {
                println!("{} Up to date: {}", "✓".green(), path.display());
            }
            WriteResult::DryRun { path, content } => {
                println!("{} Would write to {}:", "[dry-run]".yellow(), path.display());
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(input: PathBuf, config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path, None, None)?;

    let Some(outcome) = compile_inputs(&input, &config, None)? else {
        return Ok(());
    };

    if !outcome.is_success() {
        return Err(CliError::Compile {
            failed: outcome.failed(),
            total: outcome.files.len(),
        });
    }

    let mut stale = Vec::new();
    for file in &outcome.files {
        let Some(content) = &file.content else { continue };
        let destination = config.output.dir.join(&file.output);

        match std::fs::read_to_string(&destination) {
            Ok(existing) if existing.trim() == content.trim() => {}
            _ => stale.push(destination),
        }
    }

    if stale.is_empty() {
        println!("{} Generated modules are up to date", "✓".green());
        Ok(())
    } else {
        for path in &stale {
            println!("{} Out of date: {}", "✗".red(), path.display());
        }
        println!("  Run 'msgforge generate' to update");
        Err(CliError::Validation(format!(
            "{} generated module(s) out of date",
            stale.len()
        )))
    }
}
