//! The `victoria` command-line driver.
//!
//! Run with: `victoria run program.vic`

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use victoria_cli::{Interpreter, InterpreterConfig};
use victoria_diagnostics::{Diagnostic, JokePolicy, Renderer};

/// Maximum source file size in bytes (1MB)
const MAX_SOURCE_SIZE: usize = 1_000_000;

#[derive(Parser, Debug)]
#[command(name = "victoria")]
#[command(about = "Victoria: a small scripting language with friendly diagnostics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum nested function calls before a recursion error
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Never append a joke to error reports
    #[arg(long, global = true)]
    no_jokes: bool,

    /// When to color diagnostics
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// How diagnostics are written to stderr
    #[arg(long, value_enum, global = true, default_value_t = ErrorFormat::Human)]
    error_format: ErrorFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a Victoria program
    Run {
        /// Path to .vic source file
        file: PathBuf,
    },

    /// Parse a source file and report syntax errors
    Check {
        /// Path to .vic source file
        file: PathBuf,
    },

    /// Print the program in canonical form
    Fmt {
        /// Path to .vic source file
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ErrorFormat {
    Human,
    Plain,
    Json,
}

/// Writes diagnostics to stderr in the selected format.
struct Reporter {
    format: ErrorFormat,
    renderer: Renderer,
    source: Arc<str>,
}

impl Reporter {
    fn report(&self, diag: Diagnostic) {
        let diag = if diag.source.is_none() {
            diag.with_source(self.source.clone())
        } else {
            diag
        };
        match self.format {
            ErrorFormat::Human => eprint!("{}", self.renderer.render(&diag)),
            ErrorFormat::Plain => eprint!("{}", Renderer::render_plain(&diag)),
            ErrorFormat::Json => match serde_json::to_string(&diag) {
                Ok(line) => eprintln!("{line}"),
                Err(err) => tracing::warn!(%err, code = %diag.code, "failed to serialize diagnostic"),
            },
        }
    }

    fn report_all(&self, diagnostics: Vec<Diagnostic>) {
        for diag in diagnostics {
            self.report(diag);
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli);

    match &cli.command {
        Commands::Run { file } => cmd_run(&cli, config, file),
        Commands::Check { file } => cmd_check(&cli, config, file),
        Commands::Fmt { file } => cmd_fmt(&cli, config, file),
    }
}

/// Environment settings, then command-line flags on top.
fn resolve_config(cli: &Cli) -> InterpreterConfig {
    let mut config = InterpreterConfig::from_env();
    if let Some(depth) = cli.max_depth {
        config.max_call_depth = depth.max(1);
    }
    if cli.no_jokes {
        config.jokes = JokePolicy::Off;
    }
    config.color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => config.color && std::io::stderr().is_terminal(),
    };
    colored::control::set_override(config.color);
    config
}

fn load_source(path: &Path) -> Result<Arc<str>> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if src.len() > MAX_SOURCE_SIZE {
        bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }
    Ok(Arc::from(src))
}

fn reporter(cli: &Cli, config: &InterpreterConfig, source: Arc<str>) -> Reporter {
    Reporter {
        format: cli.error_format,
        renderer: Renderer::new(config.color, config.jokes),
        source,
    }
}

fn cmd_run(cli: &Cli, config: InterpreterConfig, path: &Path) -> Result<ExitCode> {
    let source = load_source(path)?;
    let reporter = reporter(cli, &config, source.clone());
    let file = path.display().to_string();

    let mut interpreter = Interpreter::new(config);
    let result = interpreter.run_source(&file, &source);
    let advisories = interpreter.take_advisories();
    let errors = result.err().map(|err| err.diagnostics());

    reporter.report_all(advisories);
    match errors {
        Some(diagnostics) => {
            tracing::debug!(count = diagnostics.len(), "run failed");
            reporter.report_all(diagnostics);
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

fn cmd_check(cli: &Cli, config: InterpreterConfig, path: &Path) -> Result<ExitCode> {
    let source = load_source(path)?;
    let reporter = reporter(cli, &config, source.clone());
    match victoria_parse::parse_str(&path.display().to_string(), &source) {
        Ok(program) => {
            println!(
                "{}: ok ({} statements)",
                path.display(),
                program.statements.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            reporter.report_all(failure.diagnostics);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_fmt(cli: &Cli, config: InterpreterConfig, path: &Path) -> Result<ExitCode> {
    let source = load_source(path)?;
    let reporter = reporter(cli, &config, source.clone());
    match victoria_parse::parse_str(&path.display().to_string(), &source) {
        Ok(program) => {
            print!("{program}");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            reporter.report_all(failure.diagnostics);
            Ok(ExitCode::FAILURE)
        }
    }
}
