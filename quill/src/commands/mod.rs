mod check;
mod completions;
mod generate;
mod list;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use list::ListCommand;
use quill_manifest::{MANIFEST_FILE, QuillToml};

use crate::ops::Settings;

/// Extension trait for exiting on diagnostics with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for quill_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(miette::Report::new(*e)),
        }
    }
}

impl<T> UnwrapOrExit<T> for std::result::Result<T, quill_codegen::Error> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(miette::Report::new(e)),
        }
    }
}

fn exit_with(report: miette::Report) -> ! {
    eprintln!("{:?}", report);
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "Run code generators over annotated Rust types")]
pub(crate) struct Cli {
    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::List(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code for annotated types and write it
    Generate(GenerateCommand),

    /// Compose and validate generated code without writing it
    Check(CheckCommand),

    /// List the built-in generators
    List(ListCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Options shared by commands that run the pipeline.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// Path to quill.toml (defaults to ./quill.toml, optional)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to scan (overrides [generate].source)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Marker recognised in doc comments (overrides [generate].directive)
    #[arg(long)]
    pub directive: Option<String>,

    /// Generator to run; repeat for several (overrides [generate].generators)
    #[arg(short, long = "generator")]
    pub generators: Vec<String>,

    /// Glob of files to skip, relative to the source; repeat for several (adds to [generate].exclude)
    #[arg(long)]
    pub exclude: Vec<String>,
}

impl RunArgs {
    /// Load the manifest and apply the flags on top of it.
    pub fn settings(&self) -> Settings {
        let toml = load_manifest(self.config.as_ref());
        let mut settings = Settings::from_manifest(&toml);

        if let Some(source) = &self.source {
            settings.source = source.clone();
        }
        if let Some(directive) = &self.directive {
            settings.directive = directive.clone();
        }
        if !self.generators.is_empty() {
            settings.generators = Some(self.generators.clone());
        }
        settings.exclude.extend(self.exclude.iter().cloned());
        settings
    }
}

/// An explicit `--config` must exist; the default one is optional.
pub(crate) fn load_manifest(config: Option<&PathBuf>) -> QuillToml {
    match config {
        Some(path) => QuillToml::open(path).unwrap_or_exit(),
        None => QuillToml::open_or_default(MANIFEST_FILE).unwrap_or_exit(),
    }
}
