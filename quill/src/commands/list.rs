use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use quill_codegen_rust::generators;

use super::load_manifest;
use crate::reports::{ListReport, Report, TerminalOutput};

#[derive(Args)]
pub struct ListCommand {
    /// Path to quill.toml (defaults to ./quill.toml, optional)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let toml = load_manifest(self.config.as_ref());
        let selection = toml.manifest().generate.generators.as_ref();

        let report = ListReport {
            generators: generators::builtin()?
                .names()
                .into_iter()
                .map(|name| {
                    let selected = selection.is_none_or(|names| names.iter().any(|n| n == name));
                    (name.to_string(), selected)
                })
                .collect(),
        };

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
