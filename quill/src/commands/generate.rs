use clap::Args;
use eyre::Result;

use super::{RunArgs, UnwrapOrExit};
use crate::{
    ops::{self, generate::GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: RunArgs,

    /// Print the generated files instead of writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let settings = self.args.settings();
        let report = ops::generate(
            &settings,
            GenerateOptions {
                dry_run: self.dry_run,
            },
        )?;

        report.render(&mut TerminalOutput::new());
        report.finish().unwrap_or_exit();
        Ok(())
    }
}
