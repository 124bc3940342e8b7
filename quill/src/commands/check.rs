use clap::Args;
use eyre::Result;

use super::{RunArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: RunArgs,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::check(&self.args.settings())?;

        report.render(&mut TerminalOutput::new());
        report.finish().unwrap_or_exit();
        Ok(())
    }
}
