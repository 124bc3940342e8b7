//! Check command report data structures.

use std::path::PathBuf;

use super::{
    generate::plural,
    output::{Output, Report},
};

/// Report data from a validation-only run.
#[derive(Debug)]
pub struct CheckReport {
    pub source_dir: PathBuf,
    pub package_count: usize,
    pub type_count: usize,
    /// Number of files that would be written, or the pipeline error.
    pub result: Result<usize, quill_codegen::Error>,
}

impl CheckReport {
    pub fn finish(self) -> Result<(), quill_codegen::Error> {
        self.result.map(drop)
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        if let Ok(files) = &self.result {
            out.preformatted(&format!(
                "✓ {} type{} in {} package{} under {}",
                self.type_count,
                plural(self.type_count),
                self.package_count,
                plural(self.package_count),
                self.source_dir.display()
            ));
            out.preformatted(&format!(
                "  {} file{} would be generated",
                files,
                plural(*files)
            ));
        }
    }
}
