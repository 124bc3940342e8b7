//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Discovery root.
    pub source_dir: PathBuf,
    /// Packages holding annotated types.
    pub package_count: usize,
    /// Annotated types found.
    pub type_count: usize,
    /// Generators that ran, in order.
    pub generators: Vec<String>,
    pub result: GenerationResult,
}

/// Outcome of the pipeline.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files written to disk, in commit order.
    Written(Vec<PathBuf>),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
    /// The pipeline stopped; `written` lists files already on disk.
    Failed {
        written: Vec<PathBuf>,
        error: quill_codegen::Error,
    },
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl GenerateReport {
    /// Hand back the pipeline error, if any, after rendering.
    pub fn finish(self) -> Result<(), quill_codegen::Error> {
        match self.result {
            GenerationResult::Failed { error, .. } => Err(error),
            _ => Ok(()),
        }
    }

    fn render_summary(&self, out: &mut dyn Output) {
        out.key_value("Source", &self.source_dir.display().to_string());
        out.key_value(
            "Found",
            &format!(
                "{} type{} in {} package{}",
                self.type_count,
                plural(self.type_count),
                self.package_count,
                plural(self.package_count)
            ),
        );
        out.key_value("Generators", &self.generators.join(", "));
        out.newline();
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => {
                self.render_summary(out);
                if written.is_empty() {
                    out.preformatted("Nothing to generate");
                    return;
                }
                out.section(&format!("Generated ({})", written.len()));
                for path in written {
                    out.added_item(&path.display().to_string());
                }
            }
            GenerationResult::Preview(files) => {
                for file in files {
                    out.divider(&file.path);
                    out.preformatted(&file.content);
                }
                out.divider("Summary");
                out.preformatted(&format!(
                    "{} file{} would be generated",
                    files.len(),
                    plural(files.len())
                ));
            }
            GenerationResult::Failed { written, .. } => {
                if written.is_empty() {
                    out.warning("nothing was written");
                    return;
                }
                out.warning(&format!(
                    "generation stopped after writing {} file{}",
                    written.len(),
                    plural(written.len())
                ));
                out.section("Written before the failure");
                for path in written {
                    out.added_item(&path.display().to_string());
                }
            }
        }
    }
}

pub(crate) fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
