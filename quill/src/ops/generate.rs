//! Generate operation - discover, compose, validate and write.

use eyre::Result;

use super::{Settings, counts};
use crate::reports::{GenerateReport, GenerationResult, PreviewFile};

/// Options for the generate operation.
pub struct GenerateOptions {
    /// Print the normalized files instead of writing them.
    pub dry_run: bool,
}

/// Execute the generate operation.
///
/// Discovery and set-up failures are returned as errors. Failures of the
/// pipeline itself end up in the report so the files written before them
/// can be shown.
pub fn generate(settings: &Settings, opts: GenerateOptions) -> Result<GenerateReport> {
    let app = settings.app()?;
    let (package_count, type_count) = counts(&app);

    let result = if opts.dry_run {
        match app.preview() {
            Ok(files) => GenerationResult::Preview(
                files
                    .into_iter()
                    .map(|file| PreviewFile {
                        path: file.path.display().to_string(),
                        content: String::from_utf8_lossy(&file.content).into_owned(),
                    })
                    .collect(),
            ),
            Err(error) => GenerationResult::Failed {
                written: Vec::new(),
                error,
            },
        }
    } else {
        match app.write_all() {
            Ok(written) => GenerationResult::Written(written),
            Err(err) => GenerationResult::Failed {
                written: err.written,
                error: err.source,
            },
        }
    };

    Ok(GenerateReport {
        source_dir: settings.source.clone(),
        package_count,
        type_count,
        generators: app.registry().names().into_iter().map(str::to_string).collect(),
        result,
    })
}
