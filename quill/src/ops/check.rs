//! Check operation - compose and validate without writing.

use eyre::Result;

use super::{Settings, counts};
use crate::reports::CheckReport;

/// Execute the check operation.
pub fn check(settings: &Settings) -> Result<CheckReport> {
    let app = settings.app()?;
    let (package_count, type_count) = counts(&app);

    Ok(CheckReport {
        source_dir: settings.source.clone(),
        package_count,
        type_count,
        result: app.check(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use quill_codegen::Error;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_check_counts_files() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("shapes.rs"),
            "/// +gen\npub struct Square;\n/// +gen type_name\npub enum Kind { A }\n",
        )
        .unwrap();
        let settings = Settings {
            source: temp.path().to_path_buf(),
            directive: "+gen".to_string(),
            generators: None,
            single_file: Vec::new(),
            exclude: Vec::new(),
        };

        let report = check(&settings).unwrap();

        assert_eq!(report.type_count, 2);
        assert_eq!(report.result.as_ref().ok(), Some(&3));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_check_reports_duplicate_output() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("a.rs"),
            "/// +gen type_name\npub struct Foo;\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("b.rs"),
            "/// +gen type_name\npub struct FOO;\n",
        )
        .unwrap();
        let settings = Settings {
            source: temp.path().to_path_buf(),
            directive: "+gen".to_string(),
            generators: None,
            single_file: Vec::new(),
            exclude: Vec::new(),
        };

        let report = check(&settings).unwrap();

        assert!(matches!(report.result, Err(Error::DuplicateOutput { .. })));
    }
}
