//! Checks run after deserialization.

use std::collections::HashSet;

use miette::SourceSpan;

use crate::{Manifest, Result, SourceContext};

pub(crate) fn validate_manifest(manifest: &Manifest, ctx: &SourceContext) -> Result<()> {
    let directive = &manifest.generate.directive;
    if directive.is_empty() {
        return Err(ctx.validation_error_at(
            "directive must not be empty",
            find_value_span(ctx.src(), "directive"),
        ));
    }
    if directive.chars().any(char::is_whitespace) {
        return Err(ctx.validation_error_at(
            format!("directive '{}' must not contain whitespace", directive),
            find_value_span(ctx.src(), "directive"),
        ));
    }

    if let Some(generators) = &manifest.generate.generators {
        let mut seen = HashSet::new();
        for name in generators {
            if !seen.insert(name.as_str()) {
                return Err(ctx.validation_error_at(
                    format!("generator '{}' is listed twice", name),
                    find_array_item_span(ctx.src(), "generators", name, 1),
                ));
            }
        }
    }

    for (index, pattern) in manifest.generate.exclude.iter().enumerate() {
        if let Err(err) = glob::Pattern::new(pattern) {
            let nth = manifest.generate.exclude[..index]
                .iter()
                .filter(|p| *p == pattern)
                .count();
            return Err(ctx.validation_error_at(
                format!("invalid exclude pattern '{}': {}", pattern, err.msg),
                find_array_item_span(ctx.src(), "exclude", pattern, nth),
            ));
        }
    }

    if manifest.packages.keys().any(|dir| dir.trim().is_empty()) {
        return Err(ctx.validation_error_at(
            "package directory must not be empty",
            find_string_span(ctx.src(), "", 0),
        ));
    }

    Ok(())
}

/// Find the span of the value assigned to `key`, e.g. `"+gen"` in
/// `directive = "+gen"`.
pub(crate) fn find_value_span(src: &str, key: &str) -> Option<SourceSpan> {
    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if let Some(rest) = trimmed.strip_prefix(key) {
            let after_key = rest.trim_start();
            if let Some(value) = after_key.strip_prefix('=') {
                let value_start = value.len() - value.trim_start().len();
                let value = value.trim();
                let start = offset + indent + key.len() + (rest.len() - after_key.len()) + 1
                    + value_start;
                return Some(SourceSpan::from((start, value.len())));
            }
        }
        offset += line.len();
    }
    None
}

/// Find the `nth` (zero-based) occurrence of `"value"` inside the array
/// assigned to `key`.
pub(crate) fn find_array_item_span(
    src: &str,
    key: &str,
    value: &str,
    nth: usize,
) -> Option<SourceSpan> {
    let start = find_value_span(src, key)?.offset();
    let array = &src[start..];
    if !array.starts_with('[') {
        return None;
    }
    let array = &array[..=array.find(']')?];
    let quoted = format!("\"{}\"", value);
    array
        .match_indices(&quoted)
        .nth(nth)
        .map(|(pos, _)| SourceSpan::from((start + pos, quoted.len())))
}

/// Find the `nth` (zero-based) occurrence of `"value"` in the source.
pub(crate) fn find_string_span(src: &str, value: &str, nth: usize) -> Option<SourceSpan> {
    let quoted = format!("\"{}\"", value);
    src.match_indices(&quoted)
        .nth(nth)
        .map(|(pos, _)| SourceSpan::from((pos, quoted.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn validation_span(src: &str) -> (String, Option<SourceSpan>) {
        match *src.parse::<Manifest>().unwrap_err() {
            Error::Validation { message, span, .. } => (message, span),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_directive() {
        let src = "[generate]\ndirective = \"\"\n";
        let (message, span) = validation_span(src);
        assert_eq!(message, "directive must not be empty");
        let span = span.unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "\"\"");
    }

    #[test]
    fn test_directive_with_whitespace() {
        let src = "[generate]\ndirective = \"+ gen\"\n";
        let (message, span) = validation_span(src);
        assert!(message.contains("whitespace"));
        let span = span.unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "\"+ gen\"");
    }

    #[test]
    fn test_duplicate_generator_points_at_second() {
        let src = "[generate]\ngenerators = [\"display\", \"type_name\", \"display\"]\n";
        let (message, span) = validation_span(src);
        assert_eq!(message, "generator 'display' is listed twice");
        assert_eq!(span.unwrap().offset(), src.rfind("\"display\"").unwrap());
    }

    #[test]
    fn test_duplicate_generator_ignores_same_string_outside_array() {
        let src = "[packages.\"display\"]\nsingle_file = true\n\n[generate]\ngenerators = [\n  \"display\",\n  \"type_name\",\n  \"display\",\n]\n";
        let (_, span) = validation_span(src);
        assert_eq!(span.unwrap().offset(), src.rfind("\"display\"").unwrap());
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let src = "[generate]\nexclude = [\"legacy\", \"models/[abc\"]\n";
        let (message, span) = validation_span(src);
        assert!(message.starts_with("invalid exclude pattern 'models/[abc'"));
        let span = span.unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "\"models/[abc\"");
    }

    #[test]
    fn test_find_array_item_span_requires_array() {
        assert!(find_array_item_span("generators = \"display\"\n", "generators", "display", 0).is_none());
        assert!(find_array_item_span("[generate]\n", "generators", "display", 0).is_none());
    }

    #[test]
    fn test_empty_package_key() {
        let (message, _) = validation_span("[packages.\"\"]\nsingle_file = true\n");
        assert_eq!(message, "package directory must not be empty");
    }

    #[test]
    fn test_find_value_span_missing_key() {
        assert!(find_value_span("[generate]\n", "directive").is_none());
    }
}
