//! Human-readable error reports
//!
//! Renders a `CompilerError` against the source text with codespan, pointing
//! at the offending line.

use crate::error::CompilerError;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use termcolor::{ColorChoice, NoColor, StandardStream};

/// Short code identifying the error class
pub fn error_code(error: &CompilerError) -> &'static str {
    match error {
        CompilerError::UnexpectedEof { .. } => "T0001",
        CompilerError::Expected { .. } => "T0002",
        CompilerError::UnexpectedToken { .. } => "T0003",
        CompilerError::InvalidName { .. } => "T0004",
        CompilerError::Duplicate { .. } => "T0005",
        CompilerError::TypeMismatch { .. } => "T0101",
        CompilerError::WrongType { .. } => "T0102",
        CompilerError::UndeclaredVariable { .. } => "T0201",
        CompilerError::UnknownIdentifier { .. } => "T0202",
        CompilerError::UnknownLibrary { .. } => "T0203",
        CompilerError::UnimportedLibrary { .. } => "T0204",
        CompilerError::UnknownMethod { .. } => "T0205",
        CompilerError::NotInsideLoop { .. } => "T0301",
        CompilerError::Semantic { .. } => "T0302",
        CompilerError::Abi { .. } => "T0401",
        CompilerError::Assembler { .. } => "T0402",
        CompilerError::Internal { .. } => "T9999",
    }
}

fn build(
    error: &CompilerError,
    files: &SimpleFiles<String, String>,
    file_id: usize,
) -> Diagnostic<usize> {
    let mut diagnostic = Diagnostic::error()
        .with_message(error.to_string())
        .with_code(error_code(error));

    let range = error
        .line()
        .and_then(|line| line.checked_sub(1))
        .and_then(|index| files.line_range(file_id, index as usize).ok());
    if let Some(range) = range {
        diagnostic = diagnostic.with_labels(vec![Label::primary(file_id, range)]);
    }
    if error.is_internal() {
        diagnostic = diagnostic.with_notes(vec!["this is a compiler bug".to_string()]);
    }
    diagnostic
}

/// Render `error` as plain text
pub fn render(error: &CompilerError, file_name: &str, source: &str) -> String {
    let mut files = SimpleFiles::new();
    let file_id = files.add(file_name.to_string(), source.to_string());
    let diagnostic = build(error, &files, file_id);

    let mut writer = NoColor::new(Vec::new());
    let config = term::Config::default();
    if term::emit(&mut writer, &config, &files, &diagnostic).is_err() {
        return error.to_string();
    }
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

/// Print `error` to stderr, colored when the terminal supports it
pub fn emit(error: &CompilerError, file_name: &str, source: &str) {
    let mut files = SimpleFiles::new();
    let file_id = files.add(file_name.to_string(), source.to_string());
    let diagnostic = build(error, &files, file_id);

    let mut writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();
    if let Err(err) = term::emit(&mut writer, &config, &files, &diagnostic) {
        log::warn!("failed to print diagnostic: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_points_at_line() {
        let source = "contract test {\n    global x: number;\n}\n";
        let error = CompilerError::semantic(2, "something is wrong");
        let text = render(&error, "test.tomb", source);
        assert!(text.contains("T0302"));
        assert!(text.contains("something is wrong"));
        assert!(text.contains("test.tomb:2"));
    }

    #[test]
    fn test_render_without_line() {
        let error = CompilerError::Abi {
            kind: "storage_map".to_string(),
        };
        let text = render(&error, "test.tomb", "");
        assert!(text.contains("storage_map"));
    }
}
