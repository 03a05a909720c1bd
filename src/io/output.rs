use crate::core::LintResults;
use colored::*;
use std::fmt::Write as FmtWrite;
use std::io::Write;

#[derive(Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_results(&mut self, results: &LintResults) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_results(&mut self, results: &LintResults) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        self.writer.write_all(json.as_bytes())?;
        Ok(())
    }
}

pub struct TerminalWriter;

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for TerminalWriter {
    fn write_results(&mut self, results: &LintResults) -> anyhow::Result<()> {
        print_diagnostics(results);
        print_summary(results);
        Ok(())
    }
}

fn print_diagnostics(results: &LintResults) {
    for diagnostic in &results.diagnostics {
        // columns print 1-based, the way editors jump to them
        println!(
            "{}:{}:{}: {}",
            diagnostic.file.display().to_string().cyan(),
            diagnostic.span.line,
            diagnostic.span.column + 1,
            diagnostic.message
        );
        for fix in &diagnostic.fixes {
            println!("    {} {}", "fix:".green(), fix.description);
        }
    }
    if !results.diagnostics.is_empty() {
        println!();
    }
}

fn print_summary(results: &LintResults) {
    if results.is_clean() {
        println!(
            "{} {} files scanned, no issues found",
            "✓".green(),
            results.files_scanned
        );
        return;
    }
    let issues = format!(
        "{} issue{} in {} file{}",
        results.diagnostics.len(),
        plural(results.diagnostics.len()),
        results.file_count(),
        plural(results.file_count()),
    );
    println!(
        "{} {} ({} fixable)",
        "✗".red(),
        issues.red().bold(),
        results.fixable_count()
    );
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Render results into a string for writing to a file. The terminal
/// format comes back without color escapes.
pub fn format_results_to_string(
    results: &LintResults,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Terminal => {
            let mut out = String::new();
            for diagnostic in &results.diagnostics {
                writeln!(
                    out,
                    "{}:{}:{}: {}",
                    diagnostic.file.display(),
                    diagnostic.span.line,
                    diagnostic.span.column + 1,
                    diagnostic.message
                )?;
                for fix in &diagnostic.fixes {
                    writeln!(out, "    fix: {}", fix.description)?;
                }
            }
            if !results.diagnostics.is_empty() {
                writeln!(out)?;
            }
            if results.is_clean() {
                writeln!(
                    out,
                    "{} files scanned, no issues found",
                    results.files_scanned
                )?;
            } else {
                writeln!(
                    out,
                    "{} issue{} in {} file{} ({} fixable)",
                    results.diagnostics.len(),
                    plural(results.diagnostics.len()),
                    results.file_count(),
                    plural(results.file_count()),
                    results.fixable_count()
                )?;
            }
            Ok(out)
        }
    }
}

pub fn create_writer(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Diagnostic, RuleId, Span, SuggestedFix, TextEdit};
    use std::path::PathBuf;

    fn sample_results() -> LintResults {
        let fix = SuggestedFix::new(
            "Replace with qt.IsNotNil",
            vec![TextEdit::replace(10, 26, "qt.IsNotNil".to_string())],
        );
        let diagnostic = Diagnostic::new(
            RuleId::Negation,
            PathBuf::from("pkg/demo_test.go"),
            Span::new(10, 26, 7, 18),
            "qtlint: use qt.IsNotNil instead of qt.Not(qt.IsNil)",
        )
        .with_fix(fix);
        LintResults::new(3, vec![diagnostic])
    }

    #[test]
    fn json_writer_emits_valid_json() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_results(&sample_results())
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["files_scanned"], 3);
        assert_eq!(value["diagnostics"][0]["rule"], "negation");
        assert_eq!(value["diagnostics"][0]["span"]["line"], 7);
    }

    #[test]
    fn terminal_format_places_location_before_message() {
        let text =
            format_results_to_string(&sample_results(), &OutputFormat::Terminal).unwrap();
        assert!(text.contains(
            "pkg/demo_test.go:7:19: qtlint: use qt.IsNotNil instead of qt.Not(qt.IsNil)"
        ));
        assert!(text.contains("fix: Replace with qt.IsNotNil"));
        assert!(text.contains("1 issue in 1 file (1 fixable)"));
    }

    #[test]
    fn clean_run_reports_scanned_count() {
        let results = LintResults::new(5, Vec::new());
        let text = format_results_to_string(&results, &OutputFormat::Terminal).unwrap();
        assert_eq!(text, "5 files scanned, no issues found\n");
    }
}
