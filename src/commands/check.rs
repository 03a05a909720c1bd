use crate::core::{Diagnostic, LintResults};
use crate::go::GoParser;
use crate::io::walker::FileWalker;
use crate::io::{self, fixer, output};
use crate::rules::{lint_unit, LintOptions};
use crate::{cli, config};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub struct CheckConfig {
    pub paths: Vec<PathBuf>,
    pub format: cli::OutputFormat,
    pub output: Option<PathBuf>,
    pub fix: bool,
    pub errcheck_fix: bool,
    pub lib_path: Option<String>,
    pub no_parallel: bool,
}

struct FileOutcome {
    diagnostics: Vec<Diagnostic>,
    fixes_applied: usize,
    linted: bool,
}

impl FileOutcome {
    fn skipped() -> Self {
        Self {
            diagnostics: Vec::new(),
            fixes_applied: 0,
            linted: false,
        }
    }
}

/// Run the lint pass over every Go file reachable from the configured
/// paths. Returns `true` when no diagnostics remain after any fixes.
pub fn run_check(config: CheckConfig) -> Result<bool> {
    let options = merge_options(&config, &config::load_config());

    let files = FileWalker::new(config.paths.clone()).walk()?;
    log::info!("linting {} Go file(s)", files.len());

    let outcomes: Vec<FileOutcome> = if config.no_parallel {
        files
            .iter()
            .map(|path| lint_file(path, &options, config.fix))
            .collect()
    } else {
        files
            .par_iter()
            .map(|path| lint_file(path, &options, config.fix))
            .collect()
    };

    let mut files_scanned = 0usize;
    let mut fixes_applied = 0usize;
    let mut diagnostics = Vec::new();
    for outcome in outcomes {
        if outcome.linted {
            files_scanned += 1;
        }
        fixes_applied += outcome.fixes_applied;
        diagnostics.extend(outcome.diagnostics);
    }
    let results = LintResults::new(files_scanned, diagnostics);

    if config.fix {
        log::info!("applied {fixes_applied} fix(es)");
    }

    let format = config.format.into();
    match config.output {
        Some(path) => {
            let content = output::format_results_to_string(&results, &format)?;
            io::write_file(&path, &content)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
        }
        None => {
            let mut writer = output::create_writer(format);
            writer.write_results(&results)?;
        }
    }

    Ok(results.is_clean())
}

/// CLI flags win over the configuration file; `--errcheck-fix` can only
/// enable the rewrite, never disable a config that turned it on.
fn merge_options(config: &CheckConfig, file_config: &config::QtlintConfig) -> LintOptions {
    let mut options = file_config.to_lint_options();
    if let Some(lib_path) = &config.lib_path {
        options.library_path = lib_path.clone();
    }
    options.errcheck_fix = options.errcheck_fix || config.errcheck_fix;
    options
}

fn lint_file(path: &Path, options: &LintOptions, fix: bool) -> FileOutcome {
    match process_file(path, options, fix) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("{}: {e:#}", path.display());
            FileOutcome::skipped()
        }
    }
}

fn process_file(path: &Path, options: &LintOptions, fix: bool) -> Result<FileOutcome> {
    let source = io::read_file(path)?;
    let mut parser = GoParser::new()?;
    let unit = parser.parse(path, source)?;
    if unit.has_parse_errors() {
        log::warn!("{}: skipping file with syntax errors", path.display());
        return Ok(FileOutcome::skipped());
    }

    let diagnostics = lint_unit(&unit, options);
    if !fix || diagnostics.iter().all(|d| d.fixes.is_empty()) {
        return Ok(FileOutcome {
            diagnostics,
            fixes_applied: 0,
            linted: true,
        });
    }

    let (fixed, applied) = fixer::apply_fixes(path, unit.source(), &diagnostics)?;
    if applied == 0 {
        return Ok(FileOutcome {
            diagnostics,
            fixes_applied: 0,
            linted: true,
        });
    }
    io::write_file(path, &fixed)?;

    // Re-lint the rewritten text so only unresolved findings are reported.
    let unit = parser.parse(path, fixed)?;
    let diagnostics = lint_unit(&unit, options);
    Ok(FileOutcome {
        diagnostics,
        fixes_applied: applied,
        linted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    fn check_config(paths: Vec<PathBuf>, fix: bool) -> CheckConfig {
        CheckConfig {
            paths,
            format: cli::OutputFormat::Terminal,
            output: None,
            fix,
            errcheck_fix: false,
            lib_path: None,
            no_parallel: true,
        }
    }

    #[test]
    fn merge_prefers_cli_library_path() {
        let config = CheckConfig {
            lib_path: Some("example.com/qt".to_string()),
            ..check_config(vec![], false)
        };
        let options = merge_options(&config, &config::QtlintConfig::default());
        assert_eq!(options.library_path, "example.com/qt");
    }

    #[test]
    fn merge_keeps_errcheck_fix_from_file_config() {
        let file_config = config::QtlintConfig {
            errcheck_fix: true,
            ..config::QtlintConfig::default()
        };
        let options = merge_options(&check_config(vec![], false), &file_config);
        assert!(options.errcheck_fix);
    }

    #[test]
    fn fix_rewrites_file_and_reports_clean() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("demo_test.go");
        fs::write(
            &path,
            indoc! {r#"
                package demo

                import (
                	qt "github.com/frankban/quicktest"
                	"testing"
                )

                func TestDemo(t *testing.T) {
                	c := qt.New(t)
                	c.Assert(len(s), qt.Equals, 3)
                }
            "#},
        )
        .unwrap();

        let outcome = lint_file(&path, &LintOptions::default(), true);
        assert!(outcome.linted);
        assert_eq!(outcome.fixes_applied, 1);
        assert!(outcome.diagnostics.is_empty());

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("c.Assert(s, qt.HasLen, 3)"));
    }

    #[test]
    fn unparseable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken_test.go");
        fs::write(&path, "package demo\n\nfunc TestX(t *testing.T) {\n").unwrap();

        let outcome = lint_file(&path, &LintOptions::default(), false);
        assert!(!outcome.linted);
        assert!(outcome.diagnostics.is_empty());
    }
}
