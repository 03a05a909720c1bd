pub mod errors;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of a finding inside a single Go source file.
///
/// Byte offsets are half-open and index into the file's UTF-8 text; `line`
/// is 1-based and `column` is a 0-based byte column, matching the positions
/// tree-sitter reports.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open overlap test on byte offsets. Touching ranges do not
    /// overlap, so a pure insertion at another edit's boundary is allowed.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A single splice into the original source text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }

    pub fn insert(at: usize, new_text: impl Into<String>) -> Self {
        Self::replace(at, at, new_text)
    }

    pub fn overlaps(&self, other: &TextEdit) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A machine-applicable rewrite attached to a diagnostic.
///
/// Edits are kept sorted by start offset and never overlap each other.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedFix {
    pub description: String,
    pub edits: Vec<TextEdit>,
}

impl SuggestedFix {
    pub fn new(description: impl Into<String>, mut edits: Vec<TextEdit>) -> Self {
        edits.sort_by_key(|e| (e.start, e.end));
        Self {
            description: description.into(),
            edits,
        }
    }
}

/// Identifies which pattern produced a diagnostic.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleId {
    /// `qt.Not(qt.IsNil)` and friends where a direct checker exists.
    Negation,
    /// `len(x)` compared with `qt.Equals` instead of `qt.HasLen`.
    HasLen,
    /// `x == nil` or `x != nil` asserted with `qt.IsTrue`/`qt.IsFalse`.
    NilCmp,
    /// General `x == y` asserted with `qt.IsTrue`/`qt.IsFalse`.
    EqIsTrue,
    /// `if err != nil { t.Fatal(...) }` instead of `c.Assert(err, qt.IsNil)`.
    ErrCheck,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Negation => "negation",
            RuleId::HasLen => "haslen",
            RuleId::NilCmp => "nilcmp",
            RuleId::EqIsTrue => "eqistrue",
            RuleId::ErrCheck => "errcheck",
        }
    }

    pub fn all() -> &'static [RuleId] {
        &[
            RuleId::Negation,
            RuleId::HasLen,
            RuleId::NilCmp,
            RuleId::EqIsTrue,
            RuleId::ErrCheck,
        ]
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One finding: a non-idiomatic assertion plus optional rewrites.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub rule: RuleId,
    pub file: PathBuf,
    pub span: Span,
    pub message: String,
    pub fixes: Vec<SuggestedFix>,
}

impl Diagnostic {
    pub fn new(rule: RuleId, file: PathBuf, span: Span, message: impl Into<String>) -> Self {
        Self {
            rule,
            file,
            span,
            message: message.into(),
            fixes: Vec::new(),
        }
    }

    pub fn with_fix(mut self, fix: SuggestedFix) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn is_fixable(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Aggregated output of one lint run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LintResults {
    pub timestamp: DateTime<Utc>,
    pub files_scanned: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl LintResults {
    pub fn new(files_scanned: usize, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            timestamp: Utc::now(),
            files_scanned,
            diagnostics,
        }
    }

    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_fixable()).count()
    }

    pub fn file_count(&self) -> usize {
        let mut files: Vec<&PathBuf> = self.diagnostics.iter().map(|d| &d.file).collect();
        files.sort();
        files.dedup();
        files.len()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
