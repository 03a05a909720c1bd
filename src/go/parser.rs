use crate::core::Span;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Wrapper around a tree-sitter parser configured for Go.
///
/// Parsers are cheap to construct but not shareable across threads, so
/// callers that fan out over files create one per task.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .context("Failed to load Go grammar")?;
        Ok(Self { parser })
    }

    /// Parse Go source text into a [`SourceUnit`].
    pub fn parse(
        &mut self,
        path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Result<SourceUnit> {
        let path = path.into();
        let source = source.into();
        let tree = self
            .parser
            .parse(&source, None)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(SourceUnit { path, source, tree })
    }

    /// Read a file from disk and parse it.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<SourceUnit> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.parse(path, source)
    }
}

/// A parsed Go file: path, source text, and syntax tree.
///
/// The tree borrows nothing; nodes handed out by [`SourceUnit::root`] borrow
/// from `self`, so the unit must outlive any analysis over it.
pub struct SourceUnit {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl SourceUnit {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// True when tree-sitter recovered from syntax errors anywhere in the
    /// file. Analysis still runs on such trees; matchers abstain at the
    /// damaged nodes.
    pub fn has_parse_errors(&self) -> bool {
        self.root().has_error()
    }

    /// The source text covered by a node. Node boundaries always fall on
    /// character boundaries of the original text, so this cannot slice
    /// through a UTF-8 sequence.
    pub fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// Span for a node, with the 1-based line and 0-based column of its
    /// first byte.
    pub fn span(&self, node: Node) -> Span {
        let start = node.start_position();
        Span::new(
            node.start_byte(),
            node.end_byte(),
            start.row + 1,
            start.column,
        )
    }

    /// Byte offset of the first character of the line containing `byte`.
    pub fn line_start(&self, byte: usize) -> usize {
        let byte = byte.min(self.source.len());
        match self.source[..byte].rfind('\n') {
            Some(i) => i + 1,
            None => 0,
        }
    }

    /// Leading whitespace of the line containing `byte`, up to `byte`
    /// itself. Empty when anything other than spaces or tabs precedes the
    /// offset on its line.
    pub fn line_indent(&self, byte: usize) -> &str {
        let start = self.line_start(byte);
        let byte = byte.min(self.source.len());
        let prefix = &self.source[start..byte];
        if prefix.chars().all(|c| c == ' ' || c == '\t') {
            prefix
        } else {
            ""
        }
    }
}
