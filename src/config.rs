//! Configuration loading for qtlint.
//!
//! Settings live in a `.qtlint.toml` found in the working directory or
//! one of its ancestors. A malformed file warns and falls back to the
//! defaults rather than aborting the run.

use crate::rules::{LintOptions, DEFAULT_LIBRARY_PATH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".qtlint.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QtlintConfig {
    /// Import path of the assertion library to match against.
    #[serde(default = "default_library_path")]
    pub library_path: String,
    /// Offer machine-applicable rewrites for guarded fatals.
    #[serde(default)]
    pub errcheck_fix: bool,
}

fn default_library_path() -> String {
    DEFAULT_LIBRARY_PATH.to_string()
}

impl Default for QtlintConfig {
    fn default() -> Self {
        Self {
            library_path: default_library_path(),
            errcheck_fix: false,
        }
    }
}

impl QtlintConfig {
    pub fn to_lint_options(&self) -> LintOptions {
        LintOptions {
            library_path: self.library_path.clone(),
            errcheck_fix: self.errcheck_fix,
        }
    }
}

fn try_load_config_from_path(config_path: &Path) -> Option<QtlintConfig> {
    let contents = match std::fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match toml::from_str::<QtlintConfig>(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to parse {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load configuration starting from `start_dir`, walking up the
/// directory hierarchy.
pub fn load_config_from(start_dir: PathBuf) -> QtlintConfig {
    directory_ancestors(start_dir, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_default()
}

/// Load configuration relative to the current working directory.
pub fn load_config() -> QtlintConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return QtlintConfig::default();
        }
    };
    load_config_from(current)
}

/// Commented template written by `qtlint init`.
pub fn default_config_toml() -> String {
    format!(
        r#"# qtlint configuration

# Import path of the assertion library whose checkers are matched.
library_path = "{DEFAULT_LIBRARY_PATH}"

# Offer machine-applicable rewrites for `if err != nil {{ t.Fatal(err) }}`
# guards. The rewrite moves the failure report to a different line, so it
# is off by default.
errcheck_fix = false
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().to_path_buf());
        assert_eq!(config.library_path, DEFAULT_LIBRARY_PATH);
        assert!(!config.errcheck_fix);
    }

    #[test]
    fn reads_settings_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "library_path = \"example.com/fork/quicktest\"\nerrcheck_fix = true\n",
        )
        .unwrap();
        let config = load_config_from(dir.path().to_path_buf());
        assert_eq!(config.library_path, "example.com/fork/quicktest");
        assert!(config.errcheck_fix);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "errcheck_fix = true\n").unwrap();
        let config = load_config_from(dir.path().to_path_buf());
        assert_eq!(config.library_path, DEFAULT_LIBRARY_PATH);
        assert!(config.errcheck_fix);
    }

    #[test]
    fn malformed_file_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "library_path = [1, 2]\n").unwrap();
        let config = load_config_from(dir.path().to_path_buf());
        assert_eq!(config.library_path, DEFAULT_LIBRARY_PATH);
    }

    #[test]
    fn ancestor_directories_are_searched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "errcheck_fix = true\n",
        )
        .unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        let config = load_config_from(nested);
        assert!(config.errcheck_fix);
    }

    #[test]
    fn template_parses_back_to_defaults() {
        let config: QtlintConfig = toml::from_str(&default_config_toml()).unwrap();
        assert_eq!(config.library_path, DEFAULT_LIBRARY_PATH);
        assert!(!config.errcheck_fix);
    }
}
