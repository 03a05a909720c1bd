use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Collects the Go files to lint from a set of root paths.
///
/// Files named directly are taken as-is; directories are walked
/// recursively. `vendor` and `testdata` trees are skipped, matching the
/// convention of the Go tools themselves.
pub struct FileWalker {
    paths: Vec<PathBuf>,
}

impl FileWalker {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in &self.paths {
            if root.is_file() {
                if has_go_extension(root) {
                    files.push(root.clone());
                }
                continue;
            }
            let walker = WalkBuilder::new(root)
                .hidden(false)
                .git_ignore(true)
                .build();

            for entry in walker {
                let entry = entry?;
                let path = entry.path();

                if path.is_file() && should_process(path) {
                    files.push(path.to_path_buf());
                }
            }
        }
        // deterministic output regardless of directory iteration order
        files.sort();
        files.dedup();
        Ok(files)
    }
}

fn has_go_extension(path: &Path) -> bool {
    path.extension().map(|ext| ext == "go").unwrap_or(false)
}

fn should_process(path: &Path) -> bool {
    if !has_go_extension(path) {
        return false;
    }
    !path.components().any(|c| {
        matches!(
            c,
            Component::Normal(name) if name == "vendor" || name == "testdata" || name == ".git"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_go_files_and_skips_vendor() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pkg")).unwrap();
        fs::create_dir_all(root.join("vendor/dep")).unwrap();
        fs::create_dir_all(root.join("pkg/testdata")).unwrap();
        fs::write(root.join("main.go"), "package main\n").unwrap();
        fs::write(root.join("pkg/pkg_test.go"), "package pkg\n").unwrap();
        fs::write(root.join("pkg/README.md"), "docs\n").unwrap();
        fs::write(root.join("vendor/dep/dep.go"), "package dep\n").unwrap();
        fs::write(root.join("pkg/testdata/fixture.go"), "package fixture\n").unwrap();

        let files = FileWalker::new(vec![root.to_path_buf()]).walk().unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["main.go", "pkg/pkg_test.go"]);
    }

    #[test]
    fn explicit_file_arguments_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let go = dir.path().join("one.go");
        let txt = dir.path().join("two.txt");
        fs::write(&go, "package one\n").unwrap();
        fs::write(&txt, "not go\n").unwrap();

        let files = FileWalker::new(vec![go.clone(), txt]).walk().unwrap();
        assert_eq!(files, vec![go]);
    }

    #[test]
    fn duplicate_roots_collapse() {
        let dir = tempfile::tempdir().unwrap();
        let go = dir.path().join("one.go");
        fs::write(&go, "package one\n").unwrap();

        let files = FileWalker::new(vec![dir.path().to_path_buf(), go.clone()])
            .walk()
            .unwrap();
        assert_eq!(files, vec![go]);
    }
}
