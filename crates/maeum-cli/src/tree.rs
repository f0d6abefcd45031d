//! Working-directory scan for `.` snapshots.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use maeum_core::graph::imports::extract_references;
use maeum_core::{FileEntry, TreeSource};
use maeum_types::Result;
use maeum_types::config::TreeConfig;

/// Scans a directory for source files on every call.
///
/// Paths are reported relative to the root with `/` separators, sorted.
/// Each file's imports become its declared dependencies.
pub struct DirectoryTree {
    root: PathBuf,
    config: TreeConfig,
}

impl DirectoryTree {
    pub fn new(root: impl Into<PathBuf>, config: TreeConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.config.ignore_dirs.iter().any(|d| d == name)
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

impl TreeSource for DirectoryTree {
    fn files(&self) -> Result<Vec<FileEntry>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !self.is_ignored(&e.file_name().to_string_lossy())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.is_source(entry.path()) {
                continue;
            }
            if files.len() >= self.config.max_files {
                warn!(max_files = self.config.max_files, "tree scan truncated");
                break;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let references = match std::fs::read_to_string(entry.path()) {
                Ok(content) => extract_references(&path, &content),
                Err(e) => {
                    debug!(path = %path, error = %e, "unreadable source file");
                    Vec::new()
                }
            };
            files.push(FileEntry { path, references });
        }

        debug!(root = %self.root.display(), files = files.len(), "tree scanned");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn scans_sources_with_references() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/user/user.controller.ts", "import { S } from './user.service';\n");
        write(dir.path(), "src/user/user.service.ts", "export class S {}\n");
        write(dir.path(), "README.md", "# readme\n");
        write(dir.path(), "node_modules/pkg/index.js", "module.exports = 1;\n");

        let tree = DirectoryTree::new(dir.path(), TreeConfig::default());
        let files = tree.files().unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/user/user.controller.ts", "src/user/user.service.ts"]);
        assert_eq!(files[0].references, vec!["./user.service"]);
        assert!(files[1].references.is_empty());
    }

    #[test]
    fn max_files_truncates() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            write(dir.path(), &format!("src/m{i}.py"), "");
        }
        let config = TreeConfig {
            max_files: 3,
            ..TreeConfig::default()
        };
        let files = DirectoryTree::new(dir.path(), config).files().unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn extension_filter_is_configurable() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.rs", "mod b;\n");
        write(dir.path(), "lib/b.py", "");
        let config = TreeConfig {
            extensions: vec!["RS".into()],
            ..TreeConfig::default()
        };
        let files = DirectoryTree::new(dir.path(), config).files().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].references, vec!["b"]);
    }

    #[test]
    fn missing_root_is_empty() {
        let tree = DirectoryTree::new("/definitely/not/here", TreeConfig::default());
        assert!(tree.files().unwrap().is_empty());
    }
}
