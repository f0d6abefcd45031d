//! Pasted directory listings.
//!
//! Accepts both flat path lists (`src/user/user.service.ts` per line) and
//! rendered trees (`├── user` / `│   └── user.service.ts`). Nesting is
//! recovered from the width of each line's decoration.

use crate::detector::{is_source_path, strip_tree_decoration};

use super::FileEntry;

/// Parse a listing into source-file entries, in listing order.
///
/// Directory lines (trailing `/` or no extension) extend the current
/// prefix; non-source files are skipped. Listings carry no contents, so
/// entries have no references.
pub fn parse_listing(text: &str) -> Vec<FileEntry> {
    let mut dirs: Vec<(usize, String)> = Vec::new();
    let mut files = Vec::new();

    for line in text.lines() {
        let (width, rest) = strip_tree_decoration(line);
        let Some(name) = rest.split_whitespace().next() else {
            continue;
        };
        if name == "." || name == "./" {
            continue;
        }
        while dirs.last().is_some_and(|(w, _)| *w >= width) {
            dirs.pop();
        }

        let last = name.trim_end_matches('/').rsplit('/').next().unwrap_or(name);
        if name.ends_with('/') || !last.contains('.') {
            dirs.push((width, name.trim_end_matches('/').to_string()));
            continue;
        }

        let path = if dirs.is_empty() {
            name.to_string()
        } else {
            let prefix: Vec<&str> = dirs.iter().map(|(_, d)| d.as_str()).collect();
            format!("{}/{name}", prefix.join("/"))
        };
        let shaped = if path.contains('/') {
            path.clone()
        } else {
            format!("./{path}")
        };
        if is_source_path(&shaped) {
            files.push(FileEntry::new(path));
        }
    }
    files
}
