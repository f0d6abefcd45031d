//! Import/require extraction.
//!
//! Each source language gets a handful of regexes; the captured module
//! paths become the file's declared dependency list. Extraction is
//! best-effort: anything the regexes miss is simply not an edge.

use std::sync::LazyLock;

use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("import pattern must compile"))
        .collect()
}

static PYTHON_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*from\s+([\w.]+)\s+import[ \t]+\(?([\w \t,]+)").expect("python from pattern")
});

static PYTHON_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*import\s+([\w.]+(?:\s*,\s*[\w.]+)*)").expect("python import pattern")
});

static JS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?m)^\s*import\s+(?:[^'";]*?\s+from\s+)?['"]([^'"]+)['"]"#,
        r#"(?m)^\s*export\s+[^'";]*?\s+from\s+['"]([^'"]+)['"]"#,
        r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#,
        r#"\bimport\(\s*['"]([^'"]+)['"]\s*\)"#,
    ])
});

static JVM_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*import\s+(?:static\s+)?([\w.]+)").expect("jvm import pattern")
});

static GO_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:\w+\s+)?"([^"]+)""#).expect("go import pattern")
});

static GO_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)import\s*\(([^)]*)\)").expect("go import block pattern"));

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("quoted string pattern"));

static RUST_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([\w:]+?)(?:::\{([^}]*)\})?\s*;")
        .expect("rust use pattern")
});

static RUST_MOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+(\w+)\s*;").expect("rust mod pattern")
});

/// Extract declared dependencies from a source file.
///
/// The language is picked from the extension of `path`; unknown
/// extensions yield nothing.
pub fn extract_references(path: &str, content: &str) -> Vec<String> {
    let ext = path
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    let mut refs = match ext.as_str() {
        "py" => python(content),
        "js" | "jsx" | "ts" | "tsx" | "vue" => javascript(content),
        "java" | "kt" => jvm(content),
        "go" => go(content),
        "rs" => rust(content),
        _ => Vec::new(),
    };
    let mut seen = std::collections::HashSet::new();
    refs.retain(|r| seen.insert(r.clone()));
    refs
}

fn python(content: &str) -> Vec<String> {
    let mut refs = Vec::new();
    for cap in PYTHON_FROM.captures_iter(content) {
        let module = &cap[1];
        if module.chars().all(|c| c == '.') {
            // `from . import user_service`
            refs.extend(
                cap[2]
                    .split(',')
                    .map(|n| n.split_whitespace().next().unwrap_or_default())
                    .filter(|n| !n.is_empty())
                    .map(String::from),
            );
        } else {
            refs.push(module.to_string());
        }
    }
    for cap in PYTHON_IMPORT.captures_iter(content) {
        refs.extend(cap[1].split(',').map(|m| m.trim().to_string()));
    }
    refs
}

fn javascript(content: &str) -> Vec<String> {
    JS_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(content).map(|c| c[1].to_string()))
        .collect()
}

fn jvm(content: &str) -> Vec<String> {
    JVM_IMPORT
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}

fn go(content: &str) -> Vec<String> {
    let mut refs: Vec<String> = GO_SINGLE
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect();
    for block in GO_BLOCK.captures_iter(content) {
        refs.extend(QUOTED.captures_iter(&block[1]).map(|c| c[1].to_string()));
    }
    refs
}

fn rust(content: &str) -> Vec<String> {
    let mut refs = Vec::new();
    for cap in RUST_USE.captures_iter(content) {
        let prefix = &cap[1];
        match cap.get(2) {
            Some(group) => refs.extend(
                group
                    .as_str()
                    .split(',')
                    .map(|item| item.split_whitespace().next().unwrap_or_default())
                    .filter(|item| !item.is_empty() && *item != "self")
                    .map(|item| format!("{prefix}::{item}")),
            ),
            None => refs.push(prefix.to_string()),
        }
    }
    refs.extend(RUST_MOD.captures_iter(content).map(|c| c[1].to_string()));
    refs
}
