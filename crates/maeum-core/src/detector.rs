//! Signal detection over raw turn text.
//!
//! Each detector is a pure function of the text: the same input always
//! yields the same signals. Nothing here reads session state.
//!
//! Detectors run independently, so one turn may carry several signals.
//! Choosing between them is the resolver's job.

use std::sync::LazyLock;

use regex::Regex;

use maeum_types::config::SOURCE_EXTENSIONS;
use maeum_types::{Phase, Signal, SignalKind};

// ── Tables ──────────────────────────────────────────────────────────────

/// Error-evidence shapes. The earliest match anywhere in the text is the
/// signal span.
static ERROR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // TypeError, NullPointerException, ...
        r"\b[A-Z][A-Za-z0-9]*(?:Error|Exception)\b",
        r"\bTraceback\b",
        r"\bException\b",
        r"(?m)^\s*(?:error|Error|ERROR)(?:\[\w+\])?:",
        // JVM / JS stack frame
        r"(?m)^\s+at\s+[\w.$<>]+\s*\(",
        // Python stack frame
        r#"File "[^"]+", line \d+"#,
        r"panicked at",
        r"(?m)^\s*Caused by:",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("error pattern must compile"))
    .collect()
});

static PATH_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    let exts = SOURCE_EXTENSIONS.join("|");
    Regex::new(&format!(r"^(?:\./|/)?(?:[\w.@-]+/)+[\w.@-]+\.(?i:{exts})$"))
        .expect("path pattern must compile")
});

/// Box-drawing characters that only appear in rendered directory trees.
const TREE_CHARS: &[char] = &['├', '└', '│'];

/// Leading decoration stripped from a listing line before it is read as
/// a path.
const TREE_DECORATION: &[char] = &['├', '└', '│', '─', '|', '`', '-', ' ', '\t'];

/// A phase and the phrases that declare it.
struct PhaseKeywords {
    phase: Phase,
    keywords: &'static [&'static str],
}

/// ASCII keywords match whole words, case-insensitively. Hangul keywords
/// match as substrings since particles attach directly to the word.
const PHASE_KEYWORDS: &[PhaseKeywords] = &[
    PhaseKeywords {
        phase: Phase::Mvp,
        keywords: &["mvp", "urgent", "빨리", "급함", "당장"],
    },
    PhaseKeywords {
        phase: Phase::Experiment,
        keywords: &["experiment", "experimental", "prototype", "실험", "프로토타입"],
    },
    PhaseKeywords {
        phase: Phase::Refactor,
        keywords: &["refactor", "refactoring", "리팩토링", "리팩터링", "정리"],
    },
    PhaseKeywords {
        phase: Phase::Stabilize,
        keywords: &[
            "stabilize",
            "stabilization",
            "stable",
            "production",
            "deploy",
            "안정",
            "배포",
        ],
    },
];

/// Phase declarations are short prose; longer input is code or logs.
const MAX_CONTEXT_LINES: usize = 3;

// ── Detector ────────────────────────────────────────────────────────────

/// Scans turn text for evidence of each action category.
///
/// Signals are returned in priority order (error, path, context, arch).
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalDetector;

impl SignalDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> Vec<Signal> {
        [
            detect_error(text),
            detect_path(text),
            detect_context(text),
            detect_arch(text),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Strip leading tree-drawing decoration from one listing line.
///
/// Returns the byte width of the stripped prefix and the remainder.
pub fn strip_tree_decoration(line: &str) -> (usize, &str) {
    let rest = line.trim_start_matches(TREE_DECORATION);
    (line.len() - rest.len(), rest)
}

/// Whether `candidate` is a single source-file path.
pub fn is_source_path(candidate: &str) -> bool {
    PATH_SHAPE.is_match(&candidate.replace('\\', "/"))
}

fn detect_error(text: &str) -> Option<Signal> {
    ERROR_PATTERNS
        .iter()
        .filter_map(|re| re.find(text))
        .min_by_key(|m| (m.start(), m.end()))
        .map(|m| Signal::new(SignalKind::Error, m.range()))
}

fn detect_path(text: &str) -> Option<Signal> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }
    let lead = text.len() - text.trim_start().len();
    let (deco, candidate) = strip_tree_decoration(trimmed);
    if candidate.chars().any(char::is_whitespace) || !is_source_path(candidate) {
        return None;
    }
    let start = lead + deco;
    Some(Signal::new(SignalKind::Path, start..start + candidate.len()))
}

fn detect_context(text: &str) -> Option<Signal> {
    if text.trim().lines().count() > MAX_CONTEXT_LINES {
        return None;
    }
    // ASCII lowering keeps byte offsets intact.
    let lower = text.to_ascii_lowercase();
    let mut best: Option<(usize, usize, Phase)> = None;
    for entry in PHASE_KEYWORDS {
        for keyword in entry.keywords {
            if let Some(start) = find_keyword(&lower, keyword)
                && best.is_none_or(|(s, _, _)| start < s)
            {
                best = Some((start, start + keyword.len(), entry.phase));
            }
        }
    }
    best.map(|(start, end, phase)| Signal::context(phase, start..end))
}

fn detect_arch(text: &str) -> Option<Signal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead = text.len() - text.trim_start().len();
    let span = lead..lead + trimmed.len();

    if trimmed == "." || trimmed.contains(TREE_CHARS) {
        return Some(Signal::new(SignalKind::Arch, span));
    }

    let lines: Vec<&str> = trimmed
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let listing_lines = lines.iter().filter(|l| is_listing_line(l)).count();
    (lines.len() >= 2 && listing_lines >= 2).then(|| Signal::new(SignalKind::Arch, span))
}

fn is_listing_line(line: &str) -> bool {
    !line.contains(char::is_whitespace) && line.contains('/')
}

fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    if !keyword.is_ascii() {
        return haystack.find(keyword);
    }
    haystack
        .match_indices(keyword)
        .map(|(i, _)| i)
        .find(|&i| {
            let before = haystack[..i].chars().next_back();
            let after = haystack[i + keyword.len()..].chars().next();
            !before.is_some_and(is_ascii_word) && !after.is_some_and(is_ascii_word)
        })
}

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
