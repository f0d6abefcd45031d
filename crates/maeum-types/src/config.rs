//! Configuration schema.
//!
//! Every section defaults when absent. Fields accept both `snake_case`
//! and `camelCase` keys; unknown fields are ignored.

use serde::{Deserialize, Serialize};

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for maeum.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Generation backend connection.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Turn input and session limits.
    #[serde(default)]
    pub session: SessionConfig,

    /// Directory scan used to build the structural snapshot.
    #[serde(default)]
    pub tree: TreeConfig,

    /// Pattern vocabulary settings.
    #[serde(default)]
    pub patterns: PatternsConfig,
}

impl Config {
    /// Reject values no session could run with.
    ///
    /// Pattern entries are not checked here; the vocabulary validates and
    /// skips them individually.
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |reason: &str| {
            Err(crate::MaeumError::ConfigInvalid {
                reason: reason.to_string(),
            })
        };
        if self.backend.base_url.trim().is_empty() {
            return invalid("backend.baseUrl is empty");
        }
        if self.backend.timeout_secs == 0 {
            return invalid("backend.timeoutSecs must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.patterns.min_satisfaction) {
            return invalid("patterns.minSatisfaction must be within 0..=1");
        }
        if self.session.exit_token.trim().is_empty() {
            return invalid("session.exitToken is empty");
        }
        Ok(())
    }
}

// ── Backend ──────────────────────────────────────────────────────────────

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, without trailing slash.
    #[serde(default = "default_base_url", alias = "baseUrl")]
    pub base_url: String,

    #[serde(default = "default_chat_path", alias = "chatPath")]
    pub chat_path: String,

    #[serde(default = "default_health_path", alias = "healthPath")]
    pub health_path: String,

    /// Deadline for a forwarded turn, in seconds.
    #[serde(default = "default_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_tokens", alias = "maxTokens")]
    pub max_tokens: u32,

    /// System prompt for SILENT forwarding.
    #[serde(default = "default_system_prompt", alias = "systemPrompt")]
    pub system_prompt: String,

    /// System prompt for ERROR_CUT forwarding.
    #[serde(default = "default_error_system_prompt", alias = "errorSystemPrompt")]
    pub error_system_prompt: String,
}

fn default_base_url() -> String {
    "http://localhost:7860".into()
}
fn default_chat_path() -> String {
    "/api/chat".into()
}
fn default_health_path() -> String {
    "/api/health".into()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_max_tokens() -> u32 {
    8192
}
fn default_system_prompt() -> String {
    "You are a coding assistant. Answer the developer's message directly and concisely.".into()
}
fn default_error_system_prompt() -> String {
    "You are a debugging assistant. Identify the most likely cause of the error below \
     and propose the smallest fix. Respect the current development phase."
        .into()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            health_path: default_health_path(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
            error_system_prompt: default_error_system_prompt(),
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────────

/// Turn input and per-session limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Line that ends the session.
    #[serde(default = "default_exit_token", alias = "exitToken")]
    pub exit_token: String,

    /// How many phase declarations the context store remembers.
    #[serde(default = "default_note_limit", alias = "noteLimit")]
    pub note_limit: usize,
}

fn default_exit_token() -> String {
    "/exit".into()
}
fn default_note_limit() -> usize {
    10
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exit_token: default_exit_token(),
            note_limit: default_note_limit(),
        }
    }
}

// ── Tree ─────────────────────────────────────────────────────────────────

/// Directory scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Stop scanning after this many files.
    #[serde(default = "default_max_files", alias = "maxFiles")]
    pub max_files: usize,

    /// Directory names skipped entirely.
    #[serde(default = "default_ignore_dirs", alias = "ignoreDirs")]
    pub ignore_dirs: Vec<String>,

    /// File extensions (without dot) treated as source files.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_max_files() -> usize {
    10_000
}

fn default_ignore_dirs() -> Vec<String> {
    [
        "node_modules",
        ".git",
        "target",
        "dist",
        "build",
        "__pycache__",
        ".venv",
        "venv",
        ".idea",
        ".vscode",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Source extensions recognised both by the path detector and the scanner.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "vue", "py", "go", "java", "kt", "rs", "rb", "php", "swift", "c",
    "cpp", "h", "hpp",
];

fn default_extensions() -> Vec<String> {
    SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            ignore_dirs: default_ignore_dirs(),
            extensions: default_extensions(),
        }
    }
}

// ── Patterns ─────────────────────────────────────────────────────────────

/// Pattern vocabulary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternsConfig {
    /// Minimum satisfied-constraint fraction for a pattern to be reported.
    #[serde(default = "default_min_satisfaction", alias = "minSatisfaction")]
    pub min_satisfaction: f64,

    /// Extra entries appended after the built-in vocabulary.
    #[serde(default)]
    pub custom: Vec<PatternSpec>,
}

fn default_min_satisfaction() -> f64 {
    0.75
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            min_satisfaction: default_min_satisfaction(),
            custom: Vec::new(),
        }
    }
}

/// Declarative, unvalidated pattern entry.
///
/// Roles and flow pairs are kept as strings so that a malformed entry
/// can be reported and skipped instead of failing the whole config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternSpec {
    pub name: String,

    #[serde(default, alias = "requiredRoles")]
    pub required_roles: Vec<String>,

    /// Dependency pairs written as `"a -> b"` (a depends on b).
    #[serde(default)]
    pub flow: Vec<String>,

    #[serde(default = "default_max_file_distance", alias = "maxFileDistance")]
    pub max_file_distance: usize,

    #[serde(default)]
    pub layering: Option<LayeringSpec>,
}

fn default_max_file_distance() -> usize {
    3
}

/// Declared layer order, top layer first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayeringSpec {
    pub layers: Vec<Vec<String>>,

    #[serde(default, alias = "noReverseDependency")]
    pub no_reverse_dependency: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_for_missing_fields() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.backend.base_url, "http://localhost:7860");
        assert_eq!(cfg.backend.chat_path, "/api/chat");
        assert_eq!(cfg.backend.health_path, "/api/health");
        assert_eq!(cfg.backend.timeout_secs, 120);
        assert_eq!(cfg.backend.max_tokens, 8192);
        assert_eq!(cfg.session.exit_token, "/exit");
        assert_eq!(cfg.session.note_limit, 10);
        assert_eq!(cfg.tree.max_files, 10_000);
        assert!(cfg.tree.ignore_dirs.iter().any(|d| d == "node_modules"));
        assert!(cfg.tree.extensions.iter().any(|e| e == "rs"));
        assert!((cfg.patterns.min_satisfaction - 0.75).abs() < f64::EPSILON);
        assert!(cfg.patterns.custom.is_empty());
    }

    #[test]
    fn camel_case_aliases() {
        let json = r#"{
            "backend": { "baseUrl": "http://10.0.0.2:9000", "timeoutSecs": 5, "maxTokens": 256 },
            "session": { "exitToken": "quit", "noteLimit": 3 },
            "tree": { "maxFiles": 50, "ignoreDirs": ["vendor"] },
            "patterns": { "minSatisfaction": 0.5 }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.backend.base_url, "http://10.0.0.2:9000");
        assert_eq!(cfg.backend.timeout_secs, 5);
        assert_eq!(cfg.backend.max_tokens, 256);
        assert_eq!(cfg.session.exit_token, "quit");
        assert_eq!(cfg.session.note_limit, 3);
        assert_eq!(cfg.tree.max_files, 50);
        assert_eq!(cfg.tree.ignore_dirs, vec!["vendor"]);
        assert!((cfg.patterns.min_satisfaction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.backend.timeout_secs = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("timeoutSecs"), "{err}");

        let mut cfg = Config::default();
        cfg.patterns.min_satisfaction = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.session.exit_token = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_fields_ignored() {
        let json = r#"{ "backend": { "model": "x" }, "future": 1 }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.backend.chat_path, "/api/chat");
    }

    #[test]
    fn custom_pattern_entry() {
        let json = r#"{ "patterns": { "custom": [{
            "name": "CQRS",
            "requiredRoles": ["entry", "core"],
            "flow": ["entry -> core"],
            "layering": { "layers": [["entry"], ["core"]], "noReverseDependency": true }
        }]}}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        let spec = &cfg.patterns.custom[0];
        assert_eq!(spec.name, "CQRS");
        assert_eq!(spec.required_roles, vec!["entry", "core"]);
        assert_eq!(spec.max_file_distance, 3);
        let layering = spec.layering.as_ref().unwrap();
        assert_eq!(layering.layers.len(), 2);
        assert!(layering.no_reverse_dependency);
    }
}
