//! ERROR_CUT payload building.
//!
//! The raw error text is forwarded unchanged together with the session
//! state. Two hints are extracted mechanically: the error type name and
//! the first source location. Nothing here guesses a cause or a fix.

use std::sync::LazyLock;

use regex::Regex;

use maeum_llm::{ErrorContext, GenerationRequest};
use maeum_types::ContextState;
use maeum_types::config::BackendConfig;

static ERROR_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:[a-z_][\w]*\.)*[A-Z][A-Za-z0-9]*(?:Error|Exception))\b")
        .expect("error type pattern")
});

/// Location shapes, tried in order.
static LOCATIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Python: File "app/x.py", line 12
        r#"File "([^"]+)", line (\d+)"#,
        // JS: at fn (src/x.ts:10:5)  /  at src/x.ts:10:5
        r"\bat\s+(?:[\w.$<>]+\s+\()?((?:[\w.@-]*/)*[\w.@-]+\.\w+):(\d+)(?::\d+)?\)?",
        // JVM: (UserService.java:42)
        r"\(([\w$]+\.(?:java|kt|scala)):(\d+)\)",
        // Rust / compilers: --> src/main.rs:2:5  /  src/main.rs:2:5
        r"((?:[\w.@-]+/)*[\w.@-]+\.[A-Za-z]{1,5}):(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("location pattern must compile"))
    .collect()
});

/// The first `XxxError` / `XxxException` name, with any dotted prefix.
pub fn extract_error_type(text: &str) -> Option<String> {
    ERROR_TYPE.captures(text).map(|c| c[1].to_string())
}

/// The first recognisable source location, as `file:line`.
pub fn extract_location(text: &str) -> Option<String> {
    LOCATIONS
        .iter()
        .filter_map(|re| re.captures(text))
        .min_by_key(|c| c.get(0).map_or(usize::MAX, |m| m.start()))
        .map(|c| format!("{}:{}", &c[1], &c[2]))
}

/// Build the forwarded request for an error turn.
pub fn error_request(text: &str, state: ContextState, backend: &BackendConfig) -> GenerationRequest {
    let mut context = ErrorContext::new(state);
    context.error_type = extract_error_type(text);
    context.location = extract_location(text);
    GenerationRequest::new(text, &backend.error_system_prompt, backend.max_tokens)
        .with_context(context)
}
