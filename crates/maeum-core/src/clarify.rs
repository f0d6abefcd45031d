//! The one-shot clarify menu.
//!
//! Four fixed options in priority-table order. The next turn after the
//! menu is read as a selection: a valid index runs that action on the
//! original turn, anything else is [`MaeumError::BadSelection`] and the
//! same menu is shown again.

use maeum_types::{Action, MaeumError, Result};

pub const MENU_PROMPT: &str = "Which did you mean?";

/// Menu entries, numbered from 1.
pub const OPTIONS: [(&str, Action); 4] = [
    ("structure", Action::ArchSnapshot),
    ("error", Action::ErrorCut),
    ("path", Action::PathJudge),
    ("context", Action::ContextSet),
];

/// The menu text: prompt line followed by `N) label` lines.
pub fn render_menu() -> String {
    let mut out = String::from(MENU_PROMPT);
    for (i, (label, _)) in OPTIONS.iter().enumerate() {
        out.push_str(&format!("\n{}) {label}", i + 1));
    }
    out
}

/// Map a selection to its action.
///
/// # Errors
///
/// [`MaeumError::BadSelection`] unless the trimmed input is `1`-`4`.
pub fn parse_selection(input: &str) -> Result<Action> {
    let trimmed = input.trim();
    trimmed
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=OPTIONS.len()).contains(n))
        .filter(|_| trimmed.chars().all(|c| c.is_ascii_digit()))
        .map(|n| OPTIONS[n - 1].1)
        .ok_or_else(|| MaeumError::BadSelection {
            input: trimmed.to_string(),
        })
}
