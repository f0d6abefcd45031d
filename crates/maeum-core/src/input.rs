//! Line-oriented turn input.
//!
//! Lines accumulate until an empty line submits them as one turn. The
//! exit token and slash commands act immediately when typed on the first
//! line of a turn.

/// What one input line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Buffered; the turn is not complete yet.
    Pending,
    /// A complete turn, trimmed.
    Turn(String),
    /// A slash command line, trimmed.
    Command(String),
    /// The exit token.
    Exit,
}

#[derive(Debug, Clone)]
pub struct TurnBuffer {
    lines: Vec<String>,
    exit_token: String,
}

impl TurnBuffer {
    pub fn new(exit_token: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            exit_token: exit_token.into(),
        }
    }

    /// Feed one line (without its newline).
    pub fn push_line(&mut self, line: &str) -> InputEvent {
        let line = line.trim_end_matches(['\r', '\n']);
        if self.lines.is_empty() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return InputEvent::Pending;
            }
            if trimmed == self.exit_token {
                return InputEvent::Exit;
            }
            if trimmed.starts_with('/') && !trimmed[1..].contains('/') {
                return InputEvent::Command(trimmed.to_string());
            }
        } else if line.trim().is_empty() {
            return self.flush().map_or(InputEvent::Pending, InputEvent::Turn);
        }
        self.lines.push(line.to_string());
        InputEvent::Pending
    }

    /// Submit whatever is buffered (end of input).
    pub fn flush(&mut self) -> Option<String> {
        let turn = self.lines.join("\n");
        self.lines.clear();
        let turn = turn.trim();
        (!turn.is_empty()).then(|| turn.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
