//! Slash command registry and dispatch.
//!
//! Slash commands are handled before classification: a line starting
//! with `/` on the first line of a turn never reaches the detector.

use std::collections::HashMap;

use maeum_core::Session;

/// A slash command handler.
pub trait SlashCommand: Send + Sync {
    /// Command name without the leading `/`.
    fn name(&self) -> &str;

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    /// Run the command and return the text to display.
    fn execute(&self, args: &str, session: &mut Session) -> anyhow::Result<String>;
}

/// Registry of slash commands with dispatch.
pub struct SlashCommandRegistry {
    commands: HashMap<String, Box<dyn SlashCommand>>,
}

impl SlashCommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command, replacing any with the same name.
    pub fn register(&mut self, cmd: Box<dyn SlashCommand>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Dispatch a `/name args` line.
    ///
    /// Returns `None` if the input is not a slash command or the command
    /// is not registered.
    pub fn dispatch(&self, input: &str, session: &mut Session) -> Option<anyhow::Result<String>> {
        let without_slash = input.trim().strip_prefix('/')?;
        let (name, args) = match without_slash.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (without_slash, ""),
        };
        let cmd = self.commands.get(name)?;
        Some(cmd.execute(args, session))
    }

    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names with descriptions, sorted by name.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for SlashCommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
