//! Built-in slash commands:
//!
//! - `/help` -- list commands
//! - `/status` -- session id, phase, tolerance and phase history
//! - `/phase <name>` -- set the phase explicitly (silent, like CONTEXT_SET)
//! - `/patterns` -- list the pattern vocabulary
//! - `/quit` -- exit

use maeum_core::Session;
use maeum_types::Phase;

use super::registry::{SlashCommand, SlashCommandRegistry};

/// Sentinel value returned by `/quit` to signal session exit.
pub const QUIT_SENTINEL: &str = "__QUIT__";

pub fn register_builtins(registry: &mut SlashCommandRegistry) {
    registry.register(Box::new(HelpCommand));
    registry.register(Box::new(StatusCommand));
    registry.register(Box::new(PhaseCommand));
    registry.register(Box::new(PatternsCommand));
    registry.register(Box::new(QuitCommand));
}

// ── /help ─────────────────────────────────────────────────────────────────

struct HelpCommand;

impl SlashCommand for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Show available commands"
    }

    fn execute(&self, _args: &str, _session: &mut Session) -> anyhow::Result<String> {
        Ok(format_general_help())
    }
}

fn format_general_help() -> String {
    let mut output = String::from("Commands:\n");
    output.push_str("  /help             -- Show this help\n");
    output.push_str("  /status           -- Show phase, tolerance and phase history\n");
    output.push_str("  /phase <name>     -- Set the phase (mvp, experiment, refactor, stabilize)\n");
    output.push_str("  /patterns         -- List known architecture patterns\n");
    output.push_str("  /quit             -- Exit the session\n");
    output.push_str("\nEnd a turn with an empty line. `.` snapshots the current directory.");
    output
}

// ── /status ───────────────────────────────────────────────────────────────

struct StatusCommand;

impl SlashCommand for StatusCommand {
    fn name(&self) -> &str {
        "status"
    }

    fn description(&self) -> &str {
        "Show phase, tolerance and phase history"
    }

    fn execute(&self, _args: &str, session: &mut Session) -> anyhow::Result<String> {
        let info = session.info();
        let state = session.state();
        let mut output = format!(
            "Session:   {} (started {})\nPhase:     {}\nTolerance: {}\n",
            info.short_id(),
            info.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            state.phase,
            state.tolerance,
        );
        let notes: Vec<_> = session.store().notes().collect();
        if notes.is_empty() {
            output.push_str("History:   (none)");
        } else {
            output.push_str("History:");
            for note in notes {
                output.push_str(&format!(
                    "\n  {} {:<10} {}",
                    note.at.format("%H:%M:%S"),
                    note.phase,
                    note.text
                ));
            }
        }
        Ok(output)
    }
}

// ── /phase ────────────────────────────────────────────────────────────────

struct PhaseCommand;

impl SlashCommand for PhaseCommand {
    fn name(&self) -> &str {
        "phase"
    }

    fn description(&self) -> &str {
        "Set the phase explicitly"
    }

    fn execute(&self, args: &str, session: &mut Session) -> anyhow::Result<String> {
        if args.is_empty() {
            return Ok(format!("Phase: {}", session.state().phase));
        }
        let phase: Phase = args
            .parse()
            .map_err(|e| anyhow::anyhow!("{e} (expected mvp, experiment, refactor or stabilize)"))?;
        session.set_phase(phase, &format!("/phase {args}"));
        Ok(String::new())
    }
}

// ── /patterns ─────────────────────────────────────────────────────────────

struct PatternsCommand;

impl SlashCommand for PatternsCommand {
    fn name(&self) -> &str {
        "patterns"
    }

    fn description(&self) -> &str {
        "List known architecture patterns"
    }

    fn execute(&self, _args: &str, session: &mut Session) -> anyhow::Result<String> {
        let vocabulary = session.dispatcher().vocabulary();
        if vocabulary.is_empty() {
            return Ok("No patterns loaded.".into());
        }
        let mut output = format!("Patterns ({}):", vocabulary.len());
        for pattern in vocabulary.patterns() {
            output.push_str(&format!("\n  {pattern}"));
        }
        Ok(output)
    }
}

// ── /quit ─────────────────────────────────────────────────────────────────

struct QuitCommand;

impl SlashCommand for QuitCommand {
    fn name(&self) -> &str {
        "quit"
    }

    fn description(&self) -> &str {
        "Exit the session"
    }

    fn execute(&self, _args: &str, _session: &mut Session) -> anyhow::Result<String> {
        Ok(QUIT_SENTINEL.into())
    }
}
