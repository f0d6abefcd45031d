//! Interactive session or single-message mode.
//!
//! ```text
//! # Single turn
//! maeum -m "src/auth/token.service.ts"
//!
//! # Interactive: an empty line ends a turn
//! maeum
//! > .
//! [ARCH_SNAPSHOT]
//! ...
//! > /exit
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use maeum_core::{Dispatcher, InputEvent, Session, TurnBuffer, TurnOutput};
use maeum_llm::{Generator, HttpBackend};
use maeum_types::config::Config;
use maeum_types::{Action, MaeumError};

use crate::interactive::builtins::{QUIT_SENTINEL, register_builtins};
use crate::interactive::registry::SlashCommandRegistry;
use crate::tree::DirectoryTree;

fn build_session(config: &Config, root: PathBuf) -> anyhow::Result<Session> {
    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let tree = Arc::new(DirectoryTree::new(root, config.tree.clone()));
    let dispatcher = Dispatcher::new(config, backend, tree);
    Ok(Session::new(Arc::new(dispatcher), config.session.note_limit))
}

/// Process exactly one turn and exit.
///
/// A clarify menu is printed and the process exits without reading a
/// selection.
pub async fn run_single_message(config: &Config, root: PathBuf, message: &str) -> anyhow::Result<()> {
    let mut session = build_session(config, root)?;
    info!(session = session.info().short_id(), "single-message mode");
    let outcome = run_turn(&mut session, message).await?;
    print_output(&outcome.output);
    if outcome.action == Action::Clarify {
        eprintln!("(ambiguous input; rerun interactively to choose)");
    }
    Ok(())
}

/// Run the interactive loop on stdin.
pub async fn run_interactive(config: &Config, root: PathBuf) -> anyhow::Result<()> {
    let mut session = build_session(config, root.clone())?;
    let mut registry = SlashCommandRegistry::new();
    register_builtins(&mut registry);

    println!("maeum -- interactive mode (type /help for commands)");
    println!("Root:    {}", root.display());
    match session.dispatcher().generator().health().await {
        Ok(()) => println!("Backend: {} (online)", config.backend.base_url),
        Err(e) => {
            warn!(error = %e, "backend health check failed");
            println!("Backend: {} (offline; forwarded turns will fail)", config.backend.base_url);
        }
    }
    println!();

    let stdin = tokio::io::stdin();
    let mut reader = tokio::io::BufReader::new(stdin).lines();
    let mut buffer = TurnBuffer::new(config.session.exit_token.clone());

    loop {
        if buffer.is_empty() {
            eprint!("> ");
            std::io::stderr().flush().ok();
        }

        let line = tokio::select! {
            line = reader.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            // EOF: submit what is buffered, then stop.
            if let Some(turn) = buffer.flush() {
                handle_turn(&mut session, &turn).await;
            }
            break;
        };

        match buffer.push_line(&line) {
            InputEvent::Pending => {}
            InputEvent::Exit => break,
            InputEvent::Turn(turn) => handle_turn(&mut session, &turn).await,
            InputEvent::Command(cmd) => match registry.dispatch(&cmd, &mut session) {
                Some(Ok(out)) if out == QUIT_SENTINEL => break,
                Some(Ok(out)) => {
                    if !out.is_empty() {
                        println!("{out}\n");
                    }
                }
                Some(Err(e)) => eprintln!("error: {e}\n"),
                None => {
                    let known: Vec<String> =
                        registry.entries().iter().map(|(name, _)| format!("/{name}")).collect();
                    eprintln!("unknown command: {cmd} (known: {})\n", known.join(", "));
                }
            },
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Run one turn, aborting it on Ctrl-C.
async fn run_turn(session: &mut Session, text: &str) -> maeum_types::Result<maeum_core::TurnOutcome> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let result = session.handle_turn(text, &cancel).await;
    watcher.abort();
    result
}

/// Run a turn and report it; failures are shown and the session goes on.
async fn handle_turn(session: &mut Session, text: &str) {
    match run_turn(session, text).await {
        Ok(outcome) => print_output(&outcome.output),
        Err(e @ MaeumError::BadSelection { .. }) => {
            eprintln!("error: {e}");
            if let Some(menu) = session.pending_menu() {
                println!("{menu}\n");
            }
        }
        Err(e) => eprintln!("error: {e}\n"),
    }
}

fn print_output(output: &TurnOutput) {
    if let Some(text) = output.text() {
        println!("{text}\n");
    }
}
