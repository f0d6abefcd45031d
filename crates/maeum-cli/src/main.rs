//! `maeum` -- turn-based architecture assistant.
//!
//! - `maeum` -- interactive session on stdin
//! - `maeum -m "<text>"` -- process one turn and exit
//! - `maeum --status` -- backend health check

use std::path::PathBuf;

use clap::Parser;

mod commands;
mod interactive;
mod tree;

/// Turn-based architecture assistant.
#[derive(Parser)]
#[command(name = "maeum", about = "Turn-based architecture assistant", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    config: Option<String>,

    /// Process a single turn and exit.
    #[arg(short, long)]
    message: Option<String>,

    /// Check backend availability and exit.
    #[arg(long, conflicts_with = "message")]
    status: bool,

    /// Project root scanned for `.` snapshots (defaults to the current directory).
    #[arg(long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    if cli.status {
        if !commands::status::run(&config).await? {
            std::process::exit(1);
        }
        return Ok(());
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.message {
        Some(message) => commands::chat::run_single_message(&config, root, &message).await,
        None => commands::chat::run_interactive(&config, root).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_without_error() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_help_contains_binary_name() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("maeum"));
    }

    #[test]
    fn no_args_is_interactive() {
        let cli = Cli::try_parse_from(["maeum"]).unwrap();
        assert!(cli.message.is_none());
        assert!(!cli.status);
        assert!(!cli.verbose);
    }

    #[test]
    fn message_and_config() {
        let cli = Cli::try_parse_from(["maeum", "-c", "/tmp/c.json", "-m", "src/main.ts"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/c.json"));
        assert_eq!(cli.message.as_deref(), Some("src/main.ts"));
    }

    #[test]
    fn status_with_root() {
        let cli = Cli::try_parse_from(["maeum", "--status", "--root", "/srv/app", "-v"]).unwrap();
        assert!(cli.status);
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/srv/app")));
    }

    #[test]
    fn status_conflicts_with_message() {
        assert!(Cli::try_parse_from(["maeum", "--status", "-m", "hi"]).is_err());
    }
}
