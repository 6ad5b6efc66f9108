//! Interactive console for a remote service registry.
//!
//! Run with: cargo run -- --uri http://localhost:8080/app
//! or, without a server: cargo run -- --demo

mod commands;
mod completion;
mod prompt;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use remote_shell_core::Connector;
use remote_shell_session::{Session, SessionOptions};
use remote_shell_transport::{HttpConnector, MemoryRegistry};
use rustyline::{Editor, error::ReadlineError, history::DefaultHistory};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    commands::Reply,
    completion::{ShellHelper, Snapshot},
    prompt::ConsolePrompter,
};

const HISTORY_FILE: &str = ".remote_shell_history";
const DEMO_ENDPOINT: &str = "memory://demo";

#[derive(Debug, Parser)]
#[command(name = "remote-shell", version, about)]
struct Args {
    /// Endpoint to connect to on startup
    #[arg(long, env = "REMOTE_SHELL_URI")]
    uri: Option<String>,
    /// Only list components whose type starts with this prefix
    #[arg(long, env = "REMOTE_SHELL_PREFIX")]
    prefix: Option<String>,
    /// Remote log level requested with every call
    #[arg(long)]
    log_level: Option<String>,
    /// Capture database logs with every call
    #[arg(long)]
    enable_database_log: bool,
    /// Line editor history file
    #[arg(long)]
    history_file: Option<PathBuf>,
    /// Use the built-in demo registry instead of HTTP
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    if args.demo {
        run(MemoryRegistry::demo(), args).await
    } else {
        run(HttpConnector::default(), args).await
    }
}

async fn run<C: Connector>(connector: C, args: Args) -> anyhow::Result<()> {
    let mut session = Session::new(connector, ConsolePrompter);
    session
        .configure(SessionOptions {
            endpoint: None,
            prefix: args.prefix,
            log_level: args.log_level,
            enable_database_log: Some(args.enable_database_log),
        })
        .await?;

    let endpoint = args
        .uri
        .or_else(|| args.demo.then(|| DEMO_ENDPOINT.to_owned()));
    if let Some(endpoint) = endpoint {
        if let Err(e) = session.connect(&endpoint).await {
            eprintln!("{e}");
        }
    }

    let mut editor: Editor<ShellHelper, DefaultHistory> =
        Editor::new().context("Failed to create line editor")?;
    editor.set_helper(Some(ShellHelper::default()));

    let history = args
        .history_file
        .or_else(|| dirs::home_dir().map(|home| home.join(HISTORY_FILE)));
    if let Some(path) = &history {
        if let Err(e) = editor.load_history(path) {
            tracing::debug!(path = %path.display(), error = %e, "No history loaded");
        }
    }

    let result = repl(&mut session, &mut editor).await;

    if let Some(path) = &history {
        if let Err(e) = editor.save_history(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save history");
        }
    }
    result
}

async fn repl<C: Connector>(
    session: &mut Session<C, ConsolePrompter>,
    editor: &mut Editor<ShellHelper, DefaultHistory>,
) -> anyhow::Result<()> {
    loop {
        if let Some(helper) = editor.helper_mut() {
            helper.update(Snapshot::capture(session));
        }

        let line = match editor.readline(&session.prompt_label()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line.as_str());

        let command = match commands::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match commands::execute(session, command).await {
            Ok(Reply::Output(text)) => println!("{text}"),
            Ok(Reply::Silent) => {}
            Ok(Reply::Exit) => return Ok(()),
            Err(e) if e.is_recoverable() => eprintln!("{e}"),
            Err(e) => return Err(e).context("Session ended"),
        }
    }
}
