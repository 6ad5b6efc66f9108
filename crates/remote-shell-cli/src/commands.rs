//! Console command surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use remote_shell_core::{Connector, Prompter};
use remote_shell_session::{BuildMode, CallOutcome, Session, SessionError, SessionOptions};
use thiserror::Error;

/// Error turning a console line into a [`Command`].
#[derive(Debug, Error)]
pub enum LineError {
    #[error("Unbalanced quotes in input")]
    Unbalanced,
    /// Usage errors, `help` and `--help` output.
    #[error("{0}")]
    Usage(#[from] clap::Error),
}

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// One console command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Check that the remote service answers
    Echo,
    /// List components, or methods of the current component
    Ls { filter: Option<String> },
    /// Show the current component
    Pwd,
    /// Select a component, `..` to go back
    Cd { target: String },
    /// Call a method of the current component
    Call { method: String },
    /// Repeat the last successful call
    Repeat,
    /// Create an object container
    Create {
        #[arg(value_name = "TYPE")]
        type_name: String,
        #[arg(long)]
        name: Option<String>,
        /// Enter the value as JSON instead of field by field
        #[arg(long)]
        simple: bool,
        /// Read the value from a file
        #[arg(long, conflicts_with = "value")]
        input: Option<PathBuf>,
        #[arg(long)]
        value: Option<String>,
    },
    /// Set an attribute (no effect)
    Set {
        attribute: String,
        #[arg(long)]
        value: Option<String>,
    },
    /// List object containers
    List,
    /// Print an object container
    Print { name: String },
    /// Write an object container to a file
    Write {
        name: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show or change the session configuration
    Config {
        #[arg(long)]
        uri: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long, alias = "logLevel")]
        log_level: Option<String>,
        #[arg(long)]
        pass: Option<String>,
        #[arg(
            long,
            alias = "enableDatabaseLog",
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        enable_database_log: Option<bool>,
    },
    /// Show the log captured by the last call
    Log,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Command names offered by completion.
pub const NAMES: [&str; 16] = [
    "call", "cd", "config", "create", "echo", "exit", "help", "list", "log", "ls", "print", "pwd",
    "quit", "repeat", "set", "write",
];

/// Parse a console line; blank lines yield `None`.
///
/// # Errors
/// Returns `Unbalanced` for broken quoting and `Usage` for anything clap rejects.
pub fn parse_line(line: &str) -> Result<Option<Command>, LineError> {
    let words = shlex::split(line).ok_or(LineError::Unbalanced)?;
    if words.is_empty() {
        return Ok(None);
    }
    Ok(Some(Line::try_parse_from(words)?.command))
}

/// What the console should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Silent,
    Exit,
}

/// Run one command against the session.
///
/// # Errors
/// Returns the session error; the caller decides whether it is fatal.
pub async fn execute<C, P>(session: &mut Session<C, P>, command: Command) -> Result<Reply, SessionError>
where
    C: Connector,
    P: Prompter,
{
    let reply = match command {
        Command::Echo => Reply::Output(session.echo().await?),
        Command::Ls { filter } => Reply::Output(session.ls(filter.as_deref())?),
        Command::Pwd => Reply::Output(session.pwd()),
        Command::Cd { target } => {
            session.select_component(&target).await?;
            Reply::Silent
        }
        Command::Call { method } => match session.call(&method).await? {
            CallOutcome::Completed(text) => Reply::Output(text),
            CallOutcome::Cancelled => Reply::Output("Call cancelled".to_owned()),
        },
        Command::Repeat => Reply::Output(session.repeat_last().await?),
        Command::Create {
            type_name,
            name,
            simple,
            input,
            value,
        } => {
            let stored = match input {
                Some(path) => session.load_container_from_file(&path, &type_name, name.as_deref())?,
                None => {
                    let mode = if simple { BuildMode::Simple } else { BuildMode::Full };
                    session
                        .create(&type_name, name.as_deref(), mode, value.as_deref())
                        .await?
                }
            };
            Reply::Output(format!("Object [{stored}] created"))
        }
        Command::Set { attribute, value } => {
            session.set_attribute(&attribute, value.as_deref());
            Reply::Silent
        }
        Command::List => Reply::Output(session.list_containers().join("\n")),
        Command::Print { name } => Reply::Output(session.print_container(&name)?),
        Command::Write { name, output } => match output {
            Some(path) => {
                session.persist_container(&name, &path)?;
                Reply::Output(format!("Object [{name}] written to {}", path.display()))
            }
            None => Reply::Output(session.print_container(&name)?),
        },
        Command::Config {
            uri,
            prefix,
            log_level,
            pass,
            enable_database_log,
        } => {
            if pass.is_some() {
                tracing::info!("Ignoring --pass: credentials are not supported");
            }
            let options = SessionOptions {
                endpoint: uri,
                prefix,
                log_level,
                enable_database_log,
            };
            if options.is_empty() {
                Reply::Output(describe(session))
            } else {
                session.configure(options).await?;
                Reply::Silent
            }
        }
        Command::Log => session
            .last_log()
            .map_or(Reply::Silent, |log| Reply::Output(log.to_owned())),
        Command::Exit => Reply::Exit,
    };
    Ok(reply)
}

fn describe<C: Connector, P: Prompter>(session: &Session<C, P>) -> String {
    let state = session.state();
    let unset = || "-".to_owned();
    format!(
        "uri: {}\nprefix: {}\nlogLevel: {}\nenableDatabaseLog: {}",
        state.endpoint.clone().unwrap_or_else(unset),
        state.component_prefix.clone().unwrap_or_else(unset),
        state.log_level.clone().unwrap_or_else(unset),
        state.database_log_enabled,
    )
}
