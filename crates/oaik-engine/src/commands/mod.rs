//! `%`-prefixed commands that read or change session state.
//!
//! Commands never reach the model and never enter history. Each entry
//! in [`COMMANDS`] maps a name to a handler taking the session and the
//! rest of the input line.

mod handlers;


use tracing::debug;

use crate::error::CommandError;
use crate::output::Payload;
use crate::session::SessionState;

pub use handlers::{help_text, USAGE};

/// Prefix that marks an input line as a command.
pub const COMMAND_PREFIX: char = '%';

pub type Handler = fn(&mut SessionState, &str) -> Result<Option<Payload>, CommandError>;

pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "set",
        usage: "%set NAME VALUE",
        summary: "Set a session variable",
        handler: handlers::set,
    },
    CommandSpec {
        name: "get",
        usage: "%get NAME",
        summary: "Show a session variable",
        handler: handlers::get,
    },
    CommandSpec {
        name: "api_key",
        usage: "%api_key API_KEY",
        summary: "Set the OpenAI API key",
        handler: handlers::api_key,
    },
    CommandSpec {
        name: "api_key_path",
        usage: "%api_key_path PATH_TO_API_KEY",
        summary: "Set the path to a file holding the OpenAI API key",
        handler: handlers::api_key_path,
    },
    CommandSpec {
        name: "organization",
        usage: "%organization ORGANIZATION",
        summary: "Set the OpenAI organization",
        handler: handlers::organization,
    },
    CommandSpec {
        name: "mode",
        usage: "%mode MODE",
        summary: "Switch between chat and image mode",
        handler: handlers::mode,
    },
    CommandSpec {
        name: "history",
        usage: "%history [--raw]",
        summary: "Show chat history",
        handler: handlers::history,
    },
    CommandSpec {
        name: "clear_history",
        usage: "%clear_history",
        summary: "Clear chat history",
        handler: handlers::clear_history,
    },
    CommandSpec {
        name: "help",
        usage: "%help",
        summary: "Show usage",
        handler: handlers::help,
    },
];

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// True for lines the dispatcher should handle instead of the model.
pub fn is_command(line: &str) -> bool {
    line.trim_start().starts_with(COMMAND_PREFIX)
}

/// Run one command line, with or without its leading `%`.
pub fn dispatch(state: &mut SessionState, line: &str) -> Result<Option<Payload>, CommandError> {
    let line = line.trim();
    let line = line.strip_prefix(COMMAND_PREFIX).unwrap_or(line);
    let (name, args) = split_first(line);

    let command = lookup(name).ok_or_else(|| CommandError::Unknown(name.to_string()))?;
    debug!(command = command.name, "dispatching command");
    (command.handler)(state, args)
}

/// Split off the first whitespace-delimited token.
pub(crate) fn split_first(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}
