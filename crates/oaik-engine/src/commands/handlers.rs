//! Handler functions for the command table.

use serde_json::Value;

use crate::error::CommandError;
use crate::literal::parse_literal;
use crate::output::{Payload, RichText};
use crate::session::SessionState;

use super::{split_first, COMMANDS};

pub const USAGE: &str = r#"Welcome to oaik, an interface to OpenAI models.
To get started, set your API key with '%api_key API_KEY' or '%api_key_path PATH_TO_API_KEY', create a .openai_api_key file in your home directory, or set the OPENAI_API_KEY or OPENAI_API_KEY_PATH environment variables.
You can set the OpenAI organization with '%organization ORGANIZATION'.

There are two modes, "chat" and "image". Change mode with '%mode chat' or '%mode image'.

In chat mode every line you enter is sent to the chat model.
Set the model with '%set model gpt-3.5-turbo' and the temperature with '%set temperature 1'. Set the system message with '%set system_prompt you are a bot' (set it to None to remove it).
Chat history is sent with each request and counts toward the model's token limit. View it with '%history' ('%history --raw' for the raw messages) and clear it with '%clear_history'.
Disable history with '%set use_history False', or replace it with '%set history [{"role": "user", "content": "hello bot"}, {"role": "assistant", "content": "hi user"}]'.
Other chat parameters can be set with '%set chat_kwargs {"frequency_penalty": 1}'.
Read any setting back with '%get NAME'.

In image mode every line you enter is used as an image prompt.
Set the image size with '%set size 1024x1024' (256x256, 512x512 or 1024x1024) and the number of images with '%set n 5' (1-10)."#;

pub(super) fn set(state: &mut SessionState, args: &str) -> Result<Option<Payload>, CommandError> {
    let (name, value) = split_first(args);
    if name.is_empty() || value.is_empty() {
        return Err(CommandError::MissingArgument {
            usage: "%set NAME VALUE",
        });
    }
    state.set(name, parse_literal(value))?;
    Ok(None)
}

pub(super) fn get(state: &mut SessionState, args: &str) -> Result<Option<Payload>, CommandError> {
    let name = required(args, "%get NAME")?;
    match state.get(name) {
        Value::Null => Ok(None),
        value => Ok(Some(Payload::Data(value))),
    }
}

pub(super) fn api_key(
    state: &mut SessionState,
    args: &str,
) -> Result<Option<Payload>, CommandError> {
    let key = required(args, "%api_key API_KEY")?;
    state.set_api_key(Some(key.to_string()));
    Ok(None)
}

pub(super) fn api_key_path(
    state: &mut SessionState,
    args: &str,
) -> Result<Option<Payload>, CommandError> {
    let path = required(args, "%api_key_path PATH_TO_API_KEY")?;
    state.set_api_key_path(Some(path.into()));
    Ok(None)
}

pub(super) fn organization(
    state: &mut SessionState,
    args: &str,
) -> Result<Option<Payload>, CommandError> {
    let org = required(args, "%organization ORGANIZATION")?;
    state.set_organization(Some(org.to_string()));
    Ok(None)
}

pub(super) fn mode(state: &mut SessionState, args: &str) -> Result<Option<Payload>, CommandError> {
    let mode = required(args, "%mode MODE")?;
    state.set_mode(mode);
    Ok(None)
}

pub(super) fn history(
    state: &mut SessionState,
    args: &str,
) -> Result<Option<Payload>, CommandError> {
    let mut raw = false;
    for arg in args.split_whitespace() {
        match arg {
            "-r" | "--raw" => raw = true,
            other => {
                return Err(CommandError::UnexpectedArgument {
                    command: "history",
                    argument: other.to_string(),
                })
            }
        }
    }

    let history = state.get("history");
    if raw {
        return Ok(Some(Payload::Data(history)));
    }

    let messages = history.as_array().cloned().unwrap_or_default();
    let markdown: String = messages.iter().map(|msg| format!("{msg}<br />")).collect();
    Ok(Some(Payload::Text(RichText::with_markdown(
        history.to_string(),
        markdown,
    ))))
}

pub(super) fn clear_history(
    state: &mut SessionState,
    args: &str,
) -> Result<Option<Payload>, CommandError> {
    no_arguments("clear_history", args)?;
    state.clear();
    Ok(None)
}

pub(super) fn help(_state: &mut SessionState, args: &str) -> Result<Option<Payload>, CommandError> {
    no_arguments("help", args)?;
    Ok(Some(Payload::Text(RichText::plain(help_text()))))
}

/// Usage prose followed by one line per entry in the command table.
pub fn help_text() -> String {
    let mut text = format!("{USAGE}\n\nCommands:");
    for command in COMMANDS {
        text.push_str(&format!("\n  {:<32}{}", command.usage, command.summary));
    }
    text
}

fn required<'a>(args: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    let args = args.trim();
    if args.is_empty() {
        return Err(CommandError::MissingArgument { usage });
    }
    Ok(args)
}

fn no_arguments(command: &'static str, args: &str) -> Result<(), CommandError> {
    match args.split_whitespace().next() {
        Some(extra) => Err(CommandError::UnexpectedArgument {
            command,
            argument: extra.to_string(),
        }),
        None => Ok(()),
    }
}
