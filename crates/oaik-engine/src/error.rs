//! Error types for the remote call, session setters, and commands.

use std::path::PathBuf;

/// Failure of a remote API call or of interpreting its response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Authentication(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("failed to read API key file {path:?}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl ApiError {
    /// Short type name shown as the failure's error name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ApiError::Authentication(_) => "AuthenticationError",
            ApiError::Connection(_) => "ConnectionError",
            ApiError::Api { .. } => "APIError",
            ApiError::Parse(_) => "ParseError",
            ApiError::KeyFile { .. } => "KeyFileError",
            ApiError::Decode(_) => "DecodeError",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("history must be a list of {{\"role\", \"content\"}} messages: {0}")]
    InvalidHistory(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: %{0}")]
    Unknown(String),

    #[error("missing argument, usage: {usage}")]
    MissingArgument { usage: &'static str },

    #[error("%{command} does not accept {argument:?}")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}
