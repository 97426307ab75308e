//! Maps call failures onto user-facing diagnostics.
//!
//! Categories are checked in priority order:
//! 1. authentication failure saying no key was provided
//! 2. any other authentication failure
//! 3. connection failure
//! 4. everything else

use std::error::Error;
use std::fmt;

use crate::error::ApiError;
use crate::output::CellFailure;

/// Marker the client puts in the message when no key is configured.
pub const NO_KEY_MARKER: &str = "No API key provided";

pub const MISSING_KEY_MESSAGE: &str = "No OpenAI API key provided, set your API key by using the 'magic' commands '%api_key API_KEY' or '%api_key_path PATH_TO_API_KEY', creating a .openai_api_key file in your home directory, or by setting the OPENAI_API_KEY or OPENAI_API_KEY_PATH environment variables";

pub const CONNECTION_MESSAGE: &str =
    "Something went wrong communicating with the OpenAI API, please try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    MissingCredential,
    AuthenticationRejected,
    NetworkUnavailable,
    Unclassified,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::MissingCredential => "MissingCredential",
            ErrorCategory::AuthenticationRejected => "AuthenticationRejected",
            ErrorCategory::NetworkUnavailable => "NetworkUnavailable",
            ErrorCategory::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    pub category: ErrorCategory,
    pub message: String,
}

pub fn classify(err: &ApiError) -> Diagnosis {
    let (category, message) = match err {
        ApiError::Authentication(msg) if msg.contains(NO_KEY_MARKER) => (
            ErrorCategory::MissingCredential,
            MISSING_KEY_MESSAGE.to_string(),
        ),
        ApiError::Authentication(msg) => (ErrorCategory::AuthenticationRejected, msg.clone()),
        ApiError::Connection(_) => (
            ErrorCategory::NetworkUnavailable,
            CONNECTION_MESSAGE.to_string(),
        ),
        other => (ErrorCategory::Unclassified, other.to_string()),
    };
    Diagnosis { category, message }
}

/// Classify `err` and attach the technical trace after the explanation.
pub fn failure(err: &ApiError) -> CellFailure {
    let Diagnosis { category, message } = classify(err);
    let mut traceback = vec![message];
    traceback.extend(trace(err));
    CellFailure {
        category,
        name: err.kind_name().to_string(),
        message: err.to_string(),
        traceback,
    }
}

fn trace(err: &ApiError) -> Vec<String> {
    let mut lines = vec![format!("{}: {err}", err.kind_name())];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    lines.push(format!("details: {err:?}"));
    lines
}
