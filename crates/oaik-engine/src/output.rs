//! Values a cell or command hands back to the host.

use crate::classify::ErrorCategory;

/// Plain text with an optional richer markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    pub text: String,
    pub markdown: String,
}

impl RichText {
    /// Markdown identical to the plain text.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            markdown: text.clone(),
            text,
        }
    }

    pub fn with_markdown(text: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: markdown.into(),
        }
    }
}

/// Output of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(RichText),
    Data(serde_json::Value),
}

/// One image to show, emitted in image mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEvent {
    pub data: Vec<u8>,
    pub format: &'static str,
    pub alt: String,
}

/// Receives display events as a cell produces them.
pub trait DisplaySink {
    fn display(&mut self, event: DisplayEvent);
}

impl DisplaySink for Vec<DisplayEvent> {
    fn display(&mut self, event: DisplayEvent) {
        self.push(event);
    }
}

/// A cell that failed, ready to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFailure {
    pub category: ErrorCategory,
    /// Error type name, e.g. `AuthenticationError`.
    pub name: String,
    /// The error's own message.
    pub message: String,
    /// First line: what to do about it. The rest: technical trace.
    pub traceback: Vec<String>,
}

impl CellFailure {
    pub fn explanation(&self) -> &str {
        self.traceback.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellResult {
    /// `None` when the output went out as display events.
    Success(Option<RichText>),
    Failure(CellFailure),
}
