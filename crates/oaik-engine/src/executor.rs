//! Per-cell execution: build, call, interpret, classify.

use std::sync::Arc;

use oaik_common::SessionId;
use tracing::{debug, info, warn};

use crate::classify;
use crate::commands;
use crate::error::{ApiError, CommandError};
use crate::output::{CellResult, DisplaySink, Payload, RichText};
use crate::request::{build_request, Request};
use crate::response;
use crate::session::SessionState;
use crate::{CompletionClient, Message};

/// One session: its state plus the client it talks to.
///
/// Cells and commands run one at a time; `&mut self` on both keeps a
/// command from interleaving with an in-flight call.
pub struct Kernel {
    id: SessionId,
    state: SessionState,
    client: Arc<dyn CompletionClient>,
}

impl Kernel {
    pub fn new(state: SessionState, client: Arc<dyn CompletionClient>) -> Self {
        let id = SessionId::new();
        info!(session = %id, mode = %state.mode(), "session started");
        Self { id, state, client }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run one cell against the API.
    ///
    /// Image mode sends its output to `display` and succeeds with no
    /// payload. On any failure history is left as it was. Returns `None`
    /// when `silent` is set.
    pub async fn execute(
        &mut self,
        cell: &str,
        silent: bool,
        display: &mut dyn DisplaySink,
    ) -> Option<CellResult> {
        let result = match self.run_cell(cell, display).await {
            Ok(output) => CellResult::Success(output),
            Err(err) => {
                let failure = classify::failure(&err);
                warn!(category = %failure.category, "cell failed: {err}");
                CellResult::Failure(failure)
            }
        };
        (!silent).then_some(result)
    }

    /// Run one `%` command line.
    pub fn run_command(&mut self, line: &str) -> Result<Option<Payload>, CommandError> {
        commands::dispatch(&mut self.state, line)
    }

    async fn run_cell(
        &mut self,
        cell: &str,
        display: &mut dyn DisplaySink,
    ) -> Result<Option<RichText>, ApiError> {
        match build_request(&self.state, cell) {
            Request::Chat(request) => {
                debug!(messages = request.messages.len(), "executing chat cell");
                let completion = self
                    .client
                    .chat_completion(self.state.client(), &request)
                    .await?;
                let output =
                    response::interpret_chat(&mut self.state, Message::user(cell), completion)?;
                Ok(Some(output))
            }
            Request::Image(request) => {
                debug!("executing image cell");
                let generated = self
                    .client
                    .create_image(self.state.client(), &request)
                    .await?;
                for event in response::interpret_images(cell, generated)? {
                    display.display(event);
                }
                Ok(None)
            }
        }
    }
}
