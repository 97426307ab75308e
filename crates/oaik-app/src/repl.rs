//! Line-oriented host loop: stdin in, rendered results out.

use std::path::PathBuf;

use oaik_common::{new_correlation_id, OaikError};
use oaik_engine::commands::is_command;
use oaik_engine::{CellFailure, CellResult, DisplayEvent, DisplaySink, Kernel, Payload};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Instrument;

pub const BANNER: &str =
    "oaik - an interface to OpenAI models. Type %help for usage, Ctrl-D to quit.";

/// Writes generated images to disk and prints where they went.
pub struct ImageWriter {
    dir: PathBuf,
    written: usize,
}

impl ImageWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, written: 0 }
    }

    /// Next numbered path not already taken in `dir`.
    fn next_path(&mut self, format: &str) -> PathBuf {
        loop {
            self.written += 1;
            let path = self.dir.join(format!("oaik-image-{}.{format}", self.written));
            if !path.exists() {
                return path;
            }
        }
    }
}

impl DisplaySink for ImageWriter {
    fn display(&mut self, event: DisplayEvent) {
        let path = self.next_path(event.format);
        match std::fs::write(&path, &event.data) {
            Ok(()) => println!("[{}] {}", event.alt, path.display()),
            Err(e) => tracing::warn!("failed to write {}: {e}", path.display()),
        }
    }
}

/// Read stdin until EOF, handling one input per line.
pub async fn run(kernel: &mut Kernel, display: &mut dyn DisplaySink) -> Result<(), OaikError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        handle_input(kernel, &line, display).await;
    }
    Ok(())
}

/// Route a line to the command dispatcher or the model and print the result.
pub async fn handle_input(kernel: &mut Kernel, input: &str, display: &mut dyn DisplaySink) {
    if is_command(input) {
        match kernel.run_command(input) {
            Ok(Some(payload)) => println!("{}", render_payload(&payload)),
            Ok(None) => {}
            Err(e) => eprintln!("error: {e}"),
        }
        return;
    }

    let span = tracing::info_span!("cell", session = %kernel.id(), id = %new_correlation_id());
    match kernel.execute(input, false, display).instrument(span).await {
        Some(CellResult::Success(Some(output))) => println!("{}", output.text),
        Some(CellResult::Success(None)) | None => {}
        Some(CellResult::Failure(failure)) => eprintln!("{}", render_failure(&failure)),
    }
}

pub fn render_payload(payload: &Payload) -> String {
    match payload {
        Payload::Text(text) => text.text.clone(),
        Payload::Data(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

pub fn render_failure(failure: &CellFailure) -> String {
    let mut out = format!(
        "[{}] {}: {}",
        failure.category, failure.name, failure.message
    );
    for line in &failure.traceback {
        out.push('\n');
        out.push_str(line);
    }
    out
}
