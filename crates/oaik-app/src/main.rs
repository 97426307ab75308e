mod cli;
mod repl;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use oaik_common::OaikError;
use oaik_config::OaikConfig;
use oaik_engine::{CompletionClient, CredentialSources, Kernel, MockClient, OpenAiClient, SessionState};
use tracing_subscriber::EnvFilter;

/// Load environment variables from a .env file (KEY=VALUE lines) in the
/// current directory. Variables already set win.
fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(path: &Path) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn init_logging(level: Option<&str>) {
    let directive = level.unwrap_or("oaik=info");
    let filter = match directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::new("oaik=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &cli::Args) -> Result<OaikConfig, OaikError> {
    match &args.config {
        Some(path) => {
            tracing::info!("Using config override: {}", path.display());
            Ok(oaik_config::load_config_from(path)?)
        }
        None => Ok(oaik_config::load_config().unwrap_or_else(|e| {
            tracing::warn!("Config load failed, using defaults: {e}");
            OaikConfig::default()
        })),
    }
}

fn build_client(mock: bool) -> Result<Arc<dyn CompletionClient>, OaikError> {
    if mock {
        tracing::info!("Using mock OpenAI client");
        return Ok(Arc::new(MockClient::new()));
    }
    let client = OpenAiClient::new().map_err(|e| OaikError::Engine(e.to_string()))?;
    Ok(Arc::new(client))
}

async fn run(args: cli::Args) -> Result<(), OaikError> {
    let config = load_config(&args)?;
    let state = SessionState::new(&config, &CredentialSources::from_env());
    let mut kernel = Kernel::new(state, build_client(args.mock)?);
    let mut display = repl::ImageWriter::new(args.image_dir.clone());

    if let Some(input) = &args.execute {
        repl::handle_input(&mut kernel, input, &mut display).await;
        return Ok(());
    }

    if !args.quiet {
        println!("{}", repl::BANNER);
    }
    repl::run(&mut kernel, &mut display).await
}

fn main() -> ExitCode {
    // Before the runtime spawns worker threads.
    load_dotenv();

    let args = cli::parse();
    init_logging(args.log_level.as_deref());
    tracing::debug!("oaik v{} starting", env!("CARGO_PKG_VERSION"));

    let result = tokio::runtime::Runtime::new()
        .map_err(OaikError::from)
        .and_then(|runtime| runtime.block_on(run(args)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
