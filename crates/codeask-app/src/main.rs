mod cli;
mod documents;
mod host;
mod transport;
mod workspace;

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use codeask_common::{CodeaskError, ConfigError};
use codeask_config::CodeaskConfig;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::documents::FsDocumentSource;
use crate::host::Host;
use crate::transport::Output;
use crate::workspace::WorkspaceScanner;

const DEFAULT_DIRECTIVE: &str = "codeask=info";

/// Load environment variables from a .env file (KEY=VALUE lines).
/// Variables already set in the environment win.
fn load_dotenv() {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("codeask").join(".env"));
    }

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
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
            return;
        }
    }
}

fn init_tracing(directive: &str) {
    let directive = directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_DIRECTIVE.parse::<Directive>());
    let filter = match directive {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &cli::Args) -> Result<CodeaskConfig, ConfigError> {
    match &args.config {
        Some(path) => codeask_config::load_config_from(path),
        None => codeask_config::load_config(),
    }
}

/// Fold CLI overrides into the loaded config.
fn apply_overrides(args: &cli::Args, config: &mut CodeaskConfig) {
    if let Some(dir) = &args.workspace {
        config.tracking.workspace_root = Some(dir.clone());
    }
    if let Some(policy) = args.policy {
        config.tracking.policy = policy;
    }
}

fn run(config: CodeaskConfig) -> Result<(), CodeaskError> {
    let root = match &config.tracking.workspace_root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CodeaskError::Workspace(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    tracing::info!(
        root = %root.display(),
        policy = config.tracking.policy.as_str(),
        "workspace ready"
    );

    let client =
        codeask_ai::build_client(&config.ai).map_err(|e| CodeaskError::Ai(e.to_string()))?;

    let out: Output = Rc::new(RefCell::new(std::io::stdout()));
    let app = Host::new(
        config.tracking.policy,
        FsDocumentSource::new(&root, config.tracking.max_file_bytes),
        WorkspaceScanner::new(&root, config.tracking.include_hidden),
        client,
        out,
    );
    app.start()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, host::run(app))?;
    Ok(())
}

fn main() -> ExitCode {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();

    // Logging level comes from the CLI, then the config, so load config first
    // and report its outcome once the subscriber is up.
    let loaded = load_config(&args);
    let directive = match (&args.log_level, &loaded) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.level.directive().to_string(),
        (None, Err(_)) => DEFAULT_DIRECTIVE.to_string(),
    };
    init_tracing(&directive);

    tracing::info!("codeask v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match (loaded, &args.config) {
        (Ok(config), _) => config,
        (Err(e), Some(path)) => {
            tracing::error!("Failed to load config {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        (Err(e), None) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            CodeaskConfig::default()
        }
    };

    apply_overrides(&args, &mut config);
    if args.print_config {
        println!("{}", codeask_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    match run(config) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
