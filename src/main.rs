mod artifacts;
mod client;
mod config;
mod console;
mod logging;
mod prompts;
mod question;
mod sanitize;
mod session;
mod tts;
mod verify;

use std::io;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use crate::config::ConfigLoadStatus;
use crate::session::{Session, SessionOptions};

/// Interactive project questionnaire that drafts and self-checks
/// specifications via a local LLM.
#[derive(Debug, Parser)]
#[command(name = "specsmith", version, about)]
struct Cli {
    /// Directory for generated artifacts (overrides config)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Base URL of the generation endpoint (overrides config)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Model name sent with each generation request (overrides config)
    #[arg(long, value_name = "NAME")]
    model: Option<String>,

    /// Accept defaults without prompting where a default exists
    #[arg(long)]
    quick: bool,

    /// Skip the spoken summary even if TTS is enabled in config
    #[arg(long)]
    skip_audio: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let start_time = Instant::now();

    // Config before logging: the log level lives in the config file. Any
    // tracing calls made while loading go nowhere, which is fine.
    let loaded = config::load_config();
    let mut config = loaded.config;

    if let Some(dir) = cli.output_dir {
        config.paths.output_dir = dir;
    }
    if let Some(url) = cli.endpoint {
        config.endpoint.base_url = url;
    }
    if let Some(model) = cli.model {
        config.endpoint.model = model;
    }

    // Initialize logging before the session starts. Failure degrades to an
    // unlogged run instead of aborting.
    let logging_context = match logging::init(&config.logging.level) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    if let Some(ctx) = &logging_context {
        logging::cleanup_old_logs(&ctx.log_directory);
    }

    debug!(
        config_path = %loaded.config_path.display(),
        status = ?loaded.status,
        "config_loaded"
    );
    match &loaded.status {
        ConfigLoadStatus::Created => {
            println!(
                "{}",
                console::step(&format!(
                    "Created default config at {:?}",
                    loaded.config_path
                ))
            );
        }
        ConfigLoadStatus::Error(reason) => {
            println!(
                "{}",
                console::warning(&format!("config not loaded ({}), using defaults", reason))
            );
        }
        ConfigLoadStatus::Loaded => {}
    }

    let options = SessionOptions {
        quick: cli.quick,
        skip_audio: cli.skip_audio,
    };

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();

    let session = Session::new(config);
    let summary = session.run(&mut reader, &mut writer, options)?;

    if let Some(ctx) = &logging_context {
        info!(
            session_id = %ctx.session_id,
            duration_secs = start_time.elapsed().as_secs_f64(),
            artifacts = ?summary.artifacts.report,
            "session_end"
        );
    }

    Ok(())
}
