use anyhow::{Context, Result};
use assistant_core::{start_assistant, AssistantConfig, Secrets, ServiceMode};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{info, warn};
use voice_local::plugin::{new_voice_backend, VoiceBackendKind};

const DEFAULT_CONFIG: &str = "config/atom.yaml";

#[derive(Parser)]
#[command(name = "atom-daemon")]
#[command(about = "Atom voice assistant: wake word, intent routing and device control")]
struct Args {
    /// YAML configuration; config/atom.yaml when present, else built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Voice backend: `console` or `script:<path>`
    #[arg(long, default_value = "console")]
    voice: String,

    /// Never contact outside services
    #[arg(long)]
    offline: bool,

    /// Tracing filter, overrides RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,

    /// Print Prometheus metrics on exit
    #[arg(long)]
    print_metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing(args.log_filter.as_deref());

    info!("Atom daemon starting");
    let config = load_config(args.config.as_ref())?;
    let secrets = Secrets::from_env();
    info!("Credentials: {:?}", secrets);

    let mode = if args.offline {
        ServiceMode::Offline
    } else {
        ServiceMode::Live
    };
    let kind: VoiceBackendKind = args
        .voice
        .parse()
        .map_err(|e| anyhow::anyhow!("Unknown voice backend: {}", e))?;
    info!("Voice backend: {:?}", kind);
    let voice = new_voice_backend(&kind, &config.assistant.voice())
        .context("opening the voice backend")?;

    // HTTP clients block, so they are built and used off the async workers.
    // Model load failures end startup here.
    let mut assistant =
        tokio::task::spawn_blocking(move || start_assistant(&config, &secrets, mode, voice))
            .await
            .context("startup task failed")??;
    let metrics = assistant.metrics().clone();
    let stop = assistant.stop_handle();

    let session = tokio::task::spawn_blocking(move || assistant.run());
    tokio::select! {
        finished = session => {
            let summary = finished.context("session task failed")?;
            info!(
                "Session summary: {} conversations, {} turns, {} exits",
                summary.conversations, summary.turns, summary.exits
            );
        }
        _ = tokio::signal::ctrl_c() => {
            stop.store(true, Ordering::SeqCst);
            warn!("Interrupted, stopping the session");
            if args.print_metrics {
                print!("{}", metrics.encode_text());
            }
            // A pending stdin read cannot be cancelled.
            std::process::exit(0);
        }
    }

    if args.print_metrics {
        print!("{}", metrics.encode_text());
    }
    info!("Atom daemon shutting down");
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<AssistantConfig> {
    match path {
        Some(p) => AssistantConfig::load(p),
        None if PathBuf::from(DEFAULT_CONFIG).exists() => AssistantConfig::load(DEFAULT_CONFIG),
        None => {
            warn!("No configuration file, using defaults");
            Ok(AssistantConfig::default())
        }
    }
}

fn setup_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(f) => tracing_subscriber::EnvFilter::new(f),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    // Speech goes to stdout; keep logs off it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
