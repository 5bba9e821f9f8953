use anyhow::Result;
use assistant_core::{
    build_pipeline, start_assistant, AssistantConfig, MetricsHub, Pipeline, Secrets, ServiceMode,
    TurnOutcome,
};
use clap::{Parser, Subcommand};
use device_registry::{MockLightBackend, PowerState};
use intent_parser::{
    parse_device_command, plan_device_commands, plan_music_command, TurnClassification,
};
use serde::Serialize;
use serde_json::json;
use std::io;
use std::path::PathBuf;
use voice_local::plugin::VoiceIo;
use voice_local::{ConsoleSpeaker, ScriptedListener};

#[derive(Parser, Debug)]
#[command(
    name = "atom",
    version,
    about = "Atom assistant developer CLI",
    disable_help_subcommand = true
)]
struct Cli {
    /// YAML configuration (built-in defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the salutation/intent cascade on an utterance
    Classify { text: String },
    /// Parse a lighting phrase and plan its device commands
    ParseLight {
        phrase: String,
        /// Assumed current brightness of the device
        #[arg(long, default_value_t = 50u8)]
        brightness: u8,
    },
    /// Classify a music request and show the player directive
    Music { text: String },
    /// List the configured lights
    Devices,
    /// Dry-run one full turn against offline services
    Turn { text: String },
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(p) => AssistantConfig::load(p)?,
        None => AssistantConfig::default(),
    };

    match cli.command {
        Commands::Classify { text } => classify(&config, &text),
        Commands::ParseLight { phrase, brightness } => parse_light(&config, &phrase, brightness),
        Commands::Music { text } => music(&config, &text),
        Commands::Devices => devices(&config),
        Commands::Turn { text } => turn(&config, &text),
    }
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn pipeline(config: &AssistantConfig) -> Result<Pipeline> {
    let metrics = MetricsHub::new().map_err(anyhow::Error::msg)?;
    build_pipeline(config, &metrics)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn classify(config: &AssistantConfig, text: &str) -> Result<()> {
    let pipeline = pipeline(config)?;
    let out = match pipeline.cascade.classify_turn(text)? {
        TurnClassification::Continue(intent) => json!({"turn": "continue", "intent": intent}),
        TurnClassification::Exit => json!({"turn": "exit"}),
        TurnClassification::Blank => json!({"turn": "blank"}),
    };
    print_json(&out)
}

fn parse_light(config: &AssistantConfig, phrase: &str, brightness: u8) -> Result<()> {
    let pipeline = pipeline(config)?;
    let request = parse_device_command(phrase, &pipeline.devices, &pipeline.palette)?;
    let backend = MockLightBackend::new().with_device(&request.device, PowerState::On, brightness);
    let plan = plan_device_commands(&request, &backend, &pipeline.palette)?;
    print_json(&json!({"request": request, "plan": plan}))
}

fn music(config: &AssistantConfig, text: &str) -> Result<()> {
    let pipeline = pipeline(config)?;
    let command = pipeline.music.classify_command(text)?;
    let directive = plan_music_command(&command);
    print_json(&json!({"command": command, "directive": directive}))
}

fn devices(config: &AssistantConfig) -> Result<()> {
    let pipeline = pipeline(config)?;
    for d in pipeline.devices.iter() {
        println!("{}\tmodel={}\tid={}", d.name, d.model, d.identifier);
    }
    Ok(())
}

fn turn(config: &AssistantConfig, text: &str) -> Result<()> {
    let voice_cfg = config.assistant.voice();
    let voice: VoiceIo = (
        Box::new(ScriptedListener::default()),
        Box::new(ConsoleSpeaker::new(io::stdout(), &voice_cfg)),
    );
    let mut assistant =
        start_assistant(config, &Secrets::default(), ServiceMode::Offline, voice)?;
    let outcome = match assistant.process_turn(text) {
        TurnOutcome::Continue => "continue",
        TurnOutcome::Standby => "standby",
        TurnOutcome::Exit => "exit",
    };
    println!("outcome: {outcome}");
    Ok(())
}
