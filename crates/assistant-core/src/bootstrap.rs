//! Startup: load classifier bundles and the device registry, connect the
//! outside services and greet the user.

use crate::assistant::{Assistant, Pipeline, Services, Settings};
use crate::config::{AssistantConfig, Secrets};
use crate::metrics::MetricsHub;
use crate::phrases;
use anyhow::Context;
use device_registry::{
    load_registry_file, ColorPalette, DeviceController, DeviceRegistry, LightBackend,
    MockLightBackend,
};
use intent_parser::{ModelRegistry, MusicClassifier, UtteranceCascade};
use service_clients::{
    LanguageModel, MockLanguageModel, MockMusicPlayer, MockWeather, MusicPlayer, WeatherService,
};
use tracing::{info, warn};
use voice_local::plugin::VoiceIo;

/// Whether outside services are contacted at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceMode {
    #[default]
    Live,
    /// In-memory collaborators only
    Offline,
}

/// Load every configured bundle up front; a bundle that fails to load is
/// fatal.
pub fn build_pipeline(config: &AssistantConfig, metrics: &MetricsHub) -> anyhow::Result<Pipeline> {
    let models = &config.models;
    let registry = ModelRegistry::new(&models.dir, models.bundles.iter().cloned());
    let loaded = registry
        .preload(&models.preload)
        .with_context(|| format!("loading classifier bundles from {}", models.dir.display()))?;
    metrics.atom.models_loaded.set(loaded as i64);

    let cascade = UtteranceCascade::from_registry(&registry, &models.stages)
        .context("building the salutation/intent cascade")?;
    let music = MusicClassifier::from_registry(&registry, &models.stages)
        .context("building the music classifier")?;

    let devices = match &config.devices.registry {
        Some(path) => load_registry_file(path)?,
        None => DeviceRegistry::default_installation(),
    };
    info!("Device registry holds {} lights", devices.len());

    Ok(Pipeline {
        cascade,
        music,
        devices,
        palette: ColorPalette::default(),
    })
}

/// Live clients where credentials allow, in-memory stand-ins otherwise.
pub fn build_services(
    config: &AssistantConfig,
    secrets: &Secrets,
    mode: ServiceMode,
) -> anyhow::Result<Services> {
    Ok(Services {
        lights: DeviceController::new(light_backend(config, secrets, mode)?),
        player: music_player(config, secrets, mode)?,
        weather: weather_service(config, secrets, mode)?,
        llm: language_model(config, mode)?,
    })
}

#[allow(unused_variables)]
fn light_backend(
    config: &AssistantConfig,
    secrets: &Secrets,
    mode: ServiceMode,
) -> anyhow::Result<Box<dyn LightBackend>> {
    #[cfg(feature = "http")]
    {
        if mode == ServiceMode::Live {
            if let Some(key) = &secrets.govee_api_key {
                let backend =
                    device_registry::HttpLightBackend::new(&config.devices.api_base_url, key)
                        .context("creating the light client")?;
                return Ok(Box::new(backend));
            }
            warn!("GOVEE_API_KEY is not set, lights are simulated");
        }
    }
    Ok(Box::new(MockLightBackend::new()))
}

#[allow(unused_variables)]
fn music_player(
    config: &AssistantConfig,
    secrets: &Secrets,
    mode: ServiceMode,
) -> anyhow::Result<Box<dyn MusicPlayer>> {
    #[cfg(feature = "http")]
    {
        if mode == ServiceMode::Live {
            if let Some(token) = &secrets.spotify_access_token {
                let client = service_clients::SpotifyClient::new(&config.music.api_base_url, token)
                    .context("creating the music client")?;
                return Ok(Box::new(client));
            }
            warn!("SPOTIFY_ACCESS_TOKEN is not set, music playback is simulated");
        }
    }
    Ok(Box::new(MockMusicPlayer::new()))
}

#[allow(unused_variables)]
fn weather_service(
    config: &AssistantConfig,
    secrets: &Secrets,
    mode: ServiceMode,
) -> anyhow::Result<Box<dyn WeatherService>> {
    #[cfg(feature = "http")]
    {
        if mode == ServiceMode::Live {
            if let Some(key) = &secrets.weather_api_key {
                let client = service_clients::OpenWeatherClient::new(
                    &config.weather.api_base_url,
                    key,
                    config.assistant.units,
                )
                .context("creating the weather client")?;
                return Ok(Box::new(client));
            }
            warn!("WEATHER_API_KEY is not set, weather reports are unavailable");
        }
    }
    Ok(Box::new(MockWeather::failing()))
}

#[allow(unused_variables)]
fn language_model(
    config: &AssistantConfig,
    mode: ServiceMode,
) -> anyhow::Result<Box<dyn LanguageModel>> {
    #[cfg(feature = "http")]
    {
        if mode == ServiceMode::Live {
            let client =
                service_clients::OllamaClient::new(&config.llm.endpoint, &config.llm.model)
                    .context("creating the language model client")?;
            return Ok(Box::new(client));
        }
    }
    Ok(Box::new(MockLanguageModel::new()))
}

/// Greet, load models, connect services, then report ready.
pub fn start_assistant(
    config: &AssistantConfig,
    secrets: &Secrets,
    mode: ServiceMode,
    voice: VoiceIo,
) -> anyhow::Result<Assistant> {
    let (listener, mut speaker) = voice;
    if let Err(e) = speaker.speak(phrases::WELCOME) {
        warn!("Could not speak the welcome: {}", e);
    }

    let metrics = MetricsHub::new().map_err(anyhow::Error::msg)?;
    let pipeline = build_pipeline(config, &metrics)?;
    let services = build_services(config, secrets, mode)?;
    let mut assistant = Assistant::new(
        pipeline,
        services,
        (listener, speaker),
        metrics,
        Settings::from(&config.assistant),
    );
    assistant.say(phrases::READY);
    info!("Assistant ready ({:?} services)", mode);
    Ok(assistant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use voice_local::{RecordingSpeaker, ScriptedListener};

    fn shipped_config() -> AssistantConfig {
        let mut cfg = AssistantConfig::default();
        cfg.models.dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models");
        cfg
    }

    fn voice(lines: &[&str], speaker: &RecordingSpeaker) -> VoiceIo {
        (
            Box::new(ScriptedListener::from_lines(lines.iter().copied())),
            Box::new(speaker.clone()),
        )
    }

    #[test]
    fn test_shipped_bundles_load() {
        let cfg = shipped_config();
        let metrics = MetricsHub::new().unwrap();
        let pipeline = build_pipeline(&cfg, &metrics).unwrap();
        assert_eq!(metrics.atom.models_loaded.get(), 5);
        assert_eq!(pipeline.devices.len(), 9);
    }

    #[test]
    fn test_missing_bundle_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = AssistantConfig::default();
        cfg.models.dir = dir.path().to_path_buf();
        let metrics = MetricsHub::new().unwrap();
        let err = build_pipeline(&cfg, &metrics).err().unwrap();
        assert!(format!("{err:#}").contains("loading classifier bundles"));
    }

    #[test]
    fn test_offline_start_and_turns() {
        let speaker = RecordingSpeaker::new();
        let mut assistant = start_assistant(
            &shipped_config(),
            &Secrets::default(),
            ServiceMode::Offline,
            voice(
                &["turn off the right side lamp", "goodbye", "what's the weather like"],
                &speaker,
            ),
        )
        .unwrap();
        let spoken = speaker.spoken();
        assert_eq!(spoken, vec![phrases::WELCOME, phrases::READY]);

        let summary = assistant.run();
        assert_eq!(summary.conversations, 2);
        assert_eq!(summary.exits, 1);
        assert!(speaker.said("Turned Right Side Lamp off."));
        assert!(speaker.said(intent_parser::FAREWELL));
        assert!(speaker.said("Routing you to: Weather"));
        assert!(speaker.said(&phrases::weather_failed("High Point")));
        assert_eq!(assistant.metrics().intent_count("IoT"), 1);
    }
}
