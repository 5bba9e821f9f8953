use crate::config::AssistantSection;
use crate::metrics::MetricsHub;
use device_registry::{ColorPalette, DeviceController, DeviceRegistry, LightBackend};
use intent_parser::{MusicClassifier, UtteranceCascade};
use service_clients::{LanguageModel, MusicPlayer, WeatherService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;
use voice_local::plugin::VoiceIo;
use voice_local::{Listener, Speaker};

/// Classification and parsing stages, built once at startup.
pub struct Pipeline {
    pub cascade: UtteranceCascade,
    pub music: MusicClassifier,
    pub devices: DeviceRegistry,
    pub palette: ColorPalette,
}

/// Outside collaborators the handlers drive.
pub struct Services {
    pub lights: DeviceController<Box<dyn LightBackend>>,
    pub player: Box<dyn MusicPlayer>,
    pub weather: Box<dyn WeatherService>,
    pub llm: Box<dyn LanguageModel>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub research_max_turns: usize,
    pub city: String,
}

impl From<&AssistantSection> for Settings {
    fn from(section: &AssistantSection) -> Self {
        Self {
            research_max_turns: section.research_max_turns,
            city: section.city.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&AssistantSection::default())
    }
}

/// The assistant: pipeline, collaborators and the voice it talks through.
pub struct Assistant {
    pub(crate) pipeline: Pipeline,
    pub(crate) services: Services,
    pub(crate) listener: Box<dyn Listener>,
    speaker: Box<dyn Speaker>,
    pub(crate) metrics: MetricsHub,
    pub(crate) settings: Settings,
    stop: Arc<AtomicBool>,
}

impl Assistant {
    pub fn new(
        pipeline: Pipeline,
        services: Services,
        voice: VoiceIo,
        metrics: MetricsHub,
        settings: Settings,
    ) -> Self {
        let (listener, speaker) = voice;
        Self {
            pipeline,
            services,
            listener,
            speaker,
            metrics,
            settings,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn metrics(&self) -> &MetricsHub {
        &self.metrics
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Setting the flag ends the session before the next turn.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub(crate) fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Speak, logging rather than failing when the output is gone.
    pub(crate) fn say(&mut self, text: &str) {
        if let Err(e) = self.speaker.speak(text) {
            warn!("Could not speak '{}': {}", text, e);
        }
    }
}
