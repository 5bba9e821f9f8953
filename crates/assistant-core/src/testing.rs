//! Shared fixtures: rule-driven classifiers and in-memory collaborators.

use crate::assistant::{Assistant, Pipeline, Services, Settings};
use crate::metrics::MetricsHub;
use device_registry::{
    ColorPalette, DeviceController, DeviceRegistry, LightBackend, MockLightBackend,
};
use intent_parser::mock::RuleClassifier;
use intent_parser::{MusicClassifier, TrailingPhraseExtractor, UtteranceCascade};
use service_clients::{MockLanguageModel, MockMusicPlayer, MockWeather};
use std::sync::Arc;
use voice_local::plugin::VoiceIo;
use voice_local::{RecordingSpeaker, ScriptedListener};

pub(crate) struct Rig {
    pub lights: MockLightBackend,
    pub player: MockMusicPlayer,
    pub weather: MockWeather,
    pub llm: MockLanguageModel,
    pub speaker: RecordingSpeaker,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            lights: MockLightBackend::new(),
            player: MockMusicPlayer::new()
                .with_track("Back In Black", "spotify:track:back-in-black"),
            weather: MockWeather::new("Sunny and 72."),
            llm: MockLanguageModel::new(),
            speaker: RecordingSpeaker::new(),
        }
    }

    pub fn with_weather(mut self, weather: MockWeather) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_llm(mut self, llm: MockLanguageModel) -> Self {
        self.llm = llm;
        self
    }
}

pub(crate) fn pipeline() -> Pipeline {
    let salutation = RuleClassifier::new("General")
        .rule("goodbye", "Exit")
        .rule("thank you", "Thanks")
        .rule("hello", "Greeting");
    let intent = RuleClassifier::new("Blank")
        .rule("weather", "Weather")
        .rule("news", "News")
        .rule("explain", "ScientificResearch")
        .rule("why", "ScientificResearch")
        .rule("volume", "Music")
        .rule("play", "Music")
        .rule("pause", "Music")
        .rule("lamp", "IoT")
        .rule("light", "IoT")
        .rule("mirror", "IoT")
        .rule("define", "Lexicon")
        .rule("cake", "Cooking")
        .rule("stand by", "Exit");
    let action = RuleClassifier::new("unknown")
        .rule("volume", "volume")
        .rule("play", "play")
        .rule("pause", "pause")
        .rule("skip", "skip")
        .rule("rewind", "rewind");
    let target = RuleClassifier::new("song")
        .rule("artist", "artist")
        .rule(" up", "up")
        .rule(" down", "down");
    Pipeline {
        cascade: UtteranceCascade::new(Arc::new(salutation), Arc::new(intent)),
        music: MusicClassifier::new(
            Arc::new(action),
            Arc::new(target),
            Arc::new(TrailingPhraseExtractor::default()),
        ),
        devices: DeviceRegistry::default_installation(),
        palette: ColorPalette::default(),
    }
}

pub(crate) fn assistant_scripted(rig: &Rig, listener: ScriptedListener) -> Assistant {
    let lights: Box<dyn LightBackend> = Box::new(rig.lights.clone());
    let services = Services {
        lights: DeviceController::new(lights),
        player: Box::new(rig.player.clone()),
        weather: Box::new(rig.weather.clone()),
        llm: Box::new(rig.llm.clone()),
    };
    let settings = Settings {
        research_max_turns: 3,
        city: "High Point".to_string(),
    };
    let voice: VoiceIo = (Box::new(listener), Box::new(rig.speaker.clone()));
    Assistant::new(
        pipeline(),
        services,
        voice,
        MetricsHub::new().unwrap(),
        settings,
    )
}

/// Assistant whose listener plays back `lines`, one per turn.
pub(crate) fn assistant_with<I, S>(rig: &Rig, lines: I) -> Assistant
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    assistant_scripted(rig, ScriptedListener::from_lines(lines))
}
