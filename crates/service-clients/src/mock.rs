use crate::error::{Result, ServiceError};
use crate::llm::LanguageModel;
use crate::music::{MusicPlayer, Track};
use crate::weather::WeatherService;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

fn offline(service: &str) -> ServiceError {
    ServiceError::Http(format!("mock {service} offline"))
}

/// Calls received by [`MockMusicPlayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    Search(String),
    Play(String),
    Pause,
    Next,
    Previous,
    SetVolume(u8),
}

#[derive(Default)]
struct PlayerState {
    catalogue: Vec<Track>,
    volume: Option<u8>,
    calls: Vec<PlayerCall>,
    failing: bool,
}

/// In-memory player. Search matches catalogue names case-insensitively, with
/// any `target:` prefix stripped. Clones share state.
#[derive(Clone, Default)]
pub struct MockMusicPlayer {
    state: Arc<Mutex<PlayerState>>,
}

impl MockMusicPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(self, name: &str, uri: &str) -> Self {
        self.state.lock().catalogue.push(Track {
            name: name.to_string(),
            uri: uri.to_string(),
        });
        self
    }

    /// Volume of the active device; `None` means no active device.
    pub fn with_volume(self, volume: Option<u8>) -> Self {
        self.state.lock().volume = volume;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.state.lock().calls.clone()
    }

    pub fn volume(&self) -> Option<u8> {
        self.state.lock().volume
    }

    fn record(&self, call: PlayerCall) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(offline("player"));
        }
        state.calls.push(call);
        Ok(())
    }
}

impl MusicPlayer for MockMusicPlayer {
    fn search_track(&self, query: &str) -> Result<Option<Track>> {
        self.record(PlayerCall::Search(query.to_string()))?;
        let needle = query
            .split_once(':')
            .map_or(query, |(_, rest)| rest)
            .to_lowercase();
        Ok(self
            .state
            .lock()
            .catalogue
            .iter()
            .find(|t| t.name.to_lowercase().contains(&needle))
            .cloned())
    }

    fn start_playback(&self, track: &Track) -> Result<()> {
        self.record(PlayerCall::Play(track.uri.clone()))
    }

    fn pause(&self) -> Result<()> {
        self.record(PlayerCall::Pause)
    }

    fn next_track(&self) -> Result<()> {
        self.record(PlayerCall::Next)
    }

    fn previous_track(&self) -> Result<()> {
        self.record(PlayerCall::Previous)
    }

    fn set_volume(&self, level: u8) -> Result<()> {
        self.record(PlayerCall::SetVolume(level))?;
        self.state.lock().volume = Some(level);
        Ok(())
    }

    fn current_volume(&self) -> Result<Option<u8>> {
        let state = self.state.lock();
        if state.failing {
            return Err(offline("player"));
        }
        Ok(state.volume)
    }
}

/// Returns a canned report, or fails when none is set.
#[derive(Clone, Default)]
pub struct MockWeather {
    report: Option<String>,
    cities: Arc<Mutex<Vec<String>>>,
}

impl MockWeather {
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: Some(report.into()),
            cities: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn cities(&self) -> Vec<String> {
        self.cities.lock().clone()
    }
}

impl WeatherService for MockWeather {
    fn report(&self, city: &str) -> Result<String> {
        self.cities.lock().push(city.to_string());
        self.report.clone().ok_or_else(|| offline("weather"))
    }
}

/// Answers prompts from a queue, then echoes. Clones share state.
#[derive(Clone, Default)]
pub struct MockLanguageModel {
    answers: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, text: impl Into<String>) -> Self {
        self.answers.lock().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.answers.lock().push_back(Err(reason.into()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl LanguageModel for MockLanguageModel {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        match self.answers.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(ServiceError::Http(reason)),
            None => Ok(format!("You asked: {prompt}")),
        }
    }
}
