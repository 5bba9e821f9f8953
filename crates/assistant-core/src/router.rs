//! Dispatch from an intent label to its domain handler.

use crate::assistant::Assistant;
use crate::error::TurnError;
use crate::phrases;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

/// Intent labels the router knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Music,
    IoT,
    Weather,
    News,
    ScientificResearch,
    Assistant,
    Lexicon,
    Blank,
    Exit,
}

impl Intent {
    pub const ALL: [Intent; 9] = [
        Intent::Music,
        Intent::IoT,
        Intent::Weather,
        Intent::News,
        Intent::ScientificResearch,
        Intent::Assistant,
        Intent::Lexicon,
        Intent::Blank,
        Intent::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Intent::Music => "Music",
            Intent::IoT => "IoT",
            Intent::Weather => "Weather",
            Intent::News => "News",
            Intent::ScientificResearch => "ScientificResearch",
            Intent::Assistant => "Assistant",
            Intent::Lexicon => "Lexicon",
            Intent::Blank => "Blank",
            Intent::Exit => "Exit",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|i| i.label() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Continue,
    Exit,
}

impl Assistant {
    /// Run the handler for `label`. Only `Exit` (or an exit during a
    /// research conversation) ends the conversation; every handler failure
    /// is logged and apologised for.
    pub fn route(&mut self, label: &str, utterance: &str) -> RouteOutcome {
        let Ok(intent) = label.parse::<Intent>() else {
            info!("Unknown intent classification: {} for utterance: {}", label, utterance);
            self.say(phrases::UNKNOWN_REQUEST);
            return RouteOutcome::Continue;
        };
        if intent == Intent::Exit {
            info!("Exit intent for utterance: {}", utterance);
            return RouteOutcome::Exit;
        }

        self.say(phrases::HAPPILY);
        self.say(&phrases::routing(intent.label()));
        info!("Routing to {} functionality for utterance: {}", intent, utterance);

        match intent {
            Intent::Music => {
                if let Err(e) = self.handle_music(utterance) {
                    self.recover(&e, utterance, phrases::MUSIC_FAILED);
                }
            }
            Intent::IoT => match self.handle_lighting(utterance) {
                Ok(confirmation) => self.say(&confirmation),
                Err(e) => {
                    let apology = match &e {
                        TurnError::Parse(_) => phrases::UNKNOWN_REQUEST,
                        _ => phrases::LIGHTS_FAILED,
                    };
                    self.recover(&e, utterance, apology);
                }
            },
            Intent::Weather => match self.handle_weather() {
                Ok(report) => self.say(&report),
                Err(e) => {
                    let apology = phrases::weather_failed(&self.settings.city);
                    self.recover(&e, utterance, &apology);
                }
            },
            Intent::News | Intent::ScientificResearch => return self.research(utterance),
            Intent::Blank => info!("Detected 'Blank' intent."),
            Intent::Assistant | Intent::Lexicon => {
                info!("Intent {} requested but not yet implemented", intent);
                self.say(&phrases::unsupported(intent.label()));
            }
            Intent::Exit => return RouteOutcome::Exit,
        }
        RouteOutcome::Continue
    }

    pub(crate) fn recover(&mut self, err: &TurnError, utterance: &str, apology: &str) {
        error!("Error handling '{}': {}", utterance, err);
        self.metrics.record_failure(err.source_name());
        self.say(apology);
    }
}
