//! Music-domain sub-classification: action, then target, then the free-text
//! query, mapped onto a player directive.

use crate::bundle::TextClassifier;
use crate::command::{Domain, ParsedCommand};
use crate::entities::{join_spans, EntityExtractor};
use crate::error::Result;
use crate::lexicon;
use crate::registry::ModelRegistry;
use crate::IntentConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Targets a play request can search by.
pub const PLAY_TARGETS: [&str; 5] = ["song", "artist", "genre", "album", "playlist"];
/// Relative volume change in percent.
pub const VOLUME_STEP: u8 = 10;

/// Output of [`MusicClassifier::classify_command`]. Later fields are only
/// filled when the action calls for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicCommand {
    pub action: Option<String>,
    pub target: Option<String>,
    pub parameter: Option<String>,
}

impl MusicCommand {
    pub fn to_parsed(&self) -> Option<ParsedCommand> {
        let action = self.action.as_ref()?;
        let mut cmd = ParsedCommand::new(Domain::Music, action.clone());
        cmd.target = self.target.clone();
        cmd.parameter = self.parameter.clone();
        Some(cmd)
    }
}

/// Action classifier, target classifier and query extractor.
#[derive(Clone)]
pub struct MusicClassifier {
    action: Arc<dyn TextClassifier>,
    target: Arc<dyn TextClassifier>,
    entities: Arc<dyn EntityExtractor>,
}

impl MusicClassifier {
    pub fn new(
        action: Arc<dyn TextClassifier>,
        target: Arc<dyn TextClassifier>,
        entities: Arc<dyn EntityExtractor>,
    ) -> Self {
        Self {
            action,
            target,
            entities,
        }
    }

    pub fn from_registry(registry: &ModelRegistry, config: &IntentConfig) -> Result<Self> {
        Ok(Self::new(
            registry.classifier(&config.music_action_model)?,
            registry.classifier(&config.music_target_model)?,
            registry.extractor(&config.music_entity_model)?,
        ))
    }

    /// Classify the action; for `play`/`volume` also the target; for `play`
    /// also extract the query from the recognised entity spans.
    pub fn classify_command(&self, utterance: &str) -> Result<MusicCommand> {
        let action = self.action.classify(utterance)?.label;
        info!("Predicted action: {}", action);

        let mut command = MusicCommand {
            action: Some(action.clone()),
            ..Default::default()
        };

        if matches!(action.as_str(), "play" | "volume") {
            let mut target = self.target.classify(utterance)?.label;
            if action == "volume" && target != "up" && target != "down" {
                // A spoken level beats whatever label the classifier picked.
                if let Some(level) = spoken_number(utterance) {
                    target = level;
                }
            }
            info!("Predicted target: {}", target);
            command.target = Some(target);
        }

        if action == "play" {
            let spans = self.entities.extract(utterance)?;
            let parameter = join_spans(&spans);
            info!("Extracted parameter: {}", parameter);
            command.parameter = Some(parameter);
        }

        Ok(command)
    }
}

/// The first run of number tokens in the utterance, read as one value.
/// A run that is not a well-formed number yields `None`.
fn spoken_number(utterance: &str) -> Option<String> {
    let is_number = |w: &str| lexicon::is_integer_literal(w) || lexicon::is_number_word(w);
    let tokens = lexicon::tokenize(utterance);
    let start = tokens.iter().position(|w| is_number(w.as_str()))?;

    let mut end = start;
    while end < tokens.len() {
        let joins = tokens[end] == "and"
            && tokens
                .get(end + 1)
                .is_some_and(|w| is_number(w.as_str()));
        if !(is_number(&tokens[end]) || joins) {
            break;
        }
        end += 1;
    }

    let level = lexicon::phrase_to_number(&tokens[start..end]);
    if level.is_none() {
        warn!("Could not read a volume level from '{}'", tokens[start..end].join(" "));
    }
    level.map(|n| n.to_string())
}

/// A requested volume change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeChange {
    Absolute(u8),
    Up,
    Down,
    /// A number outside 0..=100; rejected.
    OutOfRange(i64),
    /// Neither a number nor a direction.
    Invalid(String),
}

impl VolumeChange {
    pub fn parse(target: &str) -> Self {
        let target = target.trim();
        if let Ok(level) = target.parse::<i64>() {
            return match u8::try_from(level) {
                Ok(l) if l <= 100 => VolumeChange::Absolute(l),
                _ => VolumeChange::OutOfRange(level),
            };
        }
        match target.to_lowercase().as_str() {
            "up" => VolumeChange::Up,
            "down" => VolumeChange::Down,
            _ => VolumeChange::Invalid(target.to_string()),
        }
    }

    /// New volume level, or `None` when the volume must stay as it is.
    /// Relative changes need the current level.
    pub fn resolve(&self, current: Option<u8>) -> Option<u8> {
        match self {
            VolumeChange::Absolute(level) => Some(*level),
            VolumeChange::Up => current.map(|v| v.saturating_add(VOLUME_STEP).min(100)),
            VolumeChange::Down => current.map(|v| v.saturating_sub(VOLUME_STEP)),
            VolumeChange::OutOfRange(level) => {
                warn!("Volume level must be between 0 and 100, got {}", level);
                None
            }
            VolumeChange::Invalid(word) => {
                warn!("Invalid volume direction '{}'", word);
                None
            }
        }
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, VolumeChange::Up | VolumeChange::Down)
    }
}

/// What the music player should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "directive")]
pub enum MusicDirective {
    Play { query: String },
    Pause,
    Next,
    Previous,
    Volume { change: VolumeChange },
    Ignore { reason: String },
}

/// Search query for a play request: bare parameter for songs,
/// `target:parameter` for the other play targets.
pub fn search_query(target: &str, parameter: &str) -> Option<String> {
    if !PLAY_TARGETS.contains(&target) {
        return None;
    }
    Some(if target == "song" {
        parameter.to_string()
    } else {
        format!("{target}:{parameter}")
    })
}

/// Map a classified command onto a player directive.
pub fn plan_music_command(command: &MusicCommand) -> MusicDirective {
    let action = command.action.as_deref().unwrap_or_default();
    let target = command.target.as_deref().unwrap_or_default();
    match action {
        "play" => {
            let parameter = command.parameter.as_deref().unwrap_or_default().trim();
            if parameter.is_empty() {
                return MusicDirective::Ignore {
                    reason: "no search query specified".into(),
                };
            }
            match search_query(target, parameter) {
                Some(query) => MusicDirective::Play { query },
                None => MusicDirective::Ignore {
                    reason: format!("unsupported target for action 'play': {target}"),
                },
            }
        }
        "stop" | "pause" => MusicDirective::Pause,
        "skip" => MusicDirective::Next,
        "rewind" => MusicDirective::Previous,
        "volume" => MusicDirective::Volume {
            change: VolumeChange::parse(target),
        },
        other => MusicDirective::Ignore {
            reason: format!("action '{other}' is not recognized"),
        },
    }
}
