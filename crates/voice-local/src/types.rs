use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Phrases that wake the assistant from standby. Empty means always awake.
    #[serde(default = "default_wake_words")]
    pub wake_words: Vec<String>,
    /// Name used to prefix spoken output on text backends.
    #[serde(default = "default_voice_name")]
    pub voice_name: String,
}

fn default_wake_words() -> Vec<String> {
    vec!["atom".to_string(), "hey atom".to_string()]
}

fn default_voice_name() -> String {
    "Atom".to_string()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            wake_words: default_wake_words(),
            voice_name: default_voice_name(),
        }
    }
}

/// One transcribed user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub ts: Option<OffsetDateTime>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ts: Some(OffsetDateTime::now_utc()),
        }
    }

    /// Builds an utterance from transcribed text; blank text is silence.
    pub fn from_transcript(text: &str) -> Option<Self> {
        let text = text.trim();
        (!text.is_empty()).then(|| Self::new(text))
    }
}
