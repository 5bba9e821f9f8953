//! Intent Parser for Voice Commands
//!
//! Turns a transcribed utterance into something a handler can execute: a
//! salutation/intent classification cascade, a rule-based parser for
//! smart-light phrases and a classifier-driven parser for music requests.

mod error;
pub use error::{ClassifierError, ParseError, Result};

pub mod bundle;
pub use bundle::{ClassificationResult, KeywordClassifier, TextClassifier, TfidfLinearBundle};

pub mod entities;
pub use entities::{
    EntityExtractor, EntitySpan, GazetteerExtractor, TrailingPhraseConfig, TrailingPhraseExtractor,
};

pub mod lexicon;

mod registry;
pub use registry::{load_bundle, BundleKind, BundleSpec, LoadedBundle, ModelRegistry};

mod command;
pub use command::{AttributeValue, Domain, ParsedCommand};

mod cascade;
pub use cascade::{
    TurnClassification, UtteranceCascade, FAREWELL, SALUTATION_EXIT, SALUTATION_GENERAL,
};

pub mod lighting;
pub use lighting::{
    parse_device_command, plan_device_commands, AttributeToken, DeviceCommandRequest, LightingPlan,
};

pub mod music;
pub use music::{
    plan_music_command, search_query, MusicClassifier, MusicCommand, MusicDirective, VolumeChange,
};

#[cfg(feature = "mock")]
pub mod mock;

use serde::{Deserialize, Serialize};

/// Names of the registry bundles each pipeline stage uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    pub salutation_model: String,
    pub intent_model: String,
    pub music_action_model: String,
    pub music_target_model: String,
    pub music_entity_model: String,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            salutation_model: "salutation".to_string(),
            intent_model: "intent".to_string(),
            music_action_model: "music_action".to_string(),
            music_target_model: "music_target".to_string(),
            music_entity_model: "music_entities".to_string(),
        }
    }
}

impl IntentConfig {
    /// Every bundle name referenced, cascade stages first.
    pub fn model_names(&self) -> Vec<String> {
        vec![
            self.salutation_model.clone(),
            self.intent_model.clone(),
            self.music_action_model.clone(),
            self.music_target_model.clone(),
            self.music_entity_model.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: IntentConfig = serde_json::from_str(r#"{"intent_model": "intent_svc"}"#).unwrap();
        assert_eq!(cfg.intent_model, "intent_svc");
        assert_eq!(cfg.salutation_model, "salutation");
        assert_eq!(cfg.model_names().len(), 5);
    }
}
