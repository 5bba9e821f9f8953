//! Two-stage utterance classification: salutation gate, then intent.

use crate::bundle::TextClassifier;
use crate::error::Result;
use crate::registry::ModelRegistry;
use crate::IntentConfig;
use std::sync::Arc;
use tracing::info;

/// Salutation label that lets an utterance through to intent classification.
pub const SALUTATION_GENERAL: &str = "General";
/// Salutation label that ends the conversation.
pub const SALUTATION_EXIT: &str = "Exit";
/// Spoken when the salutation stage detects an exit.
pub const FAREWELL: &str = "Understood. I'll go into standby until you request me.";

/// Outcome of classifying one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnClassification {
    /// An actionable command with its intent label.
    Continue(String),
    /// The user asked to stop.
    Exit,
    /// Acknowledged but not actionable (small talk, greetings).
    Blank,
}

/// Salutation classifier followed by the intent classifier.
#[derive(Clone)]
pub struct UtteranceCascade {
    salutation: Arc<dyn TextClassifier>,
    intent: Arc<dyn TextClassifier>,
}

impl UtteranceCascade {
    pub fn new(salutation: Arc<dyn TextClassifier>, intent: Arc<dyn TextClassifier>) -> Self {
        Self { salutation, intent }
    }

    /// Resolve both stages from the registry. Fails if either bundle cannot be loaded.
    pub fn from_registry(registry: &ModelRegistry, config: &IntentConfig) -> Result<Self> {
        Ok(Self::new(
            registry.classifier(&config.salutation_model)?,
            registry.classifier(&config.intent_model)?,
        ))
    }

    /// Classify `utterance`. The intent classifier only runs for utterances
    /// the salutation stage labels [`SALUTATION_GENERAL`].
    pub fn classify_turn(&self, utterance: &str) -> Result<TurnClassification> {
        let salutation = self.salutation.classify(utterance)?;
        info!("Salutation detected: {}", salutation.label);

        match salutation.label.as_str() {
            SALUTATION_GENERAL => {
                let intent = self.intent.classify(utterance)?;
                info!("Intent detected: {}", intent.label);
                Ok(TurnClassification::Continue(intent.label))
            }
            SALUTATION_EXIT => Ok(TurnClassification::Exit),
            other => {
                info!("Non-general salutation detected: {}", other);
                Ok(TurnClassification::Blank)
            }
        }
    }
}
