use device_registry::DeviceError;
use intent_parser::{ClassifierError, ParseError};
use service_clients::ServiceError;
use thiserror::Error;
use voice_local::VoiceError;

/// Failure inside one turn. Never ends the session; the turn loop logs it
/// and apologises.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Voice(#[from] VoiceError),
}

impl TurnError {
    /// Short name of the collaborator that failed, for metrics.
    pub fn source_name(&self) -> &'static str {
        match self {
            TurnError::Parse(_) => "parser",
            TurnError::Classifier(_) => "classifier",
            TurnError::Device(_) => "lights",
            TurnError::Service(_) => "service",
            TurnError::Voice(_) => "voice",
        }
    }
}

pub type Result<T, E = TurnError> = core::result::Result<T, E>;
