use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("voice I/O error: {0}")]
    Io(String),
    /// The input source has no more utterances.
    #[error("input closed")]
    Closed,
    #[error("unsupported voice backend: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for VoiceError {
    fn from(e: std::io::Error) -> Self {
        VoiceError::Io(e.to_string())
    }
}

pub type Result<T, E = VoiceError> = core::result::Result<T, E>;
