use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("http error: {0}")]
    Http(String),
    #[error("device API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("device not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
}

pub type Result<T, E = DeviceError> = core::result::Result<T, E>;

#[cfg(feature = "http")]
impl From<reqwest::Error> for DeviceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DeviceError::Decode(e.to_string())
        } else {
            DeviceError::Http(e.to_string())
        }
    }
}
