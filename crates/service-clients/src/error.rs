use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("http error: {0}")]
    Http(String),
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    /// A credential or endpoint is missing.
    #[error("service not configured: {0}")]
    NotConfigured(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T, E = ServiceError> = core::result::Result<T, E>;

#[cfg(feature = "http")]
impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else {
            ServiceError::Http(e.to_string())
        }
    }
}

/// Turn a non-2xx response into [`ServiceError::Status`].
#[cfg(feature = "http")]
pub(crate) fn check_status(
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(ServiceError::Status {
        status: status.as_u16(),
        body: resp.text().unwrap_or_default(),
    })
}
