use thiserror::Error;

pub type Result<T, E = ClassifierError> = core::result::Result<T, E>;

/// Failures while loading or applying a classifier bundle.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A required bundle could not be loaded. Fatal at startup.
    #[error("model bundle '{name}' unavailable: {reason}")]
    ModelUnavailable { name: String, reason: String },
    #[error("bundle '{name}' is a {actual}, expected a {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("no bundle named '{0}' is configured")]
    UnknownBundle(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("invalid bundle format: {0}")]
    Format(String),
    #[error("model has no classes")]
    EmptyModel,
    #[error("shape mismatch: {0}")]
    Shape(String),
}

/// A lighting phrase that could not be turned into device commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unable to parse device name or attribute from '{0}'")]
    Unparseable(String),
    #[error("device matching '{0}' not found")]
    DeviceNotFound(String),
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),
    #[error("unable to fetch current brightness for device '{0}'")]
    BrightnessUnavailable(String),
    #[error("device backend error: {0}")]
    Backend(String),
}
