use serde::{Deserialize, Serialize};
use std::fmt;

/// A controllable light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Human name, matched against spoken phrases
    pub name: String,
    /// Vendor device identifier (MAC-like)
    pub identifier: String,
    /// Vendor model code
    pub model: String,
}

impl Device {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Model: {}) (id: {})",
            self.name, self.model, self.identifier
        )
    }
}
