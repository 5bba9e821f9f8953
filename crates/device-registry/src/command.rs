use crate::palette::Rgb;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "on" => Some(PowerState::On),
            "off" => Some(PowerState::Off),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One control command for a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "lowercase")]
pub enum DeviceCommand {
    Turn(PowerState),
    Brightness(u8),
    Color(Rgb),
}

impl DeviceCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceCommand::Turn(_) => "turn",
            DeviceCommand::Brightness(_) => "brightness",
            DeviceCommand::Color(_) => "color",
        }
    }

    pub fn value(&self) -> Value {
        match self {
            DeviceCommand::Turn(state) => json!(state.as_str()),
            DeviceCommand::Brightness(level) => json!(level),
            DeviceCommand::Color(rgb) => json!({ "r": rgb.r, "g": rgb.g, "b": rgb.b }),
        }
    }

    /// Whether the device has to be powered before this command takes effect.
    pub fn requires_power(&self) -> bool {
        !matches!(self, DeviceCommand::Turn(_))
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let cmd = DeviceCommand::Color(Rgb::new(0, 128, 128));
        assert_eq!(
            serde_json::to_value(cmd).unwrap(),
            json!({"name": "color", "value": {"r": 0, "g": 128, "b": 128}})
        );
        assert_eq!(
            serde_json::to_value(DeviceCommand::Turn(PowerState::Off)).unwrap(),
            json!({"name": "turn", "value": "off"})
        );
        assert_eq!(DeviceCommand::Brightness(40).value(), json!(40));
    }
}
