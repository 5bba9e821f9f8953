//! Client for the Govee-style developer light API.

use crate::backend::LightBackend;
use crate::command::{DeviceCommand, PowerState};
use crate::error::{DeviceError, Result};
use crate::types::Device;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://developer-api.govee.com/v1";
const API_KEY_HEADER: &str = "Govee-API-Key";

pub struct HttpLightBackend {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpLightBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn device_state(&self, device: &Device) -> Result<Value> {
        let resp = self
            .client
            .get(format!("{}/devices/state", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("device", &device.identifier), ("model", &device.model)])
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DeviceError::Status {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }
        Ok(resp.json()?)
    }
}

/// First value of `key` among `data.properties[]`.
fn state_property<'a>(state: &'a Value, key: &str) -> Option<&'a Value> {
    state
        .get("data")?
        .get("properties")?
        .as_array()?
        .iter()
        .find_map(|p| p.get(key).filter(|v| !v.is_null()))
}

impl LightBackend for HttpLightBackend {
    fn power_state(&self, device: &Device) -> Result<Option<PowerState>> {
        let state = self.device_state(device)?;
        Ok(state_property(&state, "powerState")
            .and_then(Value::as_str)
            .and_then(PowerState::parse))
    }

    fn brightness(&self, device: &Device) -> Result<Option<u8>> {
        let state = self.device_state(device)?;
        Ok(state_property(&state, "brightness")
            .and_then(Value::as_u64)
            .map(|b| b.min(100) as u8))
    }

    fn send(&self, device: &Device, command: &DeviceCommand) -> Result<()> {
        #[derive(Serialize)]
        struct Cmd<'a> {
            name: &'a str,
            value: Value,
        }
        #[derive(Serialize)]
        struct ControlReq<'a> {
            device: &'a str,
            model: &'a str,
            cmd: Cmd<'a>,
        }

        let body = ControlReq {
            device: &device.identifier,
            model: &device.model,
            cmd: Cmd {
                name: command.name(),
                value: command.value(),
            },
        };
        let resp = self
            .client
            .put(format!("{}/devices/control", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()?;
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        if !status.is_success() {
            return Err(DeviceError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        debug!("Control response for {}: {}", device.name, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_property_lookup() {
        let state = json!({
            "data": {"properties": [
                {"online": true},
                {"powerState": "off"},
                {"brightness": 42}
            ]}
        });
        assert_eq!(state_property(&state, "powerState"), Some(&json!("off")));
        assert_eq!(state_property(&state, "brightness"), Some(&json!(42)));
        assert!(state_property(&state, "color").is_none());
        assert!(state_property(&json!({}), "brightness").is_none());
    }
}
