use crate::backend::LightBackend;
use crate::command::{DeviceCommand, PowerState};
use crate::error::{DeviceError, Result};
use crate::types::Device;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLightState {
    pub power: PowerState,
    pub brightness: u8,
}

#[derive(Default)]
struct Inner {
    states: HashMap<String, MockLightState>,
    sent: Vec<(String, DeviceCommand)>,
    failing: bool,
}

/// In-memory light service. Clones share state, so a test can keep a handle
/// while the controller owns another.
#[derive(Clone, Default)]
pub struct MockLightBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockLightBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(self, device: &Device, power: PowerState, brightness: u8) -> Self {
        self.inner
            .lock()
            .states
            .insert(device.name.clone(), MockLightState { power, brightness });
        self
    }

    /// Make every call fail with an HTTP error.
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().failing = failing;
    }

    pub fn state(&self, device_name: &str) -> Option<MockLightState> {
        self.inner.lock().states.get(device_name).copied()
    }

    /// Commands received so far as `(device name, command)`.
    pub fn sent(&self) -> Vec<(String, DeviceCommand)> {
        self.inner.lock().sent.clone()
    }

    fn check(&self, inner: &Inner) -> Result<()> {
        if inner.failing {
            return Err(DeviceError::Http("mock backend offline".into()));
        }
        Ok(())
    }
}

impl LightBackend for MockLightBackend {
    fn power_state(&self, device: &Device) -> Result<Option<PowerState>> {
        let inner = self.inner.lock();
        self.check(&inner)?;
        Ok(inner.states.get(&device.name).map(|s| s.power))
    }

    fn brightness(&self, device: &Device) -> Result<Option<u8>> {
        let inner = self.inner.lock();
        self.check(&inner)?;
        Ok(inner.states.get(&device.name).map(|s| s.brightness))
    }

    fn send(&self, device: &Device, command: &DeviceCommand) -> Result<()> {
        let mut inner = self.inner.lock();
        self.check(&inner)?;
        inner.sent.push((device.name.clone(), *command));
        let state = inner
            .states
            .entry(device.name.clone())
            .or_insert(MockLightState {
                power: PowerState::Off,
                brightness: 100,
            });
        match command {
            DeviceCommand::Turn(power) => state.power = *power,
            DeviceCommand::Brightness(level) => state.brightness = *level,
            DeviceCommand::Color(_) => {}
        }
        Ok(())
    }
}
