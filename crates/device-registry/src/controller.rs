use crate::backend::LightBackend;
use crate::command::{DeviceCommand, PowerState};
use crate::error::Result;
use crate::types::Device;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Sends commands through a [`LightBackend`], powering devices on first
/// where needed.
///
/// Calls are serialized so the power check and the command it guards are
/// never interleaved with another caller's commands.
pub struct DeviceController<B> {
    backend: B,
    gate: Mutex<()>,
}

impl<B: LightBackend> DeviceController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            gate: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current brightness of `device`, if the service reports one.
    pub fn brightness(&self, device: &Device) -> Result<Option<u8>> {
        self.backend.brightness(device)
    }

    /// Send `command`, preceded by a turn-on when the device is not known to
    /// be on. Returns the number of commands sent.
    pub fn execute(&self, device: &Device, command: &DeviceCommand) -> Result<usize> {
        let _guard = self.gate.lock();
        let mut sent = 0;

        if command.requires_power() {
            let state = match self.backend.power_state(device) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Power state query failed for {}: {}", device.name, e);
                    None
                }
            };
            if state != Some(PowerState::On) {
                debug!("{} is not on, powering up before {}", device.name, command.name());
                self.backend
                    .send(device, &DeviceCommand::Turn(PowerState::On))?;
                sent += 1;
            }
        }

        self.backend.send(device, command)?;
        sent += 1;
        info!("Sent {} to {}", command, device.name);
        Ok(sent)
    }

    /// Execute commands in order, stopping at the first failure.
    pub fn execute_all(&self, device: &Device, commands: &[DeviceCommand]) -> Result<usize> {
        let mut sent = 0;
        for command in commands {
            sent += self.execute(device, command)?;
        }
        Ok(sent)
    }
}
