use crate::command::{DeviceCommand, PowerState};
use crate::error::Result;
use crate::types::Device;

/// Transport to a smart-light service.
pub trait LightBackend: Send + Sync {
    /// Current power state, `None` when the device does not report one.
    fn power_state(&self, device: &Device) -> Result<Option<PowerState>>;

    /// Current brightness in percent, `None` when not reported.
    fn brightness(&self, device: &Device) -> Result<Option<u8>>;

    /// Deliver one command as-is.
    fn send(&self, device: &Device, command: &DeviceCommand) -> Result<()>;
}

impl<B: LightBackend + ?Sized> LightBackend for Box<B> {
    fn power_state(&self, device: &Device) -> Result<Option<PowerState>> {
        (**self).power_state(device)
    }

    fn brightness(&self, device: &Device) -> Result<Option<u8>> {
        (**self).brightness(device)
    }

    fn send(&self, device: &Device, command: &DeviceCommand) -> Result<()> {
        (**self).send(device, command)
    }
}

impl<B: LightBackend + ?Sized> LightBackend for std::sync::Arc<B> {
    fn power_state(&self, device: &Device) -> Result<Option<PowerState>> {
        (**self).power_state(device)
    }

    fn brightness(&self, device: &Device) -> Result<Option<u8>> {
        (**self).brightness(device)
    }

    fn send(&self, device: &Device, command: &DeviceCommand) -> Result<()> {
        (**self).send(device, command)
    }
}
