//! device-registry: smart lights known to the assistant and the backends that drive them

mod error;
pub use error::{DeviceError, Result};

mod types;
pub use types::Device;

mod loader;
pub use loader::{load_registry_file, DeviceRegistry};

mod palette;
pub use palette::{ColorPalette, Rgb};

mod command;
pub use command::{DeviceCommand, PowerState};

mod backend;
pub use backend::LightBackend;

mod controller;
pub use controller::DeviceController;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{HttpLightBackend, DEFAULT_BASE_URL};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockLightBackend, MockLightState};
