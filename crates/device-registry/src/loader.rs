use crate::types::Device;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Devices in insertion order.
///
/// Partial-name lookup returns the first inserted match, so the order of the
/// backing file is significant.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DeviceRegistry {
    #[serde(default)]
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device. A device with the same (case-insensitive) name is
    /// replaced in place and keeps its position.
    pub fn insert(&mut self, device: Device) {
        let key = device.name.to_lowercase();
        match self
            .devices
            .iter_mut()
            .find(|d| d.name.to_lowercase() == key)
        {
            Some(slot) => *slot = device,
            None => self.devices.push(device),
        }
    }

    /// First device whose lowercase name contains `fragment`.
    pub fn find_by_partial_name(&self, fragment: &str) -> Option<&Device> {
        let fragment = fragment.to_lowercase();
        self.devices
            .iter()
            .find(|d| d.name.to_lowercase().contains(&fragment))
    }

    pub fn get(&self, name: &str) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// The lights of the reference installation.
    pub fn default_installation() -> Self {
        let mut reg = Self::new();
        for (name, model, id) in [
            ("Mirror", "H6144", "91:C7:7C:A6:B0:5D:03:FA"),
            ("Second Left Restroom", "H6003", "71:69:7c:a6:b0:a0:3f:cf"),
            ("Second Right Restroom", "H6003", "bd:45:7c:a6:b0:c0:f7:60"),
            ("Right Restroom", "H6003", "60:2f:7c:a6:b0:a0:2c:57"),
            ("Left Restroom", "H6003", "ee:7d:7c:a6:b0:a6:a4:83"),
            ("Right Side Lamp", "H6003", "53:3e:7c:a6:b0:17:84:96"),
            ("Left Side Lamp", "H6003", "5b:f6:7c:a6:b0:1a:a2:4d"),
            ("Backlight", "H6199", "FB:2A:D1:33:36:32:3A:44"),
            ("Underglow", "H614A", "39:4D:A4:C1:38:9A:79:96"),
        ] {
            reg.insert(Device::new(name, model, id));
        }
        reg
    }
}

impl FromIterator<Device> for DeviceRegistry {
    fn from_iter<I: IntoIterator<Item = Device>>(iter: I) -> Self {
        let mut reg = Self::new();
        for device in iter {
            reg.insert(device);
        }
        reg
    }
}

/// Load a registry from YAML of the form `devices: [{name, identifier, model}, ...]`.
pub fn load_registry_file(path: impl AsRef<Path>) -> anyhow::Result<DeviceRegistry> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading devices: {}", path.display()))?;
    let file: DeviceRegistry =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing yaml: {}", path.display()))?;
    // Re-insert so duplicate names collapse the same way as programmatic inserts.
    Ok(file.devices.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_lookup_prefers_first_inserted() {
        let reg = DeviceRegistry::default_installation();
        let device = reg.find_by_partial_name("restroom").unwrap();
        assert_eq!(device.name, "Second Left Restroom");

        let device = reg.find_by_partial_name("right side lamp").unwrap();
        assert_eq!(device.name, "Right Side Lamp");
        assert!(reg.find_by_partial_name("garage").is_none());
    }

    #[test]
    fn test_lookup_order_follows_insertion() {
        let reg: DeviceRegistry = [
            Device::new("Desk Lamp", "H6003", "aa"),
            Device::new("Floor Lamp", "H6003", "bb"),
        ]
        .into_iter()
        .collect();
        assert_eq!(reg.find_by_partial_name("lamp").unwrap().identifier, "aa");

        let reg: DeviceRegistry = [
            Device::new("Floor Lamp", "H6003", "bb"),
            Device::new("Desk Lamp", "H6003", "aa"),
        ]
        .into_iter()
        .collect();
        assert_eq!(reg.find_by_partial_name("lamp").unwrap().identifier, "bb");
    }

    #[test]
    fn test_insert_replaces_same_name_in_place() {
        let mut reg = DeviceRegistry::default_installation();
        reg.insert(Device::new("mirror", "H6000", "new-id"));
        assert_eq!(reg.len(), 9);
        let first = reg.iter().next().unwrap();
        assert_eq!(first.identifier, "new-id");
    }

    #[test]
    fn test_load_registry_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "devices:\n  - name: Porch\n    identifier: 'AA:BB'\n    model: H6003\n  - name: Hall\n    identifier: 'CC:DD'\n    model: H6144"
        )
        .unwrap();
        let reg = load_registry_file(file.path()).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("hall").unwrap().model, "H6144");
    }

    #[test]
    fn test_load_registry_file_reports_path() {
        let err = load_registry_file("/nonexistent/devices.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/devices.yaml"));
    }
}
