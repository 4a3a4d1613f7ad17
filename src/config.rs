//! Engine configuration and the simulated-home device profile.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::device::DeviceType;

/// Default model served by the local Ollama host.
pub const DEFAULT_MODEL: &str = "gemma2";

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default per-call deadline for the text service.
pub const DEFAULT_DEADLINE_SECS: u64 = 60;

/// Engine-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Model identifier passed to the text service.
    pub model: String,
    /// Base URL of the model host.
    pub base_url: String,
    /// Per-call deadline; an exceeded deadline fails the affected task,
    /// never the run.
    #[serde(with = "duration_secs")]
    pub deadline: Duration,
    /// Verbose run logging.
    pub verbose: bool,
    /// Location the simulated home reports for weather-style queries.
    pub default_location: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            verbose: false,
            default_location: "Hamburg, Germany".to_string(),
        }
    }
}

/// Which device types are installed in the simulated home.
///
/// The agent registry is built from this profile; a collaboration request
/// targeting an uninstalled device type fails with `NoSuchCollaborator`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeProfile {
    /// Installed device types.
    pub devices: Vec<DeviceType>,
}

impl Default for HomeProfile {
    fn default() -> Self {
        Self {
            devices: DeviceType::ALL.to_vec(),
        }
    }
}

impl HomeProfile {
    /// A profile with an explicit device set.
    pub fn with_devices(devices: Vec<DeviceType>) -> Self {
        Self { devices }
    }

    /// Load a profile from YAML, e.g.
    ///
    /// ```yaml
    /// devices:
    ///   - clock
    ///   - lighting
    ///   - audio_system
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Whether a device type is installed.
    pub fn contains(&self, device: DeviceType) -> bool {
        self.devices.contains(&device)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_installs_all_devices() {
        let profile = HomeProfile::default();
        for device in DeviceType::ALL {
            assert!(profile.contains(device));
        }
    }

    #[test]
    fn profile_loads_from_yaml() {
        let profile = HomeProfile::from_yaml("devices:\n  - clock\n  - audio_system\n").unwrap();
        assert!(profile.contains(DeviceType::Clock));
        assert!(profile.contains(DeviceType::AudioSystem));
        assert!(!profile.contains(DeviceType::Fridge));
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.deadline, config.deadline);
        assert_eq!(back.model, config.model);
    }
}
