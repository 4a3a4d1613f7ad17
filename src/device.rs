//! Device types of the simulated home.
//!
//! Eight fixed capability categories. Every task, agent, and collaboration
//! request is keyed by one of these; the engine never invents a ninth.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eight device capability categories in the simulated home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Current time, alarms, timers, stopwatch.
    Clock,
    /// Appointments, reminders, schedule queries.
    Calendar,
    /// General information, recipes, weather.
    SearchEngine,
    /// Shows visual content on the screen.
    TvDisplay,
    /// Food inventory; knows no recipes.
    Fridge,
    /// Light levels and lighting scenes.
    Lighting,
    /// Temperature control.
    Thermostat,
    /// Music playback and volume.
    AudioSystem,
}

impl DeviceType {
    /// All eight device types.
    pub const ALL: [DeviceType; 8] = [
        DeviceType::Clock,
        DeviceType::Calendar,
        DeviceType::SearchEngine,
        DeviceType::TvDisplay,
        DeviceType::Fridge,
        DeviceType::Lighting,
        DeviceType::Thermostat,
        DeviceType::AudioSystem,
    ];

    /// Wire name (`snake_case`), matching the benchmark fixture vocabulary.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceType::Clock => "clock",
            DeviceType::Calendar => "calendar",
            DeviceType::SearchEngine => "search_engine",
            DeviceType::TvDisplay => "tv_display",
            DeviceType::Fridge => "fridge",
            DeviceType::Lighting => "lighting",
            DeviceType::Thermostat => "thermostat",
            DeviceType::AudioSystem => "audio_system",
        }
    }

    /// Human-readable label used in composed responses and log artifacts.
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::Clock => "Clock",
            DeviceType::Calendar => "Calendar",
            DeviceType::SearchEngine => "Search Engine",
            DeviceType::TvDisplay => "TV Display",
            DeviceType::Fridge => "Fridge",
            DeviceType::Lighting => "Lighting",
            DeviceType::Thermostat => "Thermostat",
            DeviceType::AudioSystem => "Audio System",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a raw device name does not map onto the enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device type '{0}'")]
pub struct UnknownDevice(pub String);

impl FromStr for DeviceType {
    type Err = UnknownDevice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Tolerate the spellings the extraction service actually emits:
        // "audio_system", "audio system", "Audio System".
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "clock" => Ok(DeviceType::Clock),
            "calendar" => Ok(DeviceType::Calendar),
            "search_engine" => Ok(DeviceType::SearchEngine),
            "tv_display" | "tv" | "display" => Ok(DeviceType::TvDisplay),
            "fridge" => Ok(DeviceType::Fridge),
            "lighting" | "lights" => Ok(DeviceType::Lighting),
            "thermostat" => Ok(DeviceType::Thermostat),
            "audio_system" | "audio" => Ok(DeviceType::AudioSystem),
            _ => Err(UnknownDevice(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        for device in DeviceType::ALL {
            assert_eq!(device.name().parse::<DeviceType>().unwrap(), device);
        }
    }

    #[test]
    fn parses_loose_spellings() {
        assert_eq!("Audio System".parse::<DeviceType>().unwrap(), DeviceType::AudioSystem);
        assert_eq!("tv".parse::<DeviceType>().unwrap(), DeviceType::TvDisplay);
        assert_eq!("lights".parse::<DeviceType>().unwrap(), DeviceType::Lighting);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "vacuum_robot".parse::<DeviceType>().unwrap_err();
        assert_eq!(err, UnknownDevice("vacuum_robot".to_string()));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&DeviceType::SearchEngine).unwrap();
        assert_eq!(json, "\"search_engine\"");
    }
}
