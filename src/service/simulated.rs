//! Deterministic offline backend.
//!
//! Stands in for the model host: naive intent splitting, canned per-device
//! data, template phrasing. Every call is a pure function of its arguments,
//! which is what makes the engine's routing and the benchmark runner
//! reproducible without a model.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::device::DeviceType;
use crate::error::ServiceError;
use crate::service::TextService;

/// The simulated fridge's standing inventory.
pub const FRIDGE_INVENTORY: &str = "chicken 500g, rice 1kg, mixed vegetables, eggs, milk";

static TIME_MODIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(for \d+ (?:minutes?|hours?)|\d+-minute|at \d{1,2}(?::\d{2})?\s?(?:am|pm)|until \d{1,2}\s?(?:am|pm)|gradually|immediately|tonight|tomorrow|today)\b",
    )
    .expect("time modifier pattern")
});

static LOCATION_MODIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bin the [a-z ]*?(?:room|bedroom|kitchen|office|hallway)\b")
        .expect("location modifier pattern")
});

static NEGATION_MODIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(no [a-z]+|don't [a-z]+|without [a-z]+)\b").expect("negation pattern"));

static MANNER_MODIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(very [a-z]+|quietly|brightly|warmly|dim|bright|loud|quiet|relaxing|cozy)\b")
        .expect("manner pattern")
});

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+)[\s-]?(minutes?|hours?)\b").expect("duration pattern")
});

/// Deterministic text service with no external dependencies.
#[derive(Debug, Clone)]
pub struct SimulatedCompletion {
    location: String,
}

impl Default for SimulatedCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedCompletion {
    pub fn new() -> Self {
        Self {
            location: "Hamburg, Germany".to_string(),
        }
    }

    /// Override the location reported for weather-style queries.
    pub fn with_location(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    fn split_units(user_text: &str) -> Vec<String> {
        user_text
            .split(" and ")
            .flat_map(|part| part.split(" then "))
            .map(|part| part.trim().trim_end_matches(['.', '!', '?']).trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    }

    fn modifiers_of(unit: &str) -> serde_json::Map<String, serde_json::Value> {
        let mut modifiers = serde_json::Map::new();
        if let Some(m) = TIME_MODIFIER.find(unit) {
            modifiers.insert("time".to_string(), json!(m.as_str()));
        }
        if let Some(m) = LOCATION_MODIFIER.find(unit) {
            modifiers.insert("location".to_string(), json!(m.as_str()));
        }
        if let Some(m) = NEGATION_MODIFIER.find(unit) {
            modifiers.insert("negation".to_string(), json!(m.as_str()));
        }
        if let Some(m) = MANNER_MODIFIER.find(unit) {
            modifiers.insert("manner".to_string(), json!(m.as_str()));
        }
        modifiers
    }

    fn duration_in(text: &str) -> Option<String> {
        DURATION
            .captures(text)
            .map(|c| format!("{} {}", &c[1], c[2].to_lowercase()))
    }
}

impl TextService for SimulatedCompletion {
    fn extract_intents(&self, user_text: &str, _prompt: &str) -> Result<String, ServiceError> {
        let intents: Vec<serde_json::Value> = Self::split_units(user_text)
            .into_iter()
            .map(|unit| {
                let modifiers = Self::modifiers_of(&unit);
                json!({"description": unit, "device": null, "modifiers": modifiers})
            })
            .collect();
        Ok(json!({ "intents": intents }).to_string())
    }

    fn device_action(
        &self,
        device: DeviceType,
        action: &str,
        _prompt: &str,
    ) -> Result<String, ServiceError> {
        let lower = action.to_lowercase();
        let text = match device {
            DeviceType::Clock => {
                if lower.contains("timer") {
                    match Self::duration_in(&lower) {
                        Some(d) => format!("Timer set for {}.", d),
                        None => "Timer started.".to_string(),
                    }
                } else if lower.contains("alarm") || lower.contains("wake") {
                    "Alarm set for 7:00 AM tomorrow.".to_string()
                } else if lower.contains("stopwatch") {
                    "Stopwatch started.".to_string()
                } else {
                    "It is 2:00 PM.".to_string()
                }
            }
            DeviceType::Calendar => {
                if lower.contains("add") || lower.contains("schedule a") || lower.contains("remind") {
                    format!("Added to the calendar: {}.", action.trim_end_matches('.'))
                } else {
                    "Today: team standup at 9 AM, lunch with Sarah at 1 PM, project review at 3 PM."
                        .to_string()
                }
            }
            DeviceType::SearchEngine => {
                if lower.contains("recipe") || lower.contains("cook") || lower.contains("meal") {
                    "Found 3 recipes: chicken rice bowl, one-pot chicken and rice, vegetable fried rice."
                        .to_string()
                } else if lower.contains("music") || lower.contains("song") {
                    "Recommendations: Weightless by Marconi Union, Clair de Lune by Debussy, Watermark by Enya."
                        .to_string()
                } else if lower.contains("weather") {
                    format!("{}: 18°C, partly cloudy, light breeze.", self.location)
                } else {
                    format!("Search results for '{}': three relevant matches found.", action)
                }
            }
            DeviceType::TvDisplay => format!("Now showing on the TV: {}.", action.trim_end_matches('.')),
            DeviceType::Fridge => {
                if lower.contains("expir") {
                    "Warning: milk expires in 2 days, yogurt expires tomorrow.".to_string()
                } else {
                    format!("Available in the fridge: {}.", FRIDGE_INVENTORY)
                }
            }
            DeviceType::Lighting => {
                if lower.contains("dim") || lower.contains("relax") || lower.contains("sleep") {
                    "Lights dimmed to 30% warm white.".to_string()
                } else if lower.contains("bright") {
                    "Lights set to full brightness.".to_string()
                } else {
                    format!("Lighting scene applied: {}.", action.trim_end_matches('.'))
                }
            }
            DeviceType::Thermostat => "Temperature set to 22°C.".to_string(),
            DeviceType::AudioSystem => {
                if lower.contains("volume") {
                    "Volume set to 50%.".to_string()
                } else {
                    "Now playing: a calm instrumental playlist at low volume.".to_string()
                }
            }
        };
        Ok(text)
    }

    fn answer_query(
        &self,
        device: DeviceType,
        query: &str,
        _prompt: &str,
    ) -> Result<String, ServiceError> {
        let lower = query.to_lowercase();
        let text = match device {
            DeviceType::Clock => "It is 2:00 PM.".to_string(),
            DeviceType::Calendar => {
                "Next appointment: project review at 3:00 PM in the office.".to_string()
            }
            DeviceType::SearchEngine => {
                if lower.contains("recipe") || lower.contains("cook") {
                    "Quick recipes with those ingredients: chicken fried rice, vegetable omelette."
                        .to_string()
                } else if lower.contains("music") || lower.contains("song") {
                    "Relaxing picks: Weightless by Marconi Union, Nuvole Bianche by Einaudi."
                        .to_string()
                } else {
                    format!("Top result for '{}'.", query)
                }
            }
            DeviceType::TvDisplay => format!("Displayed on the screen: {}.", query),
            DeviceType::Fridge => FRIDGE_INVENTORY.to_string(),
            DeviceType::Lighting => "Lights are currently at 60% brightness.".to_string(),
            DeviceType::Thermostat => "Room temperature is 21°C.".to_string(),
            DeviceType::AudioSystem => "Currently playing soft jazz at 40% volume.".to_string(),
        };
        Ok(text)
    }

    fn compose(&self, task_lines: &[String], _prompt: &str) -> Result<String, ServiceError> {
        if task_lines.is_empty() {
            return Ok("Nothing needed doing.".to_string());
        }
        Ok(format!("All set. {}", task_lines.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_splits_conjoined_requests() {
        let service = SimulatedCompletion::new();
        let raw = service
            .extract_intents("set a 20-minute timer and dim the lights", "")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let intents = value["intents"].as_array().unwrap();
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0]["description"], "set a 20-minute timer");
        assert_eq!(intents[1]["description"], "dim the lights");
    }

    #[test]
    fn extraction_flags_time_modifiers() {
        let service = SimulatedCompletion::new();
        let raw = service
            .extract_intents("play quiet music for 30 minutes", "")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let modifiers = &value["intents"][0]["modifiers"];
        assert_eq!(modifiers["time"], "for 30 minutes");
        assert_eq!(modifiers["manner"], "quiet");
    }

    #[test]
    fn clock_actions_report_durations() {
        let service = SimulatedCompletion::new();
        let text = service
            .device_action(DeviceType::Clock, "set a timer for 20 minutes", "")
            .unwrap();
        assert_eq!(text, "Timer set for 20 minutes.");
    }

    #[test]
    fn answers_are_deterministic() {
        let service = SimulatedCompletion::new();
        let a = service.answer_query(DeviceType::Fridge, "list ingredients", "").unwrap();
        let b = service.answer_query(DeviceType::Fridge, "list ingredients", "").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, FRIDGE_INVENTORY);
    }
}
