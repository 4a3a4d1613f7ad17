//! Task planning.
//!
//! Deterministic expansion of intents into the ordered task queue. The
//! planner assigns devices and splits multi-device intents; it never
//! predicts collaboration — whether an agent needs help from another device
//! is discovered at execution time by the agent itself.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::device::DeviceType;
use crate::intent::Intent;
use crate::task::Task;

/// Keyword table for device assignment. Scanned top to bottom; the first
/// device whose keyword matches wins, and that fixed precedence is the
/// documented tie-break for ambiguous intents. Strong action verbs
/// (watch/play) outrank object mentions, so "play music that matches
/// what's in my fridge" lands on the audio system, not the fridge.
static DEVICE_KEYWORDS: Lazy<Vec<(DeviceType, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            DeviceType::TvDisplay,
            vec!["tv", "screen", "display", "movie", "watch", "series"],
        ),
        (
            DeviceType::AudioSystem,
            vec![
                "music", "song", "play", "volume", "audio", "speaker", "playlist",
            ],
        ),
        (
            DeviceType::Calendar,
            vec![
                "calendar", "schedule", "appointment", "meeting", "agenda", "remind me to",
            ],
        ),
        (
            DeviceType::Clock,
            vec![
                "timer", "alarm", "stopwatch", "wake", "what time", "countdown", "o'clock",
            ],
        ),
        (
            DeviceType::Fridge,
            vec![
                "fridge", "refrigerator", "ingredient", "milk", "expire", "groceries",
            ],
        ),
        (
            DeviceType::Lighting,
            vec!["light", "lamp", "dim", "brightness", "bright"],
        ),
        (
            DeviceType::Thermostat,
            vec![
                "temperature", "thermostat", "warmer", "cooler", "degrees", "heating", "cooling",
            ],
        ),
        (
            DeviceType::SearchEngine,
            vec![
                "search", "find", "recommend", "recipe", "weather", "look up", "suggest",
                "hungry", "what should i",
            ],
        ),
    ]
});

/// Ambience wording that expands to a lighting + thermostat + audio trio
/// when no single device is named.
const ATMOSPHERE_CUES: &[&str] = &[
    "relax",
    "tired",
    "sleep",
    "going to bed",
    "cozy",
    "atmosphere",
    "comfortable",
    "get ready",
    "get everything ready",
    "mood",
    "unwind",
    "energized",
    "groggy",
    "hosting",
];

static PLAYBACK_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfor (\d+\s?(?:more\s)?(?:minutes?|hours?))\b").expect("duration pattern")
});

static PLAYBACK_UNTIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\buntil (\d{1,2}(?::\d{2})?\s?(?:am|pm))\b").expect("until pattern")
});

/// Expands intents into the ordered task queue.
#[derive(Debug, Default)]
pub struct TaskPlanner;

impl TaskPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Expand intents into tasks, preserving intent order and assigning a
    /// stable sub-order within each expansion.
    pub fn plan(&self, intents: &[Intent]) -> Vec<Task> {
        let mut tasks = Vec::new();
        for intent in intents {
            self.plan_intent(intent, &mut tasks);
        }
        log::debug!("planned {} task(s) from {} intent(s)", tasks.len(), intents.len());
        tasks
    }

    fn plan_intent(&self, intent: &Intent, tasks: &mut Vec<Task>) {
        match resolve_device(intent) {
            Some(device) => {
                tasks.push(Task::new(device, intent.description.clone()));
                // A playback action bounded in time also needs the clock.
                if matches!(device, DeviceType::AudioSystem | DeviceType::TvDisplay) {
                    if let Some(timer_action) = timer_action_for(&intent.description) {
                        tasks.push(Task::new(DeviceType::Clock, timer_action));
                    }
                }
            }
            None if is_atmosphere(&intent.description) => {
                let desc = &intent.description;
                tasks.push(Task::new(
                    DeviceType::Lighting,
                    format!("adjust the lighting to suit: {}", desc),
                ));
                tasks.push(Task::new(
                    DeviceType::Thermostat,
                    format!("set a comfortable temperature for: {}", desc),
                ));
                tasks.push(Task::new(
                    DeviceType::AudioSystem,
                    format!("play background audio to suit: {}", desc),
                ));
            }
            None => {
                log::warn!("planner: no device for intent '{}'", intent.description);
                tasks.push(Task::unresolved(intent.description.clone()));
            }
        }
    }
}

/// The extraction service's assignment wins; otherwise first keyword match
/// in precedence order.
fn resolve_device(intent: &Intent) -> Option<DeviceType> {
    if let Some(device) = intent.device {
        return Some(device);
    }
    let lower = intent.description.to_lowercase();
    DEVICE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(device, _)| *device)
}

fn is_atmosphere(description: &str) -> bool {
    let lower = description.to_lowercase();
    ATMOSPHERE_CUES.iter().any(|cue| lower.contains(cue))
}

fn timer_action_for(description: &str) -> Option<String> {
    if let Some(c) = PLAYBACK_DURATION.captures(description) {
        return Some(format!("set a timer for {} to stop playback", &c[1]));
    }
    if let Some(c) = PLAYBACK_UNTIL.captures(description) {
        return Some(format!("set a reminder at {} to stop playback", &c[1]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn plan_one(description: &str) -> Vec<Task> {
        TaskPlanner::new().plan(&[Intent::new(description)])
    }

    #[test]
    fn one_intent_maps_to_one_task() {
        let tasks = plan_one("set a 20-minute timer");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].device, Some(DeviceType::Clock));
        assert_eq!(tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn service_assignment_wins_over_keywords() {
        let intent = Intent::for_device("play the morning briefing", DeviceType::TvDisplay);
        let tasks = TaskPlanner::new().plan(&[intent]);
        assert_eq!(tasks[0].device, Some(DeviceType::TvDisplay));
    }

    #[test]
    fn timed_playback_also_gets_a_clock_task() {
        let tasks = plan_one("play relaxing music for 30 minutes");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].device, Some(DeviceType::AudioSystem));
        assert_eq!(tasks[1].device, Some(DeviceType::Clock));
        assert!(tasks[1].action.contains("30 minutes"));
    }

    #[test]
    fn playback_until_a_time_gets_a_reminder_task() {
        let tasks = plan_one("show me a movie until 10pm");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].device, Some(DeviceType::TvDisplay));
        assert_eq!(tasks[1].device, Some(DeviceType::Clock));
        assert!(tasks[1].action.contains("10pm"));
    }

    #[test]
    fn atmosphere_intents_expand_to_three_devices() {
        let tasks = plan_one("I'm tired and need to relax");
        let devices: Vec<_> = tasks.iter().map(|t| t.device.unwrap()).collect();
        assert_eq!(
            devices,
            vec![DeviceType::Lighting, DeviceType::Thermostat, DeviceType::AudioSystem]
        );
    }

    #[test]
    fn explicit_device_mention_beats_atmosphere_expansion() {
        let tasks = plan_one("dim the lights to help me relax");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].device, Some(DeviceType::Lighting));
    }

    #[test]
    fn unmatched_intents_become_failed_unresolved_tasks() {
        let tasks = plan_one("feed the goldfish");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].device, None);
        assert_eq!(tasks[0].status, TaskStatus::Failed);
    }

    #[test]
    fn intent_order_is_preserved() {
        let intents = vec![
            Intent::new("dim the lights"),
            Intent::new("set a timer for 10 minutes"),
            Intent::new("what's in the fridge"),
        ];
        let tasks = TaskPlanner::new().plan(&intents);
        let devices: Vec<_> = tasks.iter().filter_map(|t| t.device).collect();
        assert_eq!(
            devices,
            vec![DeviceType::Lighting, DeviceType::Clock, DeviceType::Fridge]
        );
    }
}
