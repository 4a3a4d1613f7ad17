//! Structured intents and complexity scoring.
//!
//! An [`Intent`] is one information unit extracted from the raw request:
//! what the user wants, which device the extraction service believes owns
//! it, and the modifiers that constrain how it should happen. Intents are
//! produced once per run and never change afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::DeviceType;

/// Kinds of modifiers the extraction service is asked to surface.
///
/// Modifiers are the easy-to-miss qualifiers of a request: "gradually",
/// "in the bedroom", "for 30 minutes", "no music".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    /// "at 10pm", "for 30 minutes", "gradually", "tomorrow".
    Time,
    /// "in the bedroom", "in the living room".
    Location,
    /// "quietly", "very bright", "dim", "warmly".
    Manner,
    /// "all", "some", "half".
    Quantity,
    /// "no music", "don't", "without".
    Negation,
    /// Anything the service flags that fits none of the above.
    Other,
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModifierKind::Time => "time",
            ModifierKind::Location => "location",
            ModifierKind::Manner => "manner",
            ModifierKind::Quantity => "quantity",
            ModifierKind::Negation => "negation",
            ModifierKind::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// One structured intent extracted from the user's request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// The information unit, with all details preserved.
    pub description: String,
    /// Device assignment from the extraction service. `None` means the
    /// service could not map this intent onto the device vocabulary; the
    /// planner gets the final word.
    #[serde(default)]
    pub device: Option<DeviceType>,
    /// Modifiers keyed by kind, deterministic iteration order.
    #[serde(default)]
    pub modifiers: BTreeMap<ModifierKind, String>,
}

impl Intent {
    /// Create an intent with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            device: None,
            modifiers: BTreeMap::new(),
        }
    }

    /// Create an intent already assigned to a device.
    pub fn for_device(description: impl Into<String>, device: DeviceType) -> Self {
        Self {
            description: description.into(),
            device: Some(device),
            modifiers: BTreeMap::new(),
        }
    }

    /// Add a modifier, returning self for chaining.
    pub fn with_modifier(mut self, kind: ModifierKind, value: impl Into<String>) -> Self {
        self.modifiers.insert(kind, value.into());
        self
    }
}

/// Reporting label for a run, derived from the complexity score.
///
/// Never used for control logic; it only labels runs for the benchmark
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    /// Monotonic score over intent count and modifier count.
    ///
    /// Intent count dominates: each intent weighs ten, each modifier one,
    /// so adding either can only raise the score.
    pub fn score(intents: &[Intent]) -> u32 {
        let modifier_count: usize = intents.iter().map(|i| i.modifiers.len()).sum();
        (intents.len() * 10 + modifier_count) as u32
    }

    /// Label a score: one plain intent is simple, two intents (or one
    /// heavily qualified intent) moderate, three or more complex.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=12 => Complexity::Simple,
            13..=29 => Complexity::Moderate,
            _ => Complexity::Complex,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Simple => write!(f, "simple"),
            Complexity::Moderate => write!(f, "moderate"),
            Complexity::Complex => write!(f, "complex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_monotonic_in_intents_and_modifiers() {
        let one = vec![Intent::new("dim the lights")];
        let one_qualified = vec![Intent::new("dim the lights")
            .with_modifier(ModifierKind::Time, "at 10pm")
            .with_modifier(ModifierKind::Manner, "gradually")];
        let two = vec![Intent::new("dim the lights"), Intent::new("play music")];

        assert!(Complexity::score(&one_qualified) > Complexity::score(&one));
        assert!(Complexity::score(&two) > Complexity::score(&one_qualified));
    }

    #[test]
    fn labels_match_intent_counts() {
        let one = vec![Intent::new("set a timer")];
        let three = vec![
            Intent::new("dim the lights"),
            Intent::new("play music"),
            Intent::new("set the temperature"),
        ];
        assert_eq!(Complexity::from_score(Complexity::score(&one)), Complexity::Simple);
        assert_eq!(Complexity::from_score(Complexity::score(&three)), Complexity::Complex);
    }
}
