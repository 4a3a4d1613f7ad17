//! Benchmark fixtures.
//!
//! The engine consumes (never produces) a JSON benchmark file of test
//! cases. Each case carries the raw user input, the intents an evaluator
//! should accept, whether collaboration is expected, and the reference
//! final output. Comparison against the engine's [`crate::RunResult`]
//! happens outside this crate; here we only load, filter, and run.

pub mod runner;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty category of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Simple,
    Moderate,
    Complex,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Simple => write!(f, "simple"),
            Category::Moderate => write!(f, "moderate"),
            Category::Complex => write!(f, "complex"),
        }
    }
}

/// Category filter for a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Whether a case passes the filter.
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(CategoryFilter::All),
            "simple" => Ok(CategoryFilter::Only(Category::Simple)),
            "moderate" => Ok(CategoryFilter::Only(Category::Moderate)),
            "complex" => Ok(CategoryFilter::Only(Category::Complex)),
            other => Err(FixtureError::BadFilter(other.to_string())),
        }
    }
}

/// One intent an evaluator accepts, with its owning device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedIntent {
    pub intent: String,
    pub device_type: String,
}

/// Whether the case is expected to need collaboration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationExpectation {
    pub is_needed: bool,
}

/// One benchmark test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub category: Category,
    pub user_input: String,
    /// Intents that must all be activated.
    #[serde(default)]
    pub required_intents: Option<Vec<ExpectedIntent>>,
    /// Alternative acceptable intents, when more than one reading is fine.
    #[serde(default)]
    pub acceptable_intents: Option<Vec<ExpectedIntent>>,
    pub collaboration: CollaborationExpectation,
    pub expected_final_output: String,
}

/// The benchmark file: a flat list of test cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benchmark {
    pub test_cases: Vec<TestCase>,
}

/// Fixture loading and filtering errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot read benchmark file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse benchmark file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown category filter '{0}' (expected simple, moderate, complex, or all)")]
    BadFilter(String),
}

impl Benchmark {
    /// Load a benchmark file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Cases passing a category filter, in file order.
    pub fn filtered(&self, filter: CategoryFilter) -> Vec<&TestCase> {
        self.test_cases
            .iter()
            .filter(|case| filter.matches(case.category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "test_cases": [
            {
                "id": "simple_001",
                "category": "simple",
                "user_input": "Set a 20-minute timer",
                "required_intents": [{"intent": "set a timer", "device_type": "clock"}],
                "collaboration": {"is_needed": false},
                "expected_final_output": "Timer set for 20 minutes."
            },
            {
                "id": "moderate_001",
                "category": "moderate",
                "user_input": "Play music that matches what's in my fridge",
                "acceptable_intents": [{"intent": "play music", "device_type": "audio_system"}],
                "collaboration": {"is_needed": true},
                "expected_final_output": "Playing music to match your ingredients."
            }
        ]
    }"#;

    #[test]
    fn parses_the_fixture_format() {
        let benchmark: Benchmark = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(benchmark.test_cases.len(), 2);
        assert_eq!(benchmark.test_cases[0].category, Category::Simple);
        assert!(!benchmark.test_cases[0].collaboration.is_needed);
        assert!(benchmark.test_cases[1].required_intents.is_none());
        assert!(benchmark.test_cases[1].acceptable_intents.is_some());
    }

    #[test]
    fn filters_by_category() {
        let benchmark: Benchmark = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(benchmark.filtered(CategoryFilter::All).len(), 2);
        let simple = benchmark.filtered("simple".parse().unwrap());
        assert_eq!(simple.len(), 1);
        assert_eq!(simple[0].id, "simple_001");
    }

    #[test]
    fn rejects_unknown_filters() {
        assert!(matches!(
            "impossible".parse::<CategoryFilter>(),
            Err(FixtureError::BadFilter(_))
        ));
    }
}
