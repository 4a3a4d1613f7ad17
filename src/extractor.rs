//! Intent extraction.
//!
//! Turns raw user text into structured [`Intent`]s plus a complexity score
//! by prompting the text service and parsing its JSON. A malformed answer
//! is a run-level failure (`IntentParse`); there are no retries at this
//! layer.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Deserialize;

use crate::device::DeviceType;
use crate::error::EngineError;
use crate::intent::{Complexity, Intent, ModifierKind};
use crate::prompts;
use crate::service::TextService;

/// Wire format agreed with the extraction service.
#[derive(Debug, Deserialize)]
struct ExtractionPayload {
    intents: Vec<RawIntent>,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    description: String,
    #[serde(default)]
    device: Option<String>,
    #[serde(default)]
    modifiers: HashMap<String, String>,
}

/// Extracts structured intents from free text.
#[derive(Debug)]
pub struct IntentExtractor {
    service: Arc<dyn TextService>,
}

impl IntentExtractor {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }

    /// Extract intents and the complexity score for one request.
    pub fn extract(&self, user_text: &str) -> Result<(Vec<Intent>, u32), EngineError> {
        let prompt = prompts::intent_analysis(user_text);
        let raw = self
            .service
            .extract_intents(user_text, &prompt)
            .map_err(|e| EngineError::IntentParse(e.to_string()))?;

        let payload: ExtractionPayload = serde_json::from_str(&raw)
            .map_err(|e| EngineError::IntentParse(format!("invalid intent JSON: {}", e)))?;

        let mut intents = Vec::with_capacity(payload.intents.len());
        for raw_intent in payload.intents {
            let description = raw_intent.description.trim().to_string();
            if description.is_empty() {
                return Err(EngineError::IntentParse(
                    "intent with empty description".to_string(),
                ));
            }

            // A device name outside the vocabulary is the service guessing;
            // leave the assignment to the planner rather than failing the run.
            let device = raw_intent.device.as_deref().and_then(|name| {
                match name.parse::<DeviceType>() {
                    Ok(d) => Some(d),
                    Err(_) => {
                        log::warn!("extractor: ignoring unknown device '{}'", name);
                        None
                    }
                }
            });

            let mut modifiers = BTreeMap::new();
            for (kind, value) in raw_intent.modifiers {
                modifiers.insert(parse_modifier_kind(&kind), value);
            }

            intents.push(Intent {
                description,
                device,
                modifiers,
            });
        }

        let score = Complexity::score(&intents);
        log::debug!(
            "extracted {} intent(s), complexity score {}",
            intents.len(),
            score
        );
        Ok((intents, score))
    }
}

fn parse_modifier_kind(raw: &str) -> ModifierKind {
    match raw.trim().to_lowercase().as_str() {
        "time" => ModifierKind::Time,
        "location" => ModifierKind::Location,
        "manner" => ModifierKind::Manner,
        "quantity" => ModifierKind::Quantity,
        "negation" => ModifierKind::Negation,
        _ => ModifierKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ScriptedCompletion;

    #[test]
    fn parses_well_formed_payloads() {
        let service = ScriptedCompletion::new();
        service.push(
            r#"{"intents": [
                {"description": "set a 20-minute timer", "device": "clock",
                 "modifiers": {"time": "20-minute"}},
                {"description": "dim the lights", "device": "lighting", "modifiers": {}}
            ]}"#,
        );
        let extractor = IntentExtractor::new(Arc::new(service));

        let (intents, score) = extractor
            .extract("set a 20-minute timer and dim the lights")
            .unwrap();
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].device, Some(DeviceType::Clock));
        assert_eq!(
            intents[0].modifiers.get(&ModifierKind::Time).map(String::as_str),
            Some("20-minute")
        );
        assert_eq!(score, 21);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let service = ScriptedCompletion::new();
        service.push("definitely not json");
        let extractor = IntentExtractor::new(Arc::new(service));

        let err = extractor.extract("dim the lights").unwrap_err();
        assert!(matches!(err, EngineError::IntentParse(_)));
    }

    #[test]
    fn unknown_devices_fall_back_to_the_planner() {
        let service = ScriptedCompletion::new();
        service.push(r#"{"intents": [{"description": "dim the lights", "device": "disco_ball"}]}"#);
        let extractor = IntentExtractor::new(Arc::new(service));

        let (intents, _) = extractor.extract("dim the lights").unwrap();
        assert_eq!(intents[0].device, None);
    }

    #[test]
    fn service_failures_surface_as_parse_errors() {
        let service = ScriptedCompletion::new();
        service.push_err(crate::error::ServiceError::DeadlineExceeded);
        let extractor = IntentExtractor::new(Arc::new(service));

        assert!(matches!(
            extractor.extract("dim the lights"),
            Err(EngineError::IntentParse(_))
        ));
    }
}
