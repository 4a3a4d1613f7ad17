//! The external text-service seam.
//!
//! Everything the engine cannot decide deterministically — turning raw text
//! into structured intents, phrasing a simulated device's result, answering
//! a collaboration query, composing the final response — goes through the
//! [`TextService`] trait. Two backends ship with the crate:
//!
//! * [`ollama::OllamaCompletion`] — a blocking HTTP client against a local
//!   Ollama host (the model the system was built against).
//! * [`simulated::SimulatedCompletion`] — fully deterministic, no network;
//!   keeps the engine and the benchmark runnable offline.
//!
//! Routing decisions are never delegated to a backend: agents decide
//! Done/NeedsCollaboration/Failed in plain code, and a backend only supplies
//! prose.

pub mod ollama;
pub mod simulated;

use crate::device::DeviceType;
use crate::error::ServiceError;

/// External text understanding and composition.
///
/// Each method receives the fully built prompt plus the minimal structured
/// arguments a non-prompt backend needs, so deterministic implementations
/// never have to parse their own prompts back apart.
pub trait TextService: Send + Sync + std::fmt::Debug {
    /// Extract structured intents from raw user text.
    ///
    /// Returns the raw JSON text of the agreed format:
    /// `{"intents": [{"description", "device", "modifiers"}, ...]}`.
    fn extract_intents(&self, user_text: &str, prompt: &str) -> Result<String, ServiceError>;

    /// Produce the result text for a device action.
    fn device_action(
        &self,
        device: DeviceType,
        action: &str,
        prompt: &str,
    ) -> Result<String, ServiceError>;

    /// Answer a one-shot collaboration query on behalf of a device.
    fn answer_query(
        &self,
        device: DeviceType,
        query: &str,
        prompt: &str,
    ) -> Result<String, ServiceError>;

    /// Compose the final user-facing response from per-task result lines.
    fn compose(&self, task_lines: &[String], prompt: &str) -> Result<String, ServiceError>;
}

/// Scripted backend for tests: pops pre-loaded responses in order and
/// records every call it receives.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<String, ServiceError>>>,
    /// Prompts seen, in call order.
    pub calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn push(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue a failure.
    pub fn push_err(&self, err: ServiceError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    fn next(&self, prompt: &str) -> Result<String, ServiceError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Malformed("script exhausted".to_string())))
    }
}

#[cfg(test)]
impl TextService for ScriptedCompletion {
    fn extract_intents(&self, _user_text: &str, prompt: &str) -> Result<String, ServiceError> {
        self.next(prompt)
    }

    fn device_action(
        &self,
        _device: DeviceType,
        _action: &str,
        prompt: &str,
    ) -> Result<String, ServiceError> {
        self.next(prompt)
    }

    fn answer_query(
        &self,
        _device: DeviceType,
        _query: &str,
        prompt: &str,
    ) -> Result<String, ServiceError> {
        self.next(prompt)
    }

    fn compose(&self, _task_lines: &[String], prompt: &str) -> Result<String, ServiceError> {
        self.next(prompt)
    }
}
