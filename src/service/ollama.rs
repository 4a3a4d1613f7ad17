//! Blocking Ollama client.
//!
//! Talks to a local Ollama host's `/api/generate` endpoint with streaming
//! disabled and temperature pinned to zero. The configured deadline is
//! applied as the HTTP client timeout; an elapsed deadline surfaces as
//! [`ServiceError::DeadlineExceeded`] and degrades to a failed task at the
//! call site.

use serde::Deserialize;
use serde_json::json;

use crate::config::EngineConfig;
use crate::device::DeviceType;
use crate::error::ServiceError;
use crate::service::TextService;

/// Text service backed by an Ollama model host.
#[derive(Debug)]
pub struct OllamaCompletion {
    model: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaCompletion {
    /// Build a client from the engine configuration.
    pub fn new(config: &EngineConfig) -> Result<Self, ServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.deadline)
            .build()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Ok(Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {"temperature": 0.0},
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(map_transport_error)?
            .error_for_status()
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;

        Ok(strip_code_fences(&parsed.response))
    }
}

/// Models wrap JSON answers in markdown fences often enough that stripping
/// them here saves every caller from doing it.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches('\n')
        .trim_end_matches("```")
        .trim()
        .to_string()
}

fn map_transport_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::DeadlineExceeded
    } else {
        ServiceError::Http(e.to_string())
    }
}

impl TextService for OllamaCompletion {
    fn extract_intents(&self, _user_text: &str, prompt: &str) -> Result<String, ServiceError> {
        self.generate(prompt)
    }

    fn device_action(
        &self,
        device: DeviceType,
        _action: &str,
        prompt: &str,
    ) -> Result<String, ServiceError> {
        log::debug!("ollama device_action call for {}", device);
        self.generate(prompt)
    }

    fn answer_query(
        &self,
        device: DeviceType,
        _query: &str,
        prompt: &str,
    ) -> Result<String, ServiceError> {
        log::debug!("ollama answer_query call for {}", device);
        self.generate(prompt)
    }

    fn compose(&self, _task_lines: &[String], prompt: &str) -> Result<String, ServiceError> {
        self.generate(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plain_fences() {
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn leaves_bare_text_alone() {
        assert_eq!(strip_code_fences("  Now playing: Titanic  "), "Now playing: Titanic");
    }
}
