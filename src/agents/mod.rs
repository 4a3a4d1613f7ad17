//! Device agents — one behavioral contract, eight instantiations.
//!
//! A [`DeviceAgent`] executes exactly one task at a time and owns the
//! business logic for its device type, including the decision whether it
//! needs information from another device. That decision
//! ([`DeviceAgent::collaboration_need`]) is a pure function of the task and
//! the completed view; the text service only ever supplies result prose, so
//! routing stays deterministic and testable.
//!
//! Agents never touch other agents' tasks. They read the completed portion
//! of the blackboard, and their writes flow back through the scheduler via
//! the returned [`AgentOutcome`].

mod audio_system;
mod calendar;
mod clock;
mod fridge;
mod lighting;
mod search_engine;
mod thermostat;
mod tv_display;

pub use audio_system::AudioSystemAgent;
pub use calendar::CalendarAgent;
pub use clock::ClockAgent;
pub use fridge::FridgeAgent;
pub use lighting::LightingAgent;
pub use search_engine::SearchEngineAgent;
pub use thermostat::ThermostatAgent;
pub use tv_display::TvDisplayAgent;

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::blackboard::CompletedView;
use crate::collaboration::CollaborationRequest;
use crate::config::HomeProfile;
use crate::device::DeviceType;
use crate::error::AgentError;
use crate::prompts;
use crate::service::TextService;
use crate::task::Task;

/// What an agent invocation produced.
#[derive(Debug, Clone)]
pub enum AgentOutcome {
    /// Task completed; the result text goes onto the blackboard.
    Done(String),
    /// The agent lacks information another device owns; the task suspends
    /// until the broker resolves the request.
    NeedsCollaboration(CollaborationRequest),
    /// The task cannot be completed.
    Failed(String),
}

/// Uniform capability contract for the eight device types.
///
/// Concrete agents supply the device identity, a capability blurb for
/// prompts, and their collaboration rules; execution and query answering
/// share the default flow below.
pub trait DeviceAgent: Send + Sync {
    /// The device type this agent simulates.
    fn device(&self) -> DeviceType;

    /// Capability blurb, phrased for prompts.
    fn capabilities(&self) -> &'static str;

    /// The text service this agent phrases its results through.
    fn service(&self) -> &Arc<dyn TextService>;

    /// Decide whether the task needs information from another device.
    ///
    /// Pure routing logic: evaluated against the action text and the
    /// completed view only. Returning `Some((target, query))` suspends the
    /// task. Implementations consult the view first and skip the request
    /// when a done task of the target device already provided the answer.
    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)>;

    /// Execute one task.
    ///
    /// `collaboration` carries the resolved request on re-invocation; a
    /// re-invoked agent completes or fails, it never asks again.
    fn execute(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
        collaboration: Option<&CollaborationRequest>,
    ) -> AgentOutcome {
        if collaboration.is_none() {
            if let Some((target, query)) = self.collaboration_need(task, view) {
                log::debug!("{} requests {} for: {}", self.device(), target, query);
                return AgentOutcome::NeedsCollaboration(CollaborationRequest::new(
                    task.id,
                    self.device(),
                    target.name(),
                    query,
                ));
            }
        }

        let history = history_lines(view);
        let folded = collaboration.and_then(|c| {
            c.response
                .as_deref()
                .map(|response| (collaborator_label(c), response))
        });
        let prompt =
            prompts::device_action(self.device(), self.capabilities(), task, &history, folded);

        match self.service().device_action(self.device(), &task.action, &prompt) {
            Ok(text) => AgentOutcome::Done(text),
            Err(e) => {
                log::warn!("{} action failed: {}", self.device(), e);
                let failure = AgentError::ActionFailed {
                    device: self.device(),
                    reason: e.to_string(),
                };
                AgentOutcome::Failed(failure.to_string())
            }
        }
    }

    /// Answer a one-shot collaboration query from another agent.
    ///
    /// Returns only the requested information string; the signature cannot
    /// express a new collaboration request, which is what bounds resolution
    /// to a single hop.
    fn answer(
        &self,
        query: &str,
        requester: DeviceType,
        _view: &CompletedView<'_>,
    ) -> Result<String, AgentError> {
        let prompt = prompts::query_response(self.device(), self.capabilities(), requester, query);
        self.service()
            .answer_query(self.device(), query, &prompt)
            .map_err(AgentError::from)
    }
}

/// Case-insensitive "does the action mention any of these" check used by
/// the agents' routing rules.
pub(crate) fn mentions(text: &str, any_of: &[&str]) -> bool {
    let lower = text.to_lowercase();
    any_of.iter().any(|needle| lower.contains(needle))
}

static TITLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:[Pp]lay|[Ss]how|[Ww]atch)\s+(?:the\s+)?[A-Z][\w']*"#).expect("title pattern")
});

/// Whether the action names a specific piece of content ("play Titanic",
/// a quoted title). Specific titles are played directly; vague requests go
/// through a recommendation query first.
pub(crate) fn names_specific_title(action: &str) -> bool {
    if TITLE_PATTERN.is_match(action) {
        return true;
    }
    action.matches('"').count() >= 2
}

/// "device: result" lines for every done task, in task order.
fn history_lines(view: &CompletedView<'_>) -> Vec<String> {
    view.done_results()
        .map(|(task, result)| format!("{}: {}", task.device_name(), result))
        .collect()
}

fn collaborator_label(request: &CollaborationRequest) -> &str {
    request
        .target
        .parse::<DeviceType>()
        .map(|d| d.label())
        .unwrap_or(request.target.as_str())
}

/// Maps device types to their live agents for one run.
pub struct AgentRegistry {
    agents: HashMap<DeviceType, Box<dyn DeviceAgent>>,
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut devices: Vec<_> = self.agents.keys().map(|d| d.name()).collect();
        devices.sort_unstable();
        f.debug_struct("AgentRegistry")
            .field("devices", &devices)
            .finish()
    }
}

impl AgentRegistry {
    /// Build agents for every device type the home profile installs.
    pub fn from_profile(profile: &HomeProfile, service: Arc<dyn TextService>) -> Self {
        let mut agents: HashMap<DeviceType, Box<dyn DeviceAgent>> = HashMap::new();
        for &device in &profile.devices {
            let agent: Box<dyn DeviceAgent> = match device {
                DeviceType::Clock => Box::new(ClockAgent::new(service.clone())),
                DeviceType::Calendar => Box::new(CalendarAgent::new(service.clone())),
                DeviceType::SearchEngine => Box::new(SearchEngineAgent::new(service.clone())),
                DeviceType::TvDisplay => Box::new(TvDisplayAgent::new(service.clone())),
                DeviceType::Fridge => Box::new(FridgeAgent::new(service.clone())),
                DeviceType::Lighting => Box::new(LightingAgent::new(service.clone())),
                DeviceType::Thermostat => Box::new(ThermostatAgent::new(service.clone())),
                DeviceType::AudioSystem => Box::new(AudioSystemAgent::new(service.clone())),
            };
            agents.insert(device, agent);
        }
        Self { agents }
    }

    /// Look up the live agent for a device type.
    pub fn get(&self, device: DeviceType) -> Option<&dyn DeviceAgent> {
        self.agents.get(&device).map(Box::as_ref)
    }

    /// Whether a device type is live in this run.
    pub fn contains(&self, device: DeviceType) -> bool {
        self.agents.contains_key(&device)
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the registry holds no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::Blackboard;
    use crate::service::simulated::SimulatedCompletion;

    #[test]
    fn registry_honors_the_home_profile() {
        let profile = HomeProfile::with_devices(vec![DeviceType::Clock, DeviceType::Fridge]);
        let registry = AgentRegistry::from_profile(&profile, Arc::new(SimulatedCompletion::new()));
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(DeviceType::Clock));
        assert!(!registry.contains(DeviceType::Lighting));
    }

    #[test]
    fn reinvoked_agent_never_asks_again() {
        let service: Arc<dyn TextService> = Arc::new(SimulatedCompletion::new());
        let agent = AudioSystemAgent::new(service);
        let task = Task::new(
            DeviceType::AudioSystem,
            "play music that matches what's in my fridge",
        );
        let board = Blackboard::new(Vec::new());
        let view = board.completed_view();

        let first = agent.execute(&task, &view, None);
        let AgentOutcome::NeedsCollaboration(mut request) = first else {
            panic!("expected a collaboration request");
        };
        request.resolved = true;
        request.response = Some("chicken, rice, eggs".to_string());

        let second = agent.execute(&task, &view, Some(&request));
        assert!(matches!(second, AgentOutcome::Done(_)));
    }
}
