//! Runtime collaboration between device agents.
//!
//! A collaboration is a request by one agent for information owned by
//! another, resolved synchronously by the [`CollaborationBroker`] before the
//! scheduler moves on. Resolution is single-hop by construction: the target
//! agent is invoked as a one-shot query responder
//! ([`crate::agents::DeviceAgent::answer`]) whose signature cannot emit a new
//! request, so a detour can never chain.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agents::AgentRegistry;
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::error::CollaborationError;

/// A request by one agent for information owned by another device.
///
/// At most one outstanding (unresolved) request exists per task; the
/// scheduler resolves it before the task can issue another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationRequest {
    /// Id of the task that issued the request.
    pub from_task: Uuid,
    /// Device type of the requesting agent.
    pub from_device: DeviceType,
    /// Raw target device name; the broker resolves it against the device
    /// vocabulary and the live registry.
    pub target: String,
    /// The information being asked for.
    pub query: String,
    /// Set once the broker has filled in `response`.
    pub resolved: bool,
    /// The collaborator's answer.
    pub response: Option<String>,
}

impl CollaborationRequest {
    /// Create an unresolved request.
    pub fn new(
        from_task: Uuid,
        from_device: DeviceType,
        target: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            from_task,
            from_device,
            target: target.into(),
            query: query.into(),
            resolved: false,
            response: None,
        }
    }
}

/// Outcome of one collaboration, kept on the blackboard for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationRecord {
    /// Id of the originating task.
    pub from_task: Uuid,
    /// Requesting device.
    pub from_device: DeviceType,
    /// Target device name as requested.
    pub target: String,
    /// The query text.
    pub query: String,
    /// Whether the broker resolved it.
    pub resolved: bool,
    /// Response on success, failure description otherwise.
    pub outcome: String,
}

impl CollaborationRecord {
    /// Record a resolved request.
    pub fn resolved(request: &CollaborationRequest) -> Self {
        Self {
            from_task: request.from_task,
            from_device: request.from_device,
            target: request.target.clone(),
            query: request.query.clone(),
            resolved: true,
            outcome: request.response.clone().unwrap_or_default(),
        }
    }

    /// Record a failed request.
    pub fn failed(request: &CollaborationRequest, error: &CollaborationError) -> Self {
        Self {
            from_task: request.from_task,
            from_device: request.from_device,
            target: request.target.clone(),
            query: request.query.clone(),
            resolved: false,
            outcome: error.to_string(),
        }
    }
}

/// Resolves collaboration requests against the live agent registry.
///
/// The broker enforces the single-hop policy: a valid target answers exactly
/// one query and control returns to the originating agent. Anything that
/// would route back to the originating device type is refused as a cycle.
#[derive(Debug, Default)]
pub struct CollaborationBroker;

impl CollaborationBroker {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `request` synchronously.
    ///
    /// On success the returned request carries `resolved: true` and the
    /// collaborator's response. Failures leave the request untouched and
    /// degrade to a failed collaboration at the call site; they never abort
    /// the run.
    pub fn resolve(
        &self,
        request: &CollaborationRequest,
        view: &CompletedView<'_>,
        registry: &AgentRegistry,
    ) -> Result<CollaborationRequest, CollaborationError> {
        let target: DeviceType = request
            .target
            .parse()
            .map_err(|_| CollaborationError::UnknownTargetDevice(request.target.clone()))?;

        if target == request.from_device {
            return Err(CollaborationError::CollaborationCycle {
                requester: request.from_device,
                target,
            });
        }

        let agent = registry
            .get(target)
            .ok_or(CollaborationError::NoSuchCollaborator(target))?;

        log::debug!(
            "collaboration: {} -> {} ({})",
            request.from_device,
            target,
            request.query
        );

        let response = agent
            .answer(&request.query, request.from_device, view)
            .map_err(|source| CollaborationError::QueryFailed { device: target, source })?;

        let mut resolved = request.clone();
        resolved.resolved = true;
        resolved.response = Some(response);
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentRegistry;
    use crate::blackboard::Blackboard;
    use crate::config::HomeProfile;
    use crate::service::simulated::SimulatedCompletion;
    use std::sync::Arc;

    fn registry() -> AgentRegistry {
        AgentRegistry::from_profile(&HomeProfile::default(), Arc::new(SimulatedCompletion::new()))
    }

    #[test]
    fn resolves_against_live_collaborator() {
        let board = Blackboard::new(Vec::new());
        let broker = CollaborationBroker::new();
        let request = CollaborationRequest::new(
            Uuid::new_v4(),
            DeviceType::AudioSystem,
            "fridge",
            "list available ingredients",
        );

        let resolved = broker
            .resolve(&request, &board.completed_view(), &registry())
            .unwrap();
        assert!(resolved.resolved);
        assert!(resolved.response.is_some());
    }

    #[test]
    fn unknown_target_is_rejected() {
        let board = Blackboard::new(Vec::new());
        let broker = CollaborationBroker::new();
        let request = CollaborationRequest::new(
            Uuid::new_v4(),
            DeviceType::Clock,
            "vacuum_robot",
            "where are you",
        );

        let err = broker
            .resolve(&request, &board.completed_view(), &registry())
            .unwrap_err();
        assert!(matches!(err, CollaborationError::UnknownTargetDevice(_)));
    }

    #[test]
    fn absent_collaborator_is_rejected() {
        let profile = HomeProfile::with_devices(vec![DeviceType::Clock, DeviceType::Lighting]);
        let registry =
            AgentRegistry::from_profile(&profile, Arc::new(SimulatedCompletion::new()));
        let board = Blackboard::new(Vec::new());
        let broker = CollaborationBroker::new();
        let request =
            CollaborationRequest::new(Uuid::new_v4(), DeviceType::Clock, "fridge", "inventory");

        let err = broker
            .resolve(&request, &board.completed_view(), &registry)
            .unwrap_err();
        assert!(matches!(
            err,
            CollaborationError::NoSuchCollaborator(DeviceType::Fridge)
        ));
    }

    #[test]
    fn self_request_is_a_cycle() {
        let board = Blackboard::new(Vec::new());
        let broker = CollaborationBroker::new();
        let request = CollaborationRequest::new(
            Uuid::new_v4(),
            DeviceType::Fridge,
            "fridge",
            "what do I contain",
        );

        let err = broker
            .resolve(&request, &board.completed_view(), &registry())
            .unwrap_err();
        assert!(matches!(err, CollaborationError::CollaborationCycle { .. }));
    }
}
