//! Error taxonomy for the orchestration engine.
//!
//! Two tiers: fatal errors ([`EngineError`]) stop the state machine and fail
//! the whole run; everything else degrades locally to a failed task or a
//! failed collaboration so one bad device never blocks the rest of the
//! request.

use thiserror::Error;

use crate::device::DeviceType;
use crate::task::TaskStatus;

/// Fatal, run-level errors. These abort the run with `Terminated(Failed)`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The extraction service could not produce a well-formed intent list.
    #[error("intent extraction failed: {0}")]
    IntentParse(String),

    /// The planner produced an empty task sequence.
    #[error("planning produced no tasks")]
    PlanningEmpty,
}

/// Per-collaboration errors. Recovered by marking the collaboration and the
/// originating task as failed.
#[derive(Debug, Error)]
pub enum CollaborationError {
    /// The request names a device outside the eight-value vocabulary.
    #[error("collaboration target '{0}' is not a known device type")]
    UnknownTargetDevice(String),

    /// The target device type is valid but not installed in this home.
    #[error("no {0} agent is live in this run")]
    NoSuchCollaborator(DeviceType),

    /// Resolving the request would route back to the originating device type.
    #[error("collaboration from {requester} to {target} would cycle")]
    CollaborationCycle {
        /// Device type of the originating task.
        requester: DeviceType,
        /// Requested target device type.
        target: DeviceType,
    },

    /// The one-shot query responder failed to produce an answer.
    #[error("collaborator {device} could not answer: {source}")]
    QueryFailed {
        device: DeviceType,
        #[source]
        source: AgentError,
    },
}

/// Per-task errors raised by device agents.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The simulated device could not carry out the action.
    #[error("{device} could not perform the action: {reason}")]
    ActionFailed { device: DeviceType, reason: String },

    /// The task's device type is not installed in this home.
    #[error("device {0} is absent from this home")]
    DeviceUnavailable(DeviceType),

    /// The external text service failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Errors from the external text service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport-level failure talking to the model host.
    #[error("text service request failed: {0}")]
    Http(String),

    /// The per-call deadline elapsed before a response arrived.
    #[error("text service deadline exceeded")]
    DeadlineExceeded,

    /// The service answered, but not in the agreed format.
    #[error("malformed service response: {0}")]
    Malformed(String),
}

/// Rejected task status transition. The transition is never applied, so the
/// monotonicity invariant holds even when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal task transition {from:?} -> {to:?}")]
pub struct TaskStateError {
    pub from: TaskStatus,
    pub to: TaskStatus,
}
