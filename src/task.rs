//! Schedulable units of device work.
//!
//! A [`Task`] is one device action derived from an intent. Its status moves
//! monotonically through
//! `Pending -> InProgress -> (AwaitingCollaboration -> InProgress)* -> Done | Failed`
//! and never regresses; [`Task::advance`] rejects anything else.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::device::DeviceType;
use crate::error::TaskStateError;

/// Execution status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet visited by the scheduler.
    Pending,
    /// Currently being executed by its device agent.
    InProgress,
    /// Suspended on an unresolved collaboration request.
    AwaitingCollaboration,
    /// Terminal: completed with a result.
    Done,
    /// Terminal: could not be completed.
    Failed,
}

impl TaskStatus {
    /// Whether the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }

    /// The legal transition relation. Terminal states admit nothing.
    fn allows(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Failed)
                | (InProgress, AwaitingCollaboration)
                | (InProgress, Done)
                | (InProgress, Failed)
                | (AwaitingCollaboration, InProgress)
                | (AwaitingCollaboration, Failed)
        )
    }
}

/// One schedulable unit of device work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique within the run.
    pub id: Uuid,
    /// Target device. `None` marks a task whose device could not be
    /// resolved; such a task is born `Failed`.
    pub device: Option<DeviceType>,
    /// What the device should do, with all key details from the request.
    pub action: String,
    /// Current status; mutate only through [`Task::advance`].
    pub status: TaskStatus,
    /// Result text, set when the task reaches `Done` (or a failure reason
    /// when it reaches `Failed`).
    pub result: Option<String>,
}

impl Task {
    /// Create a pending task for a resolved device.
    pub fn new(device: DeviceType, action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            device: Some(device),
            action: action.into(),
            status: TaskStatus::Pending,
            result: None,
        }
    }

    /// Create a task whose device could not be determined. Born failed so
    /// the scheduler surfaces a single error path instead of silently
    /// dropping the intent.
    pub fn unresolved(action: impl Into<String>) -> Self {
        let action = action.into();
        Self {
            id: Uuid::new_v4(),
            device: None,
            action,
            status: TaskStatus::Failed,
            result: Some("no device type could be determined for this request".to_string()),
        }
    }

    /// Wire name of the target device, `"unresolved"` when there is none.
    pub fn device_name(&self) -> &'static str {
        self.device.map(|d| d.name()).unwrap_or("unresolved")
    }

    /// Advance the status. Illegal transitions are rejected and the status
    /// left untouched.
    pub fn advance(&mut self, next: TaskStatus) -> Result<(), TaskStateError> {
        if !self.status.allows(next) {
            return Err(TaskStateError {
                from: self.status,
                to: next,
            });
        }
        log::debug!("task {} [{}]: {:?} -> {:?}", self.id, self.device_name(), self.status, next);
        self.status = next;
        Ok(())
    }

    /// Stable identity over `device|action`, used to correlate log lines
    /// across a run.
    pub fn key(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(format!("{}|{}", self.device_name(), self.action).as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({}: {})", self.device_name(), self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifecycle_is_legal() {
        let mut task = Task::new(DeviceType::Clock, "set a 20-minute timer");
        task.advance(TaskStatus::InProgress).unwrap();
        task.advance(TaskStatus::AwaitingCollaboration).unwrap();
        task.advance(TaskStatus::InProgress).unwrap();
        task.advance(TaskStatus::Done).unwrap();
        assert!(task.status.is_terminal());
    }

    #[test]
    fn status_never_regresses() {
        let mut task = Task::new(DeviceType::Lighting, "dim the lights");
        task.advance(TaskStatus::InProgress).unwrap();
        task.advance(TaskStatus::Done).unwrap();

        for next in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::AwaitingCollaboration,
            TaskStatus::Failed,
        ] {
            let err = task.advance(next).unwrap_err();
            assert_eq!(err.from, TaskStatus::Done);
            assert_eq!(task.status, TaskStatus::Done);
        }
    }

    #[test]
    fn awaiting_requires_in_progress() {
        let mut task = Task::new(DeviceType::AudioSystem, "play music");
        assert!(task.advance(TaskStatus::AwaitingCollaboration).is_err());
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn unresolved_tasks_are_born_failed() {
        let task = Task::unresolved("polish the doorknobs");
        assert_eq!(task.device, None);
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.device_name(), "unresolved");
    }

    #[test]
    fn key_is_stable_across_ids() {
        let a = Task::new(DeviceType::Fridge, "what's in the fridge");
        let b = Task::new(DeviceType::Fridge, "what's in the fridge");
        assert_ne!(a.id, b.id);
        assert_eq!(a.key(), b.key());
    }
}
