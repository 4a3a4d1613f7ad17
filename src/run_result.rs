//! Terminal result of a run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blackboard::Blackboard;
use crate::collaboration::CollaborationRecord;
use crate::intent::Complexity;
use crate::task::{Task, TaskStatus};

/// Terminal rating of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every task done, no failed collaborations.
    Complete,
    /// At least one task done, but something failed.
    Partial,
    /// Nothing reached done.
    Failed,
}

impl RunStatus {
    /// Rate a terminal blackboard.
    pub fn of(board: &Blackboard) -> Self {
        let done = board.done_count();
        let total = board.len();
        if done == 0 {
            RunStatus::Failed
        } else if done == total && !board.any_collaboration_failed() {
            RunStatus::Complete
        } else {
            RunStatus::Partial
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Complete => write!(f, "complete"),
            RunStatus::Partial => write!(f, "partial"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Per-task outcome exposed for benchmark comparison: which device was
/// activated and what it did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Wire name of the activated device (`"unresolved"` when planning
    /// could not assign one).
    pub device: String,
    /// The action performed.
    pub action: String,
    /// Terminal status of the task.
    pub status: TaskStatus,
    /// Result text (or failure reason).
    pub result: Option<String>,
}

impl From<&Task> for TaskOutcome {
    fn from(task: &Task) -> Self {
        Self {
            device: task.device_name().to_string(),
            action: task.action.clone(),
            status: task.status,
            result: task.result.clone(),
        }
    }
}

/// What a run returns to the caller. Created once, terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Identity of the run.
    pub run_id: Uuid,
    /// Terminal rating.
    pub status: RunStatus,
    /// The single user-facing response.
    pub final_text: String,
    /// Per-task outcomes, in planner order.
    pub tasks: Vec<TaskOutcome>,
    /// Every collaboration the run attempted, resolved or failed.
    pub collaborations: Vec<CollaborationRecord>,
    /// Reporting label; `None` when the run died before extraction
    /// finished.
    pub complexity: Option<Complexity>,
    /// Wall-clock duration, stamped by the scheduler.
    pub duration_secs: f64,
}

impl RunResult {
    /// Result for a fatal error: no partial output beyond the error report.
    pub fn fatal(run_id: Uuid, report: String, complexity: Option<Complexity>) -> Self {
        Self {
            run_id,
            status: RunStatus::Failed,
            final_text: report,
            tasks: Vec::new(),
            collaborations: Vec::new(),
            complexity,
            duration_secs: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceType;

    #[test]
    fn rating_follows_the_partial_completion_policy() {
        // All done -> complete.
        let mut board = Blackboard::new(vec![Task::new(DeviceType::Clock, "set a timer")]);
        board.begin_task(0).unwrap();
        board.complete_task(0, "timer set".to_string()).unwrap();
        assert_eq!(RunStatus::of(&board), RunStatus::Complete);

        // One done, one failed -> partial.
        let mut board = Blackboard::new(vec![
            Task::new(DeviceType::Clock, "set a timer"),
            Task::new(DeviceType::Lighting, "dim the lights"),
        ]);
        board.begin_task(0).unwrap();
        board.complete_task(0, "timer set".to_string()).unwrap();
        board.begin_task(1).unwrap();
        board.fail_task(1, "bulb offline".to_string());
        assert_eq!(RunStatus::of(&board), RunStatus::Partial);

        // Nothing done -> failed.
        let board = Blackboard::new(vec![Task::unresolved("feed the goldfish")]);
        assert_eq!(RunStatus::of(&board), RunStatus::Failed);
    }
}
