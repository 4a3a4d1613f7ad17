//! Blackboard — the shared run-scoped store.
//!
//! Exactly one blackboard exists per run. It holds the ordered task
//! sequence, the results of done tasks, the collaboration records, and the
//! run history. Only the scheduler mutates it; agents and the broker see it
//! through [`CompletedView`], a read-only projection restricted to tasks
//! that are already done at the time of the read.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collaboration::CollaborationRecord;
use crate::device::DeviceType;
use crate::error::TaskStateError;
use crate::task::{Task, TaskStatus};

/// What a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    /// A task reached `Done`.
    TaskCompletion,
    /// An agent issued a collaboration request.
    CollaborationRequest,
    /// A collaborator answered a one-shot query.
    CollaborationResponse,
    /// A task reached `Failed`.
    TaskFailure,
}

/// One entry in the run history.
///
/// The history is what an agent consults to learn what other devices have
/// already done before it decides to ask one of them for help.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Wire name of the device that acted (`"unresolved"` for planner
    /// failures).
    pub device: String,
    /// Entry kind.
    pub kind: HistoryKind,
    /// The action or query that was carried out.
    pub action: String,
    /// What came of it.
    pub result: String,
    /// When the entry was recorded.
    pub at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(device: &str, kind: HistoryKind, action: &str, result: &str) -> Self {
        Self {
            device: device.to_string(),
            kind,
            action: action.to_string(),
            result: result.to_string(),
            at: Utc::now(),
        }
    }
}

/// The single shared store for one run.
#[derive(Debug)]
pub struct Blackboard {
    tasks: Vec<Task>,
    results: HashMap<Uuid, String>,
    collaborations: Vec<CollaborationRecord>,
    history: Vec<HistoryEntry>,
}

impl Blackboard {
    /// Create a blackboard over the planner's task sequence.
    ///
    /// Tasks born failed (unresolved device) are recorded in the history
    /// immediately so the failure is visible to every later agent.
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut board = Self {
            tasks,
            results: HashMap::new(),
            collaborations: Vec::new(),
            history: Vec::new(),
        };
        for i in 0..board.tasks.len() {
            if board.tasks[i].status == TaskStatus::Failed {
                let entry = HistoryEntry::new(
                    board.tasks[i].device_name(),
                    HistoryKind::TaskFailure,
                    &board.tasks[i].action,
                    board.tasks[i].result.as_deref().unwrap_or(""),
                );
                board.history.push(entry);
            }
        }
        board
    }

    /// The ordered task sequence.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether there are no tasks at all.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All collaboration records, resolved and failed.
    pub fn collaborations(&self) -> &[CollaborationRecord] {
        &self.collaborations
    }

    /// The full run history, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Borrow one task.
    pub fn task(&self, idx: usize) -> &Task {
        &self.tasks[idx]
    }

    // --- Scheduler-only mutations ---

    /// Move a pending task to `InProgress`.
    pub fn begin_task(&mut self, idx: usize) -> Result<(), TaskStateError> {
        self.tasks[idx].advance(TaskStatus::InProgress)
    }

    /// Suspend a task on an outstanding collaboration request.
    pub fn suspend_task(&mut self, idx: usize) -> Result<(), TaskStateError> {
        self.tasks[idx].advance(TaskStatus::AwaitingCollaboration)
    }

    /// Bring a suspended task back to `InProgress` after its request was
    /// resolved.
    pub fn resume_task(&mut self, idx: usize) -> Result<(), TaskStateError> {
        self.tasks[idx].advance(TaskStatus::InProgress)
    }

    /// Mark a task done and publish its result.
    pub fn complete_task(&mut self, idx: usize, result: String) -> Result<(), TaskStateError> {
        self.tasks[idx].advance(TaskStatus::Done)?;
        let task = &mut self.tasks[idx];
        task.result = Some(result.clone());
        self.results.insert(task.id, result.clone());
        self.history.push(HistoryEntry::new(
            task.device_name(),
            HistoryKind::TaskCompletion,
            &task.action,
            &result,
        ));
        Ok(())
    }

    /// Mark a task failed with a reason. A task that is already terminal is
    /// left as it is.
    pub fn fail_task(&mut self, idx: usize, reason: String) {
        if self.tasks[idx].status.is_terminal() {
            return;
        }
        // The transition is legal from every non-terminal status.
        let _ = self.tasks[idx].advance(TaskStatus::Failed);
        let task = &mut self.tasks[idx];
        task.result = Some(reason.clone());
        self.history.push(HistoryEntry::new(
            task.device_name(),
            HistoryKind::TaskFailure,
            &task.action,
            &reason,
        ));
    }

    /// Record a collaboration outcome and its history entries.
    pub fn record_collaboration(&mut self, record: CollaborationRecord) {
        self.history.push(HistoryEntry::new(
            record.from_device.name(),
            HistoryKind::CollaborationRequest,
            &record.query,
            &record.target,
        ));
        let kind = if record.resolved {
            HistoryKind::CollaborationResponse
        } else {
            HistoryKind::TaskFailure
        };
        self.history
            .push(HistoryEntry::new(&record.target, kind, &record.query, &record.outcome));
        self.collaborations.push(record);
    }

    // --- Completion queries ---

    /// Whether every task has reached a terminal status.
    pub fn all_terminal(&self) -> bool {
        self.tasks.iter().all(|t| t.status.is_terminal())
    }

    /// Number of tasks that reached `Done`.
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.status == TaskStatus::Done).count()
    }

    /// Whether any collaboration failed.
    pub fn any_collaboration_failed(&self) -> bool {
        self.collaborations.iter().any(|c| !c.resolved)
    }

    /// Read-only projection for agents and the broker.
    pub fn completed_view(&self) -> CompletedView<'_> {
        CompletedView { board: self }
    }
}

/// Read-only view of the blackboard restricted to completed work.
///
/// Agents receive this view during execution and query resolution; it
/// exposes only tasks already marked done plus the run history, never
/// in-progress or failed task state.
#[derive(Debug, Clone, Copy)]
pub struct CompletedView<'a> {
    board: &'a Blackboard,
}

impl<'a> CompletedView<'a> {
    /// Results of done tasks, in task order.
    pub fn done_results(&self) -> impl Iterator<Item = (&'a Task, &'a str)> {
        let board = self.board;
        board
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .filter_map(move |t| board.results.get(&t.id).map(|r| (t, r.as_str())))
    }

    /// The most recent done result produced by a given device, if any.
    ///
    /// This is what lets an agent skip a collaboration request when the
    /// information it needs is already on the board.
    pub fn latest_result_for(&self, device: DeviceType) -> Option<&'a str> {
        self.board
            .tasks
            .iter()
            .rev()
            .filter(|t| t.status == TaskStatus::Done && t.device == Some(device))
            .find_map(|t| self.board.results.get(&t.id).map(String::as_str))
    }

    /// The run history, oldest first.
    pub fn history(&self) -> &'a [HistoryEntry] {
        &self.board.history
    }
}
