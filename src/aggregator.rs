//! Final-response aggregation.
//!
//! Once every task is terminal, the aggregator composes the per-task
//! results into one user-facing reply via the text service. Composition is
//! best-effort: if the service fails, a deterministic listing is produced
//! instead, so the caller always gets a [`RunResult`]. For a given terminal
//! blackboard and a deterministic service, aggregation is idempotent.

use std::sync::Arc;

use uuid::Uuid;

use crate::blackboard::Blackboard;
use crate::intent::Complexity;
use crate::prompts;
use crate::run_result::{RunResult, RunStatus, TaskOutcome};
use crate::service::TextService;
use crate::task::TaskStatus;

/// Composes the terminal blackboard into a [`RunResult`].
#[derive(Debug)]
pub struct Aggregator {
    service: Arc<dyn TextService>,
}

impl Aggregator {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }

    /// Aggregate a terminal blackboard.
    ///
    /// Task order in the result equals the planner's output order. Failed
    /// tasks are listed alongside done ones so the reply distinguishes
    /// satisfied intents from unsatisfied ones.
    pub fn aggregate(
        &self,
        run_id: Uuid,
        user_text: &str,
        board: &Blackboard,
        status: RunStatus,
        complexity: Complexity,
    ) -> RunResult {
        let task_lines: Vec<String> = board.tasks().iter().map(task_line).collect();
        let all_done = status == RunStatus::Complete;

        let prompt = prompts::compose(user_text, &task_lines, all_done);
        let final_text = match self.service.compose(&task_lines, &prompt) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("composition failed, falling back to listing: {}", e);
                fallback_listing(status, &task_lines)
            }
        };

        RunResult {
            run_id,
            status,
            final_text,
            tasks: board.tasks().iter().map(TaskOutcome::from).collect(),
            collaborations: board.collaborations().to_vec(),
            complexity: Some(complexity),
            duration_secs: 0.0,
        }
    }
}

fn task_line(task: &crate::task::Task) -> String {
    let device = task
        .device
        .map(|d| d.label().to_string())
        .unwrap_or_else(|| "Unresolved".to_string());
    match task.status {
        TaskStatus::Done => format!(
            "{}: {}",
            device,
            task.result.as_deref().unwrap_or("done")
        ),
        _ => format!(
            "{}: could not be completed ({})",
            device,
            task.result.as_deref().unwrap_or("no reason recorded")
        ),
    }
}

fn fallback_listing(status: RunStatus, task_lines: &[String]) -> String {
    let lead = match status {
        RunStatus::Complete => "Everything you asked for is done.",
        RunStatus::Partial => "Some of what you asked for is done.",
        RunStatus::Failed => "I couldn't complete your request.",
    };
    if task_lines.is_empty() {
        return lead.to_string();
    }
    format!("{}\n{}", lead, task_lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceType;
    use crate::error::ServiceError;
    use crate::service::simulated::SimulatedCompletion;
    use crate::service::ScriptedCompletion;
    use crate::task::Task;

    fn terminal_board() -> Blackboard {
        let mut board = Blackboard::new(vec![
            Task::new(DeviceType::Clock, "set a 20-minute timer"),
            Task::new(DeviceType::Lighting, "dim the lights"),
        ]);
        board.begin_task(0).unwrap();
        board.complete_task(0, "Timer set for 20 minutes.".to_string()).unwrap();
        board.begin_task(1).unwrap();
        board.fail_task(1, "bulb offline".to_string());
        board
    }

    #[test]
    fn aggregation_is_idempotent() {
        let board = terminal_board();
        let aggregator = Aggregator::new(Arc::new(SimulatedCompletion::new()));
        let run_id = Uuid::new_v4();

        let first = aggregator.aggregate(
            run_id,
            "set a timer and dim the lights",
            &board,
            RunStatus::Partial,
            Complexity::Moderate,
        );
        let second = aggregator.aggregate(
            run_id,
            "set a timer and dim the lights",
            &board,
            RunStatus::Partial,
            Complexity::Moderate,
        );

        assert_eq!(first.final_text, second.final_text);
        assert_eq!(first.status, second.status);
        assert_eq!(first.tasks.len(), second.tasks.len());
    }

    #[test]
    fn composition_failure_falls_back_to_a_listing() {
        let board = terminal_board();
        let service = ScriptedCompletion::new();
        service.push_err(ServiceError::DeadlineExceeded);
        let aggregator = Aggregator::new(Arc::new(service));

        let result = aggregator.aggregate(
            Uuid::new_v4(),
            "set a timer and dim the lights",
            &board,
            RunStatus::Partial,
            Complexity::Moderate,
        );

        assert!(result.final_text.contains("Some of what you asked for is done."));
        assert!(result.final_text.contains("Timer set for 20 minutes."));
        assert!(result.final_text.contains("could not be completed"));
    }

    #[test]
    fn outcomes_preserve_planner_order() {
        let board = terminal_board();
        let aggregator = Aggregator::new(Arc::new(SimulatedCompletion::new()));
        let result = aggregator.aggregate(
            Uuid::new_v4(),
            "set a timer and dim the lights",
            &board,
            RunStatus::Partial,
            Complexity::Moderate,
        );

        assert_eq!(result.tasks[0].device, "clock");
        assert_eq!(result.tasks[1].device, "lighting");
    }
}
