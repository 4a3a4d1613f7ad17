//! Orchestration scheduler — the run's state machine.
//!
//! `Idle -> Planning -> Executing -> Aggregating -> Terminated`. Within
//! `Executing`, tasks are visited strictly in planner order on a single
//! logical control thread; the only suspension point is a collaboration
//! request, resolved synchronously before the scheduler proceeds. Every
//! routing branch (continue / detour / abort) is the outcome of a pure
//! function, so a run over a deterministic text service is reproducible.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::agents::{AgentOutcome, AgentRegistry, DeviceAgent};
use crate::aggregator::Aggregator;
use crate::blackboard::Blackboard;
use crate::collaboration::{CollaborationBroker, CollaborationRecord, CollaborationRequest};
use crate::config::HomeProfile;
use crate::error::{AgentError, EngineError};
use crate::extractor::IntentExtractor;
use crate::intent::Complexity;
use crate::planner::TaskPlanner;
use crate::run_result::{RunResult, RunStatus};
use crate::service::TextService;

/// States of the engine's control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Planning,
    Executing,
    Aggregating,
    Terminated(RunStatus),
}

fn transition(state: &mut EngineState, next: EngineState) {
    log::debug!("engine: {:?} -> {:?}", state, next);
    *state = next;
}

/// Drives one request end to end.
#[derive(Debug)]
pub struct Scheduler {
    extractor: IntentExtractor,
    planner: TaskPlanner,
    registry: AgentRegistry,
    broker: CollaborationBroker,
    aggregator: Aggregator,
}

impl Scheduler {
    /// Build a scheduler over a text service and home profile.
    pub fn new(service: Arc<dyn TextService>, profile: &HomeProfile) -> Self {
        Self {
            extractor: IntentExtractor::new(service.clone()),
            planner: TaskPlanner::new(),
            registry: AgentRegistry::from_profile(profile, service.clone()),
            broker: CollaborationBroker::new(),
            aggregator: Aggregator::new(service),
        }
    }

    /// Process one user request from raw text to a terminal [`RunResult`].
    ///
    /// Fatal errors (intent parse failure, empty plan) terminate the run
    /// with a failed result and an error report. Everything else degrades
    /// per task: one bad device never blocks the rest of the request.
    pub fn run(&self, user_text: &str) -> RunResult {
        let run_id = Uuid::new_v4();
        let started = Utc::now();
        let mut state = EngineState::Idle;
        log::info!("run {} started: {}", run_id, user_text);

        transition(&mut state, EngineState::Planning);
        let (intents, score) = match self.extractor.extract(user_text) {
            Ok(pair) => pair,
            Err(e) => return self.fatal(run_id, started, &mut state, e, None),
        };
        let complexity = Complexity::from_score(score);

        let tasks = self.planner.plan(&intents);
        if tasks.is_empty() {
            return self.fatal(
                run_id,
                started,
                &mut state,
                EngineError::PlanningEmpty,
                Some(complexity),
            );
        }
        let mut board = Blackboard::new(tasks);

        transition(&mut state, EngineState::Executing);
        for idx in 0..board.len() {
            self.execute_task(&mut board, idx);
        }

        // Backstop for the terminality invariant; execute_task always lands
        // on Done or Failed, so this loop should find nothing.
        for idx in 0..board.len() {
            if !board.task(idx).status.is_terminal() {
                log::error!("task {} left non-terminal", board.task(idx).id);
                board.fail_task(idx, "task never reached a terminal status".to_string());
            }
        }

        transition(&mut state, EngineState::Aggregating);
        let status = RunStatus::of(&board);
        let mut result = self.aggregator.aggregate(run_id, user_text, &board, status, complexity);
        result.duration_secs = elapsed_secs(started);

        transition(&mut state, EngineState::Terminated(status));
        log::info!(
            "run {} terminated: {} ({} of {} tasks done, {:.2}s)",
            run_id,
            status,
            board.done_count(),
            board.len(),
            result.duration_secs
        );
        result
    }

    /// Drive one task to a terminal status.
    fn execute_task(&self, board: &mut Blackboard, idx: usize) {
        if board.task(idx).status.is_terminal() {
            // Unresolved tasks arrive here already failed.
            return;
        }
        let Some(device) = board.task(idx).device else {
            board.fail_task(idx, "unresolved device type".to_string());
            return;
        };
        log::debug!("visiting {} (key {})", board.task(idx), board.task(idx).key());
        if let Err(e) = board.begin_task(idx) {
            log::error!("cannot start task: {}", e);
            board.fail_task(idx, e.to_string());
            return;
        }
        let Some(agent) = self.registry.get(device) else {
            board.fail_task(idx, AgentError::DeviceUnavailable(device).to_string());
            return;
        };

        let outcome = agent.execute(board.task(idx), &board.completed_view(), None);
        match outcome {
            AgentOutcome::Done(text) => self.finish(board, idx, text),
            AgentOutcome::Failed(reason) => board.fail_task(idx, reason),
            AgentOutcome::NeedsCollaboration(request) => self.detour(board, idx, agent, request),
        }
    }

    /// Resolve a collaboration request and re-invoke the originating agent.
    fn detour(
        &self,
        board: &mut Blackboard,
        idx: usize,
        agent: &dyn DeviceAgent,
        request: CollaborationRequest,
    ) {
        if let Err(e) = board.suspend_task(idx) {
            log::error!("cannot suspend task: {}", e);
            board.fail_task(idx, e.to_string());
            return;
        }

        // The response must reflect only tasks already done at request
        // time, which is exactly what the completed view exposes.
        let resolution = self
            .broker
            .resolve(&request, &board.completed_view(), &self.registry);

        match resolution {
            Ok(resolved) => {
                board.record_collaboration(CollaborationRecord::resolved(&resolved));
                if let Err(e) = board.resume_task(idx) {
                    log::error!("cannot resume task: {}", e);
                    board.fail_task(idx, e.to_string());
                    return;
                }
                let second = agent.execute(board.task(idx), &board.completed_view(), Some(&resolved));
                match second {
                    AgentOutcome::Done(text) => self.finish(board, idx, text),
                    AgentOutcome::Failed(reason) => board.fail_task(idx, reason),
                    AgentOutcome::NeedsCollaboration(next) => {
                        // Single-hop bound: one resolved detour per task.
                        log::error!(
                            "{} requested a second collaboration ({} -> {}) after resolution",
                            request.from_device,
                            next.from_device,
                            next.target
                        );
                        board.fail_task(
                            idx,
                            "agent requested a second collaboration for the same task".to_string(),
                        );
                    }
                }
            }
            Err(e) => {
                // Partial-completion policy: the collaboration and its task
                // fail, the run continues.
                log::warn!("collaboration failed: {}", e);
                board.record_collaboration(CollaborationRecord::failed(&request, &e));
                board.fail_task(idx, e.to_string());
            }
        }
    }

    fn finish(&self, board: &mut Blackboard, idx: usize, text: String) {
        if let Err(e) = board.complete_task(idx, text) {
            log::error!("cannot complete task: {}", e);
        }
    }

    fn fatal(
        &self,
        run_id: Uuid,
        started: chrono::DateTime<Utc>,
        state: &mut EngineState,
        error: EngineError,
        complexity: Option<Complexity>,
    ) -> RunResult {
        log::error!("run {} fatal: {}", run_id, error);
        transition(state, EngineState::Terminated(RunStatus::Failed));
        let mut result = RunResult::fatal(
            run_id,
            format!("The request could not be processed: {}", error),
            complexity,
        );
        result.duration_secs = elapsed_secs(started);
        result
    }
}

fn elapsed_secs(started: chrono::DateTime<Utc>) -> f64 {
    (Utc::now() - started).num_milliseconds() as f64 / 1000.0
}
