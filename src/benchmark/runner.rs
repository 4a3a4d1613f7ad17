//! Category-filtered benchmark execution with per-case log artifacts.
//!
//! Runs each matching fixture's user input through the engine and writes
//! one plain-text log per case: task queue, collaboration traffic,
//! per-device results, final response, timing.

use std::path::{Path, PathBuf};

use chrono::Local;

use super::{Benchmark, CategoryFilter, FixtureError, TestCase};
use crate::run_result::{RunResult, RunStatus};
use crate::scheduler::Scheduler;
use crate::task::TaskStatus;

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

/// Summary of one executed case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub id: String,
    pub status: RunStatus,
    pub duration_secs: f64,
    /// Where the log artifact was written.
    pub log_path: PathBuf,
}

/// Runs benchmark cases through a scheduler.
#[derive(Debug)]
pub struct BenchmarkRunner {
    scheduler: Scheduler,
    log_dir: PathBuf,
}

impl BenchmarkRunner {
    pub fn new(scheduler: Scheduler, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            scheduler,
            log_dir: log_dir.into(),
        }
    }

    /// Run every case passing the filter, writing one log artifact each.
    pub fn run(
        &self,
        benchmark: &Benchmark,
        filter: CategoryFilter,
    ) -> Result<Vec<CaseReport>, FixtureError> {
        std::fs::create_dir_all(&self.log_dir)?;

        let cases = benchmark.filtered(filter);
        log::info!("running {} benchmark case(s)", cases.len());

        let mut reports = Vec::with_capacity(cases.len());
        for case in cases {
            let result = self.scheduler.run(&case.user_input);
            let log_path = self.log_dir.join(format!("{}.txt", case.id));
            std::fs::write(&log_path, render_log(case, &result))?;
            log::info!(
                "case {}: {} in {:.2}s -> {}",
                case.id,
                result.status,
                result.duration_secs,
                log_path.display()
            );
            reports.push(CaseReport {
                id: case.id.clone(),
                status: result.status,
                duration_secs: result.duration_secs,
                log_path,
            });
        }
        Ok(reports)
    }

    /// The directory log artifacts land in.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

fn render_log(case: &TestCase, result: &RunResult) -> String {
    let mut lines = vec![
        RULE.to_string(),
        format!("Test Case ID: {}", case.id),
        format!("Category: {}", case.category),
        format!("User Input: {}", case.user_input),
        format!("Run ID: {}", result.run_id),
        format!("Logged At: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        RULE.to_string(),
        String::new(),
        "Task Queue:".to_string(),
    ];

    for (i, task) in result.tasks.iter().enumerate() {
        let marker = match task.status {
            TaskStatus::Done => "done",
            TaskStatus::Failed => "FAILED",
            _ => "non-terminal",
        };
        lines.push(format!("  {}. [{}] {} ({})", i + 1, task.device, task.action, marker));
    }
    lines.push(String::new());

    for collaboration in &result.collaborations {
        lines.push("COLLABORATION REQUEST:".to_string());
        lines.push(format!("   From: {}", collaboration.from_device));
        lines.push(format!("   To: {}", collaboration.target));
        lines.push(format!("   Request: {}", collaboration.query));
        let label = if collaboration.resolved { "Response" } else { "Failure" };
        lines.push(format!("   {}: {}", label, collaboration.outcome));
        lines.push(String::new());
    }

    for task in &result.tasks {
        if let Some(ref text) = task.result {
            let heading = match task.status {
                TaskStatus::Done => format!("{} RESULT:", task.device.to_uppercase()),
                _ => format!("{} FAILURE:", task.device.to_uppercase()),
            };
            lines.push(heading);
            lines.push(format!("   {}", text));
            lines.push(String::new());
        }
    }

    lines.push(THIN_RULE.to_string());
    lines.push(format!("Run Status: {}", result.status));
    if let Some(complexity) = result.complexity {
        lines.push(format!("Complexity: {}", complexity));
    }
    lines.push("FINAL RESPONSE:".to_string());
    lines.push(format!("   {}", result.final_text));
    lines.push(String::new());
    lines.push(RULE.to_string());
    lines.push(format!("Execution Time: {:.2}s", result.duration_secs));
    lines.push(RULE.to_string());
    lines.push(String::new());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HomeProfile;
    use crate::service::simulated::SimulatedCompletion;
    use std::sync::Arc;

    fn fixture() -> Benchmark {
        serde_json::from_str(
            r#"{
                "test_cases": [
                    {
                        "id": "simple_001",
                        "category": "simple",
                        "user_input": "Set a 20-minute timer",
                        "collaboration": {"is_needed": false},
                        "expected_final_output": "Timer set."
                    },
                    {
                        "id": "moderate_001",
                        "category": "moderate",
                        "user_input": "Play music that matches what's in my fridge",
                        "collaboration": {"is_needed": true},
                        "expected_final_output": "Playing matching music."
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    fn runner(log_dir: &Path) -> BenchmarkRunner {
        let scheduler = Scheduler::new(
            Arc::new(SimulatedCompletion::new()),
            &HomeProfile::default(),
        );
        BenchmarkRunner::new(scheduler, log_dir)
    }

    #[test]
    fn writes_one_log_artifact_per_case() {
        let dir = tempfile::tempdir().unwrap();
        let reports = runner(dir.path()).run(&fixture(), CategoryFilter::All).unwrap();

        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert!(report.log_path.exists());
        }

        let log = std::fs::read_to_string(&reports[1].log_path).unwrap();
        assert!(log.contains("Test Case ID: moderate_001"));
        assert!(log.contains("COLLABORATION REQUEST:"));
        assert!(log.contains("From: audio_system"));
        assert!(log.contains("To: fridge"));
        assert!(log.contains("FINAL RESPONSE:"));
    }

    #[test]
    fn category_filter_limits_the_cases() {
        let dir = tempfile::tempdir().unwrap();
        let reports = runner(dir.path())
            .run(&fixture(), "simple".parse().unwrap())
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "simple_001");
        assert_eq!(reports[0].status, RunStatus::Complete);
    }
}
