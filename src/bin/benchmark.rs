//! Benchmark runner binary.
//!
//! Runs benchmark cases through the engine, one log artifact per case.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin benchmark -- [simple|moderate|complex|all] [benchmark.json]
//! # offline, no model host:
//! cargo run --bin benchmark -- all benchmark.json --simulated
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG` — log filter (e.g. "info,hearth=debug")
//! - `HEARTH_MODEL` — model identifier (default: "gemma2")
//! - `HEARTH_BASE_URL` — Ollama endpoint (default: "http://localhost:11434")

use std::sync::Arc;

use anyhow::{Context, Result};

use hearth::benchmark::runner::BenchmarkRunner;
use hearth::benchmark::{Benchmark, CategoryFilter};
use hearth::config::{EngineConfig, HomeProfile};
use hearth::scheduler::Scheduler;
use hearth::service::ollama::OllamaCompletion;
use hearth::service::simulated::SimulatedCompletion;
use hearth::service::TextService;

fn main() -> Result<()> {
    env_logger::init();

    let mut filter = CategoryFilter::All;
    let mut benchmark_path = "benchmark/benchmark_data.json".to_string();
    let mut simulated = false;

    let mut positional = 0;
    for arg in std::env::args().skip(1) {
        if arg == "--simulated" {
            simulated = true;
            continue;
        }
        match positional {
            0 => filter = arg.parse()?,
            1 => benchmark_path = arg,
            _ => anyhow::bail!("unexpected argument '{}'", arg),
        }
        positional += 1;
    }

    let mut config = EngineConfig::default();
    if let Ok(model) = std::env::var("HEARTH_MODEL") {
        config.model = model;
    }
    if let Ok(base_url) = std::env::var("HEARTH_BASE_URL") {
        config.base_url = base_url;
    }

    let service: Arc<dyn TextService> = if simulated {
        Arc::new(SimulatedCompletion::new())
    } else {
        Arc::new(OllamaCompletion::new(&config).context("building the Ollama client")?)
    };

    let benchmark = Benchmark::from_path(&benchmark_path)
        .with_context(|| format!("loading benchmark file {}", benchmark_path))?;

    let scheduler = Scheduler::new(service, &HomeProfile::default());
    let runner = BenchmarkRunner::new(scheduler, "logs");
    let reports = runner.run(&benchmark, filter)?;

    println!("{}", "=".repeat(70));
    for report in &reports {
        println!(
            "[{}] {} ({:.2}s) -> {}",
            report.id,
            report.status,
            report.duration_secs,
            report.log_path.display()
        );
    }
    println!("{}", "=".repeat(70));
    println!("{} case(s) completed; logs in: logs/", reports.len());
    Ok(())
}
