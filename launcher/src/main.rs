// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod process_runtime;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use collatz_fanout_core::collatz::DEFAULT_MAX_STEPS;
use collatz_fanout_core::config::{RunConfig, SpawnMode};
use collatz_fanout_core::error::{FanoutError, USAGE_EXIT_CODE};
use collatz_fanout_core::fault_injection::{FaultConfig, FaultInjectingRuntime};
use collatz_fanout_core::launcher::{LaunchReport, Launcher};
use collatz_fanout_core::thread_runtime::ThreadRuntime;
use collatz_fanout_core::worker_runtime::WorkerRuntime;
use collatz_fanout_core::worker_task::{WorkerOutcome, WorkerTask};
use process_runtime::ProcessRuntime;
use std::process::ExitCode;
use tracing::Level;

const USAGE: &str = "Usage: collatz-fanout (--threads|--procs) <workers> <limit>";

/// Run the 3n+1 check over [1, limit) on striped worker threads or processes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run workers as OS threads
    #[arg(long, conflicts_with = "procs")]
    threads: bool,

    /// Run workers as child processes
    #[arg(long)]
    procs: bool,

    /// Number of workers
    #[arg(allow_negative_numbers = true)]
    workers: Option<String>,

    /// Exclusive upper bound of the range
    #[arg(allow_negative_numbers = true)]
    limit: Option<String>,

    /// Steps after which a sequence is reported as non-terminating
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Reject the spawn of this worker index (repeatable)
    #[arg(long = "fail-worker", hide = true)]
    fail_workers: Vec<u64>,

    /// Probability (0-100) that any spawn is rejected
    #[arg(long, hide = true, default_value_t = 0)]
    spawn_failure_probability: u32,

    /// Worker entry point used by the process runtime
    #[arg(long, hide = true)]
    worker_task: Option<String>,
}

impl Cli {
    fn mode(&self) -> Option<SpawnMode> {
        if self.threads {
            Some(SpawnMode::Threads)
        } else if self.procs {
            Some(SpawnMode::Procs)
        } else {
            None
        }
    }

    fn run_config(&self) -> Result<RunConfig, FanoutError> {
        let (Some(mode), Some(workers), Some(limit)) =
            (self.mode(), self.workers.as_deref(), self.limit.as_deref())
        else {
            return Err(FanoutError::Usage(USAGE.to_string()));
        };
        Ok(RunConfig::parse(mode, workers, limit)?.with_max_steps(self.max_steps))
    }

    fn fault_config(&self) -> FaultConfig {
        FaultConfig {
            spawn_failure_probability: self.spawn_failure_probability.min(100),
            failing_workers: self.fail_workers.clone(),
        }
    }
}

/// Initialize a stderr tracing subscriber; stdout carries progress lines.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(USAGE_EXIT_CODE),
            };
        }
    };

    init_tracing(cli.verbose);

    if let Some(task_json) = cli.worker_task.as_deref() {
        return run_worker(task_json);
    }

    let config = match cli.run_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            if matches!(e, FanoutError::Validation { .. }) {
                eprintln!("{}", USAGE);
            }
            return ExitCode::from(e.exit_code());
        }
    };
    let faults = cli.fault_config();

    config.print_summary();
    if faults.is_enabled() {
        println!("\nFault Injection:");
        if faults.spawn_failure_probability > 0 {
            println!(
                "  - Spawn failure probability: {}%",
                faults.spawn_failure_probability
            );
        }
        if !faults.failing_workers.is_empty() {
            println!("  - Failing workers: {:?}", faults.failing_workers);
        }
    }
    println!();

    let report = match config.mode {
        SpawnMode::Threads => {
            coordinate(FaultInjectingRuntime::new(ThreadRuntime, faults), &config).await
        }
        SpawnMode::Procs => match ProcessRuntime::current_exe() {
            Ok(runtime) => coordinate(FaultInjectingRuntime::new(runtime, faults), &config).await,
            Err(e) => {
                eprintln!("Cannot locate own executable for worker processes: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    println!("\n=== RUN COMPLETE ===");
    report.print_summary();
    ExitCode::SUCCESS
}

async fn coordinate<R: WorkerRuntime>(runtime: R, config: &RunConfig) -> LaunchReport {
    let mut launcher = Launcher::new(runtime);
    let report = launcher.run(config).await;
    println!("All {} started workers completed!", report.spawned);
    report
}

/// Child side of the process runtime: run one slice and exit with its outcome.
fn run_worker(task_json: &str) -> ExitCode {
    let task: WorkerTask = match serde_json::from_str(task_json) {
        Ok(task) => task,
        Err(e) => {
            tracing::error!("invalid worker task: {}", e);
            return ExitCode::from(WorkerOutcome::Lost.exit_code() as u8);
        }
    };
    ExitCode::from(task.run().exit_code() as u8)
}
