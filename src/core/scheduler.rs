//! Interval scheduler
//!
//! Owns a list of (interval, task) jobs and runs them from a single loop.
//! Jobs are awaited inline, so a job can never overlap with itself or with
//! another job. After a run the job's next start is `interval` after the run
//! finished. The loop stops at a wall-clock deadline or on shutdown; a job
//! still running when shutdown arrives is abandoned.
//!
//! Time comes from a [`Clock`] so the loop can be driven by a manual clock in
//! tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Time source for the run loop
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Resolve once `now() >= deadline`
    async fn sleep_until(&self, deadline: Instant);
}

/// Real time via tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, deadline: Instant) {
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
    }
}

/// Unit of scheduled work
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self);
}

struct Job {
    interval: Duration,
    next_run: Instant,
    runs: u64,
    task: Arc<dyn ScheduledTask>,
}

/// Why the run loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DeadlineReached,
    Shutdown,
    NoJobs,
}

/// Summary of a finished run loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerReport {
    pub stop_reason: StopReason,
    /// Completed runs per job, in registration order
    pub runs: Vec<(String, u64)>,
}

impl SchedulerReport {
    pub fn total_runs(&self) -> u64 {
        self.runs.iter().map(|(_, n)| n).sum()
    }
}

pub struct Scheduler<C: Clock = TokioClock> {
    clock: C,
    jobs: Vec<Job>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            jobs: Vec::new(),
        }
    }

    /// Register `task` to run every `interval`, first run immediately
    pub fn every(&mut self, interval: Duration, task: Arc<dyn ScheduledTask>) -> &mut Self {
        let now = self.clock.now();
        self.jobs.push(Job {
            interval,
            next_run: now,
            runs: 0,
            task,
        });
        self
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Run jobs until `deadline` passes or a shutdown message arrives
    ///
    /// A job whose start time falls after the deadline is not started; one
    /// already running at the deadline is allowed to finish.
    pub async fn run_until(
        &mut self,
        deadline: Instant,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> SchedulerReport {
        info!(jobs = self.jobs.len(), "[SCHEDULER] Run loop started");

        let stop_reason = loop {
            let Some(next_index) = self.next_due() else {
                break StopReason::NoJobs;
            };
            let wake_at = self.jobs[next_index].next_run;
            if wake_at >= deadline {
                // Wait out the remaining time so the process lives for the full run
                tokio::select! {
                    _ = self.clock.sleep_until(deadline) => break StopReason::DeadlineReached,
                    _ = shutdown_rx.recv() => break StopReason::Shutdown,
                }
            }

            tokio::select! {
                _ = self.clock.sleep_until(wake_at) => {}
                _ = shutdown_rx.recv() => break StopReason::Shutdown,
            }

            let job = &mut self.jobs[next_index];
            debug!(job = job.task.name(), run = job.runs + 1, "[SCHEDULER] Running job");

            let task = Arc::clone(&job.task);
            tokio::select! {
                _ = task.run() => {}
                _ = shutdown_rx.recv() => {
                    warn!(job = task.name(), "[SCHEDULER] Shutdown during run, abandoning it");
                    break StopReason::Shutdown;
                }
            }

            job.runs += 1;
            job.next_run = self.clock.now() + job.interval;
        };

        let report = SchedulerReport {
            stop_reason,
            runs: self
                .jobs
                .iter()
                .map(|job| (job.task.name().to_string(), job.runs))
                .collect(),
        };
        info!(
            stop_reason = ?report.stop_reason,
            total_runs = report.total_runs(),
            "[SCHEDULER] Run loop stopped"
        );
        report
    }

    /// Index of the job with the earliest start time (first registered wins ties)
    fn next_due(&self) -> Option<usize> {
        self.jobs
            .iter()
            .enumerate()
            .min_by_key(|(_, job)| job.next_run)
            .map(|(index, _)| index)
    }
}
