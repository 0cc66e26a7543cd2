//! Job dispatch boundary.
//!
//! The driver never runs simulations inline; it submits [`SimulationJob`]s
//! through a [`Dispatcher`] and polls the returned handles. The boundary is
//! deliberately small - submit, poll, read outcome - so the in-process
//! thread pool used here could be swapped for a remote task queue without
//! touching the evolver.
//!
//! Handles expose an explicit failed terminal state: a job that raises is
//! distinguishable from one still running, which is what lets the driver
//! apply a bounded retry policy instead of stalling a generation forever.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use crate::{FitnessRecord, SimulationJob};

/// Observed state of a dispatched job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Not yet finished.
    Running,
    /// Finished; the fitness record is final.
    Completed(FitnessRecord),
    /// Finished unsuccessfully; no fitness record will ever be produced.
    Failed(String),
}

/// Pollable handle to one dispatched simulation job.
pub trait JobHandle: fmt::Debug + Send {
    /// Snapshot of the job's current state.
    fn status(&self) -> JobStatus;

    /// Whether the job has reached a terminal state (completed or failed).
    fn ready(&self) -> bool {
        self.status() != JobStatus::Running
    }

    /// The fitness record, once the job has completed successfully.
    fn result(&self) -> Option<FitnessRecord> {
        match self.status() {
            JobStatus::Completed(record) => Some(record),
            JobStatus::Running | JobStatus::Failed(_) => None,
        }
    }
}

/// Asynchronous fitness-evaluation service.
pub trait Dispatcher {
    /// Starts a job and returns a handle to poll it by. Submission never
    /// blocks on the job itself.
    fn submit(&self, job: SimulationJob) -> Box<dyn JobHandle>;
}

/// In-process dispatcher running each job on its own worker thread.
///
/// The worker publishes its terminal status through a shared slot; the
/// handle only ever locks that slot briefly to copy the status out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDispatcher;

impl ThreadDispatcher {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dispatcher for ThreadDispatcher {
    fn submit(&self, job: SimulationJob) -> Box<dyn JobHandle> {
        let slot = Arc::new(Mutex::new(JobStatus::Running));
        let worker_slot = Arc::clone(&slot);
        thread::spawn(move || {
            let status = match job.run() {
                Ok(record) => JobStatus::Completed(record),
                Err(error) => JobStatus::Failed(error.to_string()),
            };
            *worker_slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = status;
        });
        Box::new(ThreadJobHandle { slot })
    }
}

/// Handle to a [`ThreadDispatcher`] job.
#[derive(Debug)]
pub struct ThreadJobHandle {
    slot: Arc<Mutex<JobStatus>>,
}

impl JobHandle for ThreadJobHandle {
    fn status(&self) -> JobStatus {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use oxiswarm_engine::{Genotype, SimConfig, WorldSeed};

    use super::*;

    #[test]
    fn test_thread_dispatcher_completes_job() {
        let config = SimConfig {
            maximum_time: 3,
            team_size: 2,
            deposits: 1,
            ..SimConfig::default()
        };
        let job = SimulationJob::new(Genotype::default(), config, WorldSeed::new(5));

        let handle = ThreadDispatcher::new().submit(job);
        let mut waited = Duration::ZERO;
        while !handle.ready() {
            assert!(waited < Duration::from_secs(30), "job never completed");
            thread::sleep(Duration::from_millis(10));
            waited += Duration::from_millis(10);
        }

        match handle.status() {
            JobStatus::Completed(record) => assert_eq!(record.iterations, 3),
            other => panic!("expected completion, got {other:?}"),
        }
    }
}
