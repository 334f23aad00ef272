//! Background writer for state snapshots.
//!
//! The control loop hands over an owned [`ApplicationState`] and later drains
//! [`SaveOutcome`]s; it never waits on disk I/O for an explicit save.

use super::document::ApplicationState;
use super::error::PersistenceError;
use super::repository::TaskRepository;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// A snapshot to write, tagged with the dirty-tracker generation it reflects
#[derive(Debug)]
pub struct SaveJob {
    pub generation: u64,
    pub state: ApplicationState,
}

/// Result of one [`SaveJob`]
#[derive(Debug)]
pub struct SaveOutcome {
    pub generation: u64,
    pub task_count: usize,
    pub result: Result<(), PersistenceError>,
}

#[derive(Debug)]
pub struct SaveWorker {
    jobs: Option<Sender<SaveJob>>,
    outcomes: Receiver<SaveOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl SaveWorker {
    pub fn spawn<R>(repository: Arc<R>) -> io::Result<Self>
    where
        R: TaskRepository + Send + Sync + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<SaveJob>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<SaveOutcome>();

        let handle = thread::Builder::new()
            .name("worktime-save".to_string())
            .spawn(move || {
                for job in job_rx {
                    let result = repository.save_state(&job.state);
                    let outcome = SaveOutcome {
                        generation: job.generation,
                        task_count: job.state.tasks.len(),
                        result,
                    };
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
                debug!("save worker exiting");
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            outcomes: outcome_rx,
            handle: Some(handle),
        })
    }

    /// Queue a snapshot. Returns the job back if the worker is gone.
    pub fn submit(&self, job: SaveJob) -> Result<(), SaveJob> {
        match &self.jobs {
            Some(jobs) => jobs.send(job).map_err(|e| e.0),
            None => Err(job),
        }
    }

    /// Next finished save, if any, without blocking
    pub fn try_recv(&self) -> Option<SaveOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Finish queued jobs and join the thread
    pub fn shutdown(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("save worker panicked");
            }
        }
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
