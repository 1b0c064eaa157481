//! Deferred task executor.
//!
//! Admission calls never do the work themselves; they push a [`Job`] onto a
//! bounded queue and return.  A dispatcher task drains the queue and starts
//! each job on its own Tokio task, so a slow scan never holds up a connect
//! or disconnect.
//!
//! ```text
//! admission ──try_send──► [ bounded mpsc ] ──► dispatcher ──spawn──► job task
//!                                                  │                     │
//!                                         shutdown interrupt      JobRunner::run
//! ```
//!
//! # Teardown
//!
//! [`TaskExecutor::shutdown`] fires the shared interrupt, stops the
//! dispatcher, discards jobs that were queued but never started, and waits
//! for every started job to finish.  Once it returns, no job can touch the
//! interface state again.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::application::lock::Interrupt;

/// The kind of deferred work.  Exactly one job is queued per admitted
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Job {
    Scan,
    Connect,
    Disconnect,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scan => "scan",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
        };
        f.write_str(s)
    }
}

/// Error type for [`TaskExecutor::enqueue`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    #[error("task queue is full; {0} job rejected")]
    Full(Job),
    #[error("task queue is closed; {0} job rejected")]
    Closed(Job),
}

/// Runs one job to completion.
///
/// The production runner is `application::tasks::TaskRunner`; tests plug in
/// recording runners.
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    async fn run(&self, job: Job);
}

/// What happened to the queue at shutdown.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrainReport {
    /// Jobs that were queued but never started.
    pub dropped: Vec<Job>,
    /// Started jobs that were still running when shutdown began and were
    /// waited for.
    pub awaited: usize,
    /// Started jobs that panicked.
    pub panicked: usize,
}

/// Bounded queue plus dispatcher.
pub struct TaskExecutor {
    tx: mpsc::Sender<Job>,
    dispatcher: JoinHandle<DrainReport>,
    shutdown: Interrupt,
}

impl TaskExecutor {
    /// Spawns the dispatcher.  Must be called from within a Tokio runtime.
    ///
    /// A `queue_depth` of zero is treated as one.
    pub fn start(queue_depth: usize, runner: Arc<dyn JobRunner>, shutdown: Interrupt) -> Self {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let dispatcher = tokio::spawn(dispatch(rx, runner, shutdown.clone()));
        Self {
            tx,
            dispatcher,
            shutdown,
        }
    }

    /// Queues `job` without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`EnqueueError::Full`] when the queue is at capacity and
    /// [`EnqueueError::Closed`] once the dispatcher has stopped.
    pub fn enqueue(&self, job: Job) -> Result<(), EnqueueError> {
        self.tx.try_send(job).map_err(|e| match e {
            TrySendError::Full(job) => EnqueueError::Full(job),
            TrySendError::Closed(job) => EnqueueError::Closed(job),
        })
    }

    /// Stops the executor and waits until no job is running.
    pub async fn shutdown(self) -> DrainReport {
        self.shutdown.trigger();
        drop(self.tx);
        match self.dispatcher.await {
            Ok(report) => report,
            Err(e) => {
                error!("task dispatcher failed: {e}");
                DrainReport::default()
            }
        }
    }
}

/// Dispatcher loop: starts jobs until shutdown, then drains.
async fn dispatch(
    mut rx: mpsc::Receiver<Job>,
    runner: Arc<dyn JobRunner>,
    shutdown: Interrupt,
) -> DrainReport {
    let mut running: Vec<JoinHandle<()>> = Vec::new();

    loop {
        tokio::select! {
            biased;
            _ = shutdown.triggered() => break,
            job = rx.recv() => match job {
                Some(job) => {
                    running.retain(|handle| !handle.is_finished());
                    debug!(%job, "starting deferred task");
                    let runner = Arc::clone(&runner);
                    running.push(tokio::spawn(async move { runner.run(job).await }));
                }
                None => break,
            },
        }
    }

    rx.close();
    let mut report = DrainReport::default();
    while let Ok(job) = rx.try_recv() {
        warn!(%job, "discarding queued task at teardown");
        report.dropped.push(job);
    }

    running.retain(|handle| !handle.is_finished());
    report.awaited = running.len();
    for handle in running {
        if let Err(e) = handle.await {
            if e.is_panic() {
                error!("deferred task panicked: {e}");
                report.panicked += 1;
            }
        }
    }

    info!(
        dropped = report.dropped.len(),
        awaited = report.awaited,
        "task executor drained"
    );
    report
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingRunner {
        ran: Mutex<Vec<Job>>,
    }

    #[async_trait]
    impl JobRunner for RecordingRunner {
        async fn run(&self, job: Job) {
            self.ran.lock().unwrap().push(job);
        }
    }

    /// Sleeps before recording, so shutdown finds it still running.
    struct SlowRunner {
        delay: Duration,
        finished: Mutex<Vec<Job>>,
    }

    #[async_trait]
    impl JobRunner for SlowRunner {
        async fn run(&self, job: Job) {
            tokio::time::sleep(self.delay).await;
            self.finished.lock().unwrap().push(job);
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_enqueued_jobs_run_exactly_once() {
        // Arrange
        let runner = Arc::new(RecordingRunner::default());
        let exec = TaskExecutor::start(8, Arc::clone(&runner) as Arc<dyn JobRunner>, Interrupt::new());

        // Act
        exec.enqueue(Job::Scan).unwrap();
        exec.enqueue(Job::Connect).unwrap();
        exec.enqueue(Job::Disconnect).unwrap();
        settle().await;

        // Assert
        let mut ran = runner.ran.lock().unwrap().clone();
        ran.sort_by_key(|job| *job as u8);
        assert_eq!(ran, vec![Job::Scan, Job::Connect, Job::Disconnect]);
    }

    #[tokio::test]
    async fn test_jobs_do_not_run_before_caller_yields() {
        let runner = Arc::new(RecordingRunner::default());
        let exec = TaskExecutor::start(8, Arc::clone(&runner) as Arc<dyn JobRunner>, Interrupt::new());

        exec.enqueue(Job::Scan).unwrap();

        assert!(runner.ran.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enqueue_reports_full_queue() {
        let runner = Arc::new(RecordingRunner::default());
        let exec = TaskExecutor::start(1, runner as Arc<dyn JobRunner>, Interrupt::new());

        exec.enqueue(Job::Connect).unwrap();
        let second = exec.enqueue(Job::Disconnect);

        assert_eq!(second, Err(EnqueueError::Full(Job::Disconnect)));
    }

    #[tokio::test]
    async fn test_shutdown_discards_jobs_that_never_started() {
        // Arrange – nothing yields between enqueue and shutdown, so the
        // dispatcher never sees the job before the interrupt.
        let runner = Arc::new(RecordingRunner::default());
        let exec = TaskExecutor::start(4, Arc::clone(&runner) as Arc<dyn JobRunner>, Interrupt::new());
        exec.enqueue(Job::Disconnect).unwrap();

        // Act
        let report = exec.shutdown().await;

        // Assert
        assert_eq!(report.dropped, vec![Job::Disconnect]);
        assert!(runner.ran.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_running_jobs() {
        // Arrange
        let runner = Arc::new(SlowRunner {
            delay: Duration::from_millis(30),
            finished: Mutex::new(Vec::new()),
        });
        let exec = TaskExecutor::start(4, Arc::clone(&runner) as Arc<dyn JobRunner>, Interrupt::new());
        exec.enqueue(Job::Scan).unwrap();
        settle().await;

        // Act
        let report = exec.shutdown().await;

        // Assert
        assert_eq!(report.awaited, 1);
        assert_eq!(*runner.finished.lock().unwrap(), vec![Job::Scan]);
    }

    #[test]
    fn test_job_display_names() {
        assert_eq!(Job::Scan.to_string(), "scan");
        assert_eq!(Job::Connect.to_string(), "connect");
        assert_eq!(Job::Disconnect.to_string(), "disconnect");
    }
}
