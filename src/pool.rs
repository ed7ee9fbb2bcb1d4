//! Fixed-size thread pool for bulk fan-out/fan-in sorting phases
//!
//! Workers are long-lived OS threads pulling jobs from a shared channel.
//! Submission is non-blocking and returns a [`TaskHandle`] that the caller
//! waits on; waiting blocks the calling thread only. A panicking job is
//! caught inside the worker and surfaces as [`SortError::TaskFailed`] when
//! its handle is waited on; one failed unit is fatal to the operation that
//! submitted it, with no retry.
//!
//! Jobs must not block on other jobs submitted to the same pool unless an
//! idle worker is guaranteed; the sort paths only ever submit independent
//! units and wait from the coordinating thread.

use crate::error::{Result, SortError};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Configuration for the thread pool
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Number of worker threads
    pub workers: usize,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
        }
    }
}

/// Counters describing pool activity
#[derive(Debug, Clone)]
pub struct PoolStats {
    /// Number of worker threads
    pub workers: usize,
    /// Jobs accepted by `submit`
    pub submitted: u64,
    /// Jobs that finished executing (including caught panics)
    pub completed: u64,
}

#[derive(Debug)]
struct PoolStatsInner {
    submitted: AtomicU64,
    completed: AtomicU64,
}

/// A waitable handle for one submitted job
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the job completes and retrieve its result. A panic in
    /// the job or a severed result channel becomes `TaskFailed`.
    pub fn wait(self) -> Result<T> {
        match self.receiver.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(SortError::task_failed(panic_message(&payload))),
            Err(_) => Err(SortError::task_failed("worker dropped result channel")),
        }
    }

    /// Check whether the result is already available without blocking
    pub fn is_finished(&self) -> bool {
        !self.receiver.is_empty()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {}", s)
    } else {
        "worker panicked".to_string()
    }
}

/// Fixed pool of worker threads with a shared job queue
#[derive(Debug)]
pub struct ThreadPool {
    sender: Option<Sender<Job>>,
    handles: Vec<thread::JoinHandle<()>>,
    stats: Arc<PoolStatsInner>,
    workers: usize,
}

impl ThreadPool {
    /// Create a pool with the given configuration, spawning its workers
    /// immediately. Zero workers is a configuration error.
    pub fn new(config: ThreadPoolConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(SortError::configuration("worker count must be non-zero"));
        }

        let (sender, receiver): (Sender<Job>, Receiver<Job>) = unbounded();
        let stats = Arc::new(PoolStatsInner {
            submitted: AtomicU64::new(0),
            completed: AtomicU64::new(0),
        });

        let mut handles = Vec::with_capacity(config.workers);
        for id in 0..config.workers {
            let receiver = receiver.clone();
            let stats = stats.clone();
            let handle = thread::Builder::new()
                .name(format!("rowsort-worker-{}", id))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                        stats.completed.fetch_add(1, Ordering::Relaxed);
                    }
                })
                .map_err(|e| SortError::configuration(format!("worker spawn failed: {}", e)))?;
            handles.push(handle);
        }

        log::debug!("thread pool started with {} workers", config.workers);

        Ok(Self {
            sender: Some(sender),
            handles,
            stats,
            workers: config.workers,
        })
    }

    /// Create a pool sized to the hardware concurrency
    pub fn with_default_config() -> Result<Self> {
        Self::new(ThreadPoolConfig::default())
    }

    /// Submit a unit of work, returning a waitable handle. Enqueue never
    /// blocks; submission after shutdown fails with a configuration error.
    pub fn submit<F, T>(&self, f: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| SortError::configuration("submit after pool shutdown"))?;

        let (result_tx, result_rx) = bounded(1);
        let job: Job = Box::new(move || {
            let result = catch_unwind(AssertUnwindSafe(f));
            // The handle may have been dropped; nobody left to notify then.
            let _ = result_tx.send(result);
        });

        sender
            .send(job)
            .map_err(|_| SortError::configuration("submit after pool shutdown"))?;
        self.stats.submitted.fetch_add(1, Ordering::Relaxed);

        Ok(TaskHandle {
            receiver: result_rx,
        })
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Snapshot of pool activity counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.workers,
            submitted: self.stats.submitted.load(Ordering::Relaxed),
            completed: self.stats.completed.load(Ordering::Relaxed),
        }
    }

    /// Close the job queue and join all workers. Pending jobs run to
    /// completion first. Idempotent; `Drop` calls this too.
    pub fn shutdown(&mut self) {
        if self.sender.take().is_some() {
            for handle in self.handles.drain(..) {
                let _ = handle.join();
            }
            log::debug!("thread pool shut down");
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
