//! Fan targets out to a fixed number of workers and fan their results back in.
//!
//! ```text
//! feeder ──▶ target queue ──▶ W workers ──▶ result channel ──▶ consumer
//!                                 │
//!                             wait group ──▶ closer (closes the channel)
//! ```
//!
//! The feeder enqueues every target once. Workers take one target at a time,
//! hand it to the [`Fetcher`] and optionally pause before taking the next.
//! The closer owns the original result sender and drops it after every
//! worker is done, which ends the stream for the consumer.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::{
    Fetcher, Result, Target,
    stats::ErrorCounters,
    waiter::{WaitGroup, WaitGuard},
};

/// Default number of concurrent workers, 5.
pub const DEFAULT_WORKERS: usize = 5;
/// Capacity of the channel between the workers and the consumer.
pub const RESULT_CHANNEL_CAPACITY: usize = 1000;

type TargetQueue = Arc<Mutex<mpsc::Receiver<Target>>>;

/// A fixed-size pool of fetch workers
#[derive(Debug, Clone)]
pub struct WorkerPool {
    fetcher: Fetcher,
    counters: Arc<ErrorCounters>,
    workers: usize,
    delay: Duration,
}

impl WorkerPool {
    /// Create a pool with [`DEFAULT_WORKERS`] workers and no delay
    #[must_use]
    pub fn new(fetcher: Fetcher, counters: Arc<ErrorCounters>) -> Self {
        Self {
            fetcher,
            counters,
            workers: DEFAULT_WORKERS,
            delay: Duration::ZERO,
        }
    }

    /// Number of concurrent workers (at least one)
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Pause of each worker after every target
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Start the pipeline for the given targets
    ///
    /// Must be called from within a tokio runtime. The returned
    /// [`Pipeline`] yields result lines until every target was processed.
    #[must_use]
    pub fn spawn(self, targets: Vec<Target>) -> Pipeline {
        let (queue_tx, queue_rx) = mpsc::channel(targets.len().max(1));
        let (results_tx, results_rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);

        let feeder = tokio::spawn(async move {
            for target in targets {
                if queue_tx.send(target).await.is_err() {
                    break;
                }
            }
            // Dropping the sender closes the queue
        });

        let queue: TargetQueue = Arc::new(Mutex::new(queue_rx));
        let (group, guard) = WaitGroup::new();

        let workers: Vec<JoinHandle<()>> = (0..self.workers)
            .map(|id| {
                tokio::spawn(work(
                    id,
                    self.fetcher.clone(),
                    Arc::clone(&self.counters),
                    Arc::clone(&queue),
                    results_tx.clone(),
                    self.delay,
                    guard.clone(),
                ))
            })
            .collect();
        drop(guard);

        let closer = tokio::spawn(async move {
            group.wait().await;
            drop(results_tx);
        });

        let mut tasks = Vec::with_capacity(self.workers + 2);
        tasks.push(feeder);
        tasks.extend(workers);
        tasks.push(closer);

        Pipeline {
            results: results_rx,
            tasks,
        }
    }
}

/// A running fetch pipeline
#[derive(Debug)]
pub struct Pipeline {
    results: mpsc::Receiver<String>,
    tasks: Vec<JoinHandle<()>>,
}

impl Pipeline {
    /// Next result line, or `None` once all workers are done
    pub async fn recv(&mut self) -> Option<String> {
        self.results.recv().await
    }

    /// Wait for every task of the pipeline to finish.
    ///
    /// Any lines not yet received are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the tasks panicked.
    pub async fn finish(mut self) -> Result<()> {
        self.results.close();
        for task in self.tasks {
            task.await?;
        }
        Ok(())
    }
}

/// Process targets one at a time until the queue is empty
async fn work(
    id: usize,
    fetcher: Fetcher,
    counters: Arc<ErrorCounters>,
    queue: TargetQueue,
    results: mpsc::Sender<String>,
    delay: Duration,
    _guard: WaitGuard,
) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(target) = next else {
            break;
        };

        let outcome = fetcher.fetch(&target, &results, &counters).await;
        debug!("[worker {id}] {target}: {outcome}");

        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
    debug!("[worker {id}] Queue exhausted");
}
