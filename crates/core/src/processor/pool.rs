//! Worker pool dispatching per-file jobs.

use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info, info_span, Instrument};

use crate::converter::Converter;
use crate::placer::Replacer;
use crate::verifier::Verifier;

use super::config::ProcessorConfig;
use super::job::{run_file_job, JobContext};
use super::types::{ConversionOutcome, FileTask, PoolStatus};

/// Tracks statistics for the pool.
#[derive(Default)]
struct PoolStats {
    active: AtomicU64,
    queued: AtomicU64,
    total_succeeded: AtomicU64,
    total_failed: AtomicU64,
}

impl PoolStats {
    fn to_status(&self, workers: usize) -> PoolStatus {
        PoolStatus {
            workers,
            active_jobs: self.active.load(Ordering::Relaxed) as usize,
            queued_jobs: self.queued.load(Ordering::Relaxed) as usize,
            total_succeeded: self.total_succeeded.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
        }
    }

    fn queued(self: &Arc<Self>) -> Gauge {
        Gauge::raise(Arc::clone(self), |s| &s.queued)
    }

    fn active(self: &Arc<Self>) -> Gauge {
        Gauge::raise(Arc::clone(self), |s| &s.active)
    }

    fn record(&self, outcome: &ConversionOutcome) {
        if outcome.verified() {
            self.total_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.total_failed.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// One unit of a pool gauge, released on drop so a panicking job cannot leave
/// the counter raised.
struct Gauge {
    stats: Arc<PoolStats>,
    counter: fn(&PoolStats) -> &AtomicU64,
}

impl Gauge {
    fn raise(stats: Arc<PoolStats>, counter: fn(&PoolStats) -> &AtomicU64) -> Self {
        counter(&stats).fetch_add(1, Ordering::Relaxed);
        Self { stats, counter }
    }
}

impl Drop for Gauge {
    fn drop(&mut self) {
        (self.counter)(&self.stats).fetch_sub(1, Ordering::Relaxed);
    }
}

/// Runs a fixed list of files through a bounded pool of concurrent jobs.
///
/// Each file is handed to exactly one job, and no two jobs share a path, so
/// jobs need no coordination beyond the worker limit.
pub struct BatchProcessor<C: Converter, R: Replacer> {
    ctx: Arc<JobContext<C, R>>,
    semaphore: Arc<Semaphore>,
    stats: Arc<PoolStats>,
    workers: usize,
}

impl<C: Converter + 'static, R: Replacer + 'static> BatchProcessor<C, R> {
    /// Creates a new batch processor.
    pub fn new(config: ProcessorConfig, converter: C, replacer: R) -> Self {
        let workers = config.workers.max(1);
        Self {
            ctx: Arc::new(JobContext {
                config,
                converter: Arc::new(converter),
                replacer: Arc::new(replacer),
                verifier: None,
            }),
            semaphore: Arc::new(Semaphore::new(workers)),
            stats: Arc::new(PoolStats::default()),
            workers,
        }
    }

    /// Sets the verifier run between conversion and replacement.
    ///
    /// Must be called before `run`.
    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        if let Some(ctx) = Arc::get_mut(&mut self.ctx) {
            ctx.verifier = Some(verifier);
        }
        self
    }

    /// Returns the current pool status.
    pub fn status(&self) -> PoolStatus {
        self.stats.to_status(self.workers)
    }

    /// Processes every task and returns one outcome per task, in the order
    /// the tasks were given.
    ///
    /// Outcomes stream back over a channel as jobs finish; a job that panics
    /// is reported as a failed outcome for its file.
    pub async fn run(&self, tasks: Vec<FileTask>) -> Vec<ConversionOutcome> {
        let total = tasks.len();
        let (tx, mut rx) = mpsc::channel::<(usize, ConversionOutcome)>(total.max(1));
        let mut handles = Vec::with_capacity(total);
        let paths: Vec<_> = tasks.iter().map(|t| t.path.clone()).collect();

        info!(files = total, workers = self.workers, "Starting batch");

        for (index, task) in tasks.into_iter().enumerate() {
            let ctx = Arc::clone(&self.ctx);
            let semaphore = Arc::clone(&self.semaphore);
            let stats = Arc::clone(&self.stats);
            let tx = tx.clone();
            let span = info_span!("file", path = %task.path.display());

            let queued = stats.queued();
            handles.push(tokio::spawn(
                async move {
                    let permit = semaphore.acquire_owned().await;
                    drop(queued);

                    let outcome = match permit {
                        Ok(_permit) => {
                            let _active = stats.active();
                            run_file_job(task, &ctx).await
                        }
                        Err(_) => ConversionOutcome::failed(task.path, 0, "worker pool closed"),
                    };

                    stats.record(&outcome);
                    let _ = tx.send((index, outcome)).await;
                }
                .instrument(span),
            ));
        }
        drop(tx);

        let mut slots: Vec<Option<ConversionOutcome>> = vec![None; total];
        let mut finished = 0;
        while let Some((index, outcome)) = rx.recv().await {
            finished += 1;
            info!(
                path = %outcome.path.display(),
                converted = outcome.converted(),
                verified = outcome.verified(),
                "Finished {}/{}",
                finished,
                total
            );
            slots[index] = Some(outcome);
        }

        for (index, joined) in join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = joined {
                if slots[index].is_none() {
                    error!(path = %paths[index].display(), error = %e, "Worker aborted");
                    self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                    slots[index] = Some(ConversionOutcome::failed(
                        paths[index].clone(),
                        0,
                        format!("worker aborted: {}", e),
                    ));
                }
            }
        }

        slots
            .into_iter()
            .zip(paths)
            .map(|(slot, path)| {
                slot.unwrap_or_else(|| ConversionOutcome::failed(path, 0, "no outcome reported"))
            })
            .collect()
    }
}
