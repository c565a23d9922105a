//! Splits the candidate space into contiguous index ranges and scans them on a
//! dedicated thread pool, one range per worker. The pool is capped at the
//! available hardware concurrency; ranges beyond that wait for a free thread.
//!
//! Workers share nothing mutable except a cancellation flag. Each keeps its own
//! running best; the coordinator joins all of them and folds the outcomes with
//! [SearchOutcome::merge]. A failed partition fails the whole search, because
//! the minimum over the remaining partitions is not necessarily the optimum.

use crate::error::{Result, SteinerError};
use crate::steiner_tree::search::{ExactSearch, SearchOutcome};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::any::Any;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, debug_span, warn};

#[derive(Debug)]
enum WorkerReport {
    Finished(SearchOutcome),
    Cancelled,
    Panicked(String),
}

pub struct ParallelSearch<'a> {
    search: ExactSearch<'a>,
    workers: NonZeroUsize,
}

impl<'a> ParallelSearch<'a> {
    pub fn new(search: ExactSearch<'a>, workers: NonZeroUsize) -> Self {
        Self { search, workers }
    }

    /// Scan the whole space split into `workers` ranges.
    pub fn run(&self) -> Result<SearchOutcome> {
        let partitions = self.search.space().partition(self.workers.get());
        debug!(
            subsets = self.search.space().len(),
            requested = self.workers.get(),
            partitions = partitions.len(),
            "dispatching partitions"
        );
        let search = self.search;
        run_partitions(partitions, move |range, cancel| search.scan(range, cancel))
    }
}

/// Run `scan` once per partition as a pool task, then reduce.
///
/// The pool never has more threads than the hardware offers; extra partitions
/// queue up as tasks. `scan` returns `None` when it noticed the cancellation flag.
pub(crate) fn run_partitions<F>(partitions: Vec<Range<u64>>, scan: F) -> Result<SearchOutcome>
where
    F: Fn(Range<u64>, &AtomicBool) -> Option<SearchOutcome> + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(pool_size(partitions.len()))
        .thread_name(|i| format!("steiner-worker-{i}"))
        .build()?;
    let cancel = AtomicBool::new(false);
    let reports = pool.install(|| {
        partitions
            .into_par_iter()
            .enumerate()
            .map(|(partition, range)| {
                let span = debug_span!(
                    "partition",
                    partition,
                    start = range.start,
                    end = range.end
                );
                let _entered = span.enter();
                match catch_unwind(AssertUnwindSafe(|| scan(range, &cancel))) {
                    Ok(Some(outcome)) => {
                        debug!(
                            evaluated = outcome.stats.evaluated,
                            pruned = outcome.stats.pruned,
                            "partition finished"
                        );
                        WorkerReport::Finished(outcome)
                    }
                    Ok(None) => {
                        warn!("partition cancelled");
                        WorkerReport::Cancelled
                    }
                    Err(payload) => {
                        cancel.store(true, Ordering::Relaxed);
                        let reason = panic_message(payload.as_ref());
                        warn!(reason = %reason, "worker panicked, cancelling remaining partitions");
                        WorkerReport::Panicked(reason)
                    }
                }
            })
            .collect::<Vec<_>>()
    });
    reduce(reports)
}

fn pool_size(partitions: usize) -> usize {
    let hardware = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    partitions.clamp(1, hardware)
}

/// Fold finished partitions; any panicked or cancelled partition is an error,
/// reported by the first panic if there was one.
fn reduce(reports: Vec<WorkerReport>) -> Result<SearchOutcome> {
    let mut outcome = SearchOutcome::default();
    let mut cancelled = None;
    for (partition, report) in reports.into_iter().enumerate() {
        match report {
            WorkerReport::Finished(partial) => outcome = outcome.merge(partial),
            WorkerReport::Panicked(reason) => {
                return Err(SteinerError::WorkerFailure { partition, reason });
            }
            WorkerReport::Cancelled => {
                cancelled.get_or_insert(partition);
            }
        }
    }
    match cancelled {
        Some(partition) => Err(SteinerError::WorkerFailure {
            partition,
            reason: "cancelled before finishing its partition".into(),
        }),
        None => Ok(outcome),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
