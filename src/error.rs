//! Error types for the Steiner tree solver.

use thiserror::Error;

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, SteinerError>;

/// Errors that can occur while building a graph or solving.
#[derive(Error, Debug)]
pub enum SteinerError {
    /// Malformed graph, or terminals that cannot reach each other.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Fewer than two distinct terminals, or a terminal absent from the graph.
    #[error("invalid terminals: {0}")]
    InvalidTerminals(String),

    /// A parallel worker did not finish its partition.
    #[error("worker for partition {partition} failed: {reason}")]
    WorkerFailure { partition: usize, reason: String },

    /// The exact search would not be tractable for this input.
    #[error("search space too large: {size} {kind} exceed the limit of {limit}")]
    SearchSpaceTooLarge {
        kind: &'static str,
        size: usize,
        limit: usize,
    },

    /// The worker thread pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
