//! Solver configuration.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Which exact algorithm to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Score every subset of Steiner-point candidates. Can run in parallel.
    #[default]
    Exhaustive,
    /// Dynamic program over terminal subsets. Always sequential.
    DreyfusWagner,
}

/// Options of one solve.
///
/// ```
/// use steiner_exact::{Algorithm, SolverConfig};
///
/// let json = r#"{ "parallel": true, "workers": 4 }"#;
/// let config: SolverConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.algorithm, Algorithm::Exhaustive);
/// assert_eq!(config.effective_workers().get(), 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub algorithm: Algorithm,
    /// Split the exhaustive search across worker threads.
    pub parallel: bool,
    /// Worker count for the parallel search. Defaults to the available hardware concurrency.
    pub workers: Option<NonZeroUsize>,
}

impl SolverConfig {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.parallel = true;
        self.workers = Some(workers);
        self
    }

    /// The configured worker count, or the available hardware concurrency.
    pub fn effective_workers(&self) -> NonZeroUsize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
        })
    }
}
