//! Exhaustive search over the candidate subsets.
//!
//! A scan starts in [SearchState] (scanning, infinite best) and ends in a
//! [SearchOutcome] (done). Outcomes of disjoint ranges combine with
//! [SearchOutcome::merge], which is how parallel partitions are reduced.

use crate::steiner_tree::builder::{Scratch, TreeBuilder};
use crate::steiner_tree::candidates::{CandidateSpace, CandidateSubset};
use crate::util::Distance;
use std::ops::{AddAssign, Range};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// How many subsets a scan processes between checks of the cancellation flag.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredSubset {
    pub subset: CandidateSubset,
    pub weight: Distance,
}

impl ScoredSubset {
    /// Lighter wins; on equal weight the earlier subset wins.
    fn key(&self) -> (Distance, u64) {
        (self.weight, self.subset.index)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Subsets handed to the tree builder.
    pub evaluated: u64,
    /// Subsets abandoned because they could not beat the running best.
    pub pruned: u64,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.evaluated += rhs.evaluated;
        self.pruned += rhs.pruned;
    }
}

/// The running best of a scan in progress.
#[derive(Debug, Default)]
pub struct SearchState {
    best: Option<ScoredSubset>,
    stats: SearchStats,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The weight a subset has to stay strictly below to become the new best.
    pub fn bound(&self) -> Distance {
        self.best.map_or_else(Distance::infinity, |b| b.weight)
    }

    /// Record the score of `subset`; `None` means it was pruned.
    pub fn consider(&mut self, subset: CandidateSubset, score: Option<Distance>) {
        self.stats.evaluated += 1;
        match score {
            Some(weight) if weight < self.bound() => {
                trace!(subset = subset.index, weight = ?weight, "new best subset");
                self.best = Some(ScoredSubset { subset, weight });
            }
            Some(_) => {}
            None => self.stats.pruned += 1,
        }
    }

    pub fn finish(self) -> SearchOutcome {
        SearchOutcome {
            best: self.best,
            stats: self.stats,
        }
    }
}

/// Result of a completed scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best: Option<ScoredSubset>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Combine the outcomes of two disjoint ranges. Commutative and associative,
    /// with `SearchOutcome::default()` as identity.
    pub fn merge(mut self, other: SearchOutcome) -> SearchOutcome {
        self.best = match (self.best, other.best) {
            (Some(a), Some(b)) => Some(if b.key() < a.key() { b } else { a }),
            (a, b) => a.or(b),
        };
        self.stats += other.stats;
        self
    }
}

/// Scans ranges of a [CandidateSpace], scoring subsets with a [TreeBuilder].
#[derive(Clone, Copy)]
pub struct ExactSearch<'a> {
    space: &'a CandidateSpace,
    builder: TreeBuilder<'a>,
}

impl<'a> ExactSearch<'a> {
    pub fn new(space: &'a CandidateSpace, builder: TreeBuilder<'a>) -> Self {
        Self { space, builder }
    }

    pub fn space(&self) -> &'a CandidateSpace {
        self.space
    }

    /// Scan the whole space.
    pub fn run(&self) -> SearchOutcome {
        let never = AtomicBool::new(false);
        self.scan(self.space.full_range(), &never)
            .unwrap_or_default()
    }

    /// Scan `range`, or return `None` if `cancel` gets raised before the end.
    pub fn scan(&self, range: Range<u64>, cancel: &AtomicBool) -> Option<SearchOutcome> {
        let mut state = SearchState::new();
        let mut scratch = Scratch::default();
        let capacity = self.space.terminals().len() + self.space.candidates().len();
        let mut nodes = Vec::with_capacity(capacity);
        for (count, subset) in (0u64..).zip(self.space.subsets(range)) {
            if count % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                return None;
            }
            self.space.subset_nodes_into(subset, &mut nodes);
            let score = self.builder.score(&nodes, state.bound(), &mut scratch);
            state.consider(subset, score);
        }
        Some(state.finish())
    }
}
