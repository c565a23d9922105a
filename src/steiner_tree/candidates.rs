//! The search space of the exhaustive algorithm: every subset of Steiner-point
//! candidates, addressed by its bitmask.
//!
//! Subset `i` selects candidate `j` iff bit `j` of `i` is set, so index order is
//! lexicographic order by bitmask and any index range can be regenerated
//! independently of the rest of the space.

use crate::error::{Result, SteinerError};
use crate::graph::{Graph, Label, NodeIndex, TerminalSet};
use std::ops::Range;

/// Index spaces are `u64`, and `2^63` is the largest power of two that leaves room for `len()`.
pub const MAX_CANDIDATES: usize = 63;

/// One element of the search space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateSubset {
    pub index: u64,
}

impl CandidateSubset {
    pub fn mask(self) -> u64 {
        self.index
    }

    pub fn len(self) -> usize {
        self.index.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.index == 0
    }
}

#[derive(Clone, Debug)]
pub struct CandidateSpace {
    terminals: Vec<NodeIndex>,
    candidates: Vec<NodeIndex>,
}

impl CandidateSpace {
    /// Candidates are the non-terminal nodes in the terminals' component, ascending.
    pub fn new<V: Label>(graph: &Graph<V>, terminals: &TerminalSet) -> Result<Self> {
        let reachable = graph.reachable_from(terminals.nodes()[0]);
        let candidates = graph
            .node_indices()
            .filter(|&v| reachable[v] && !terminals.contains(v))
            .collect::<Vec<_>>();
        if candidates.len() > MAX_CANDIDATES {
            return Err(SteinerError::SearchSpaceTooLarge {
                kind: "steiner candidates",
                size: candidates.len(),
                limit: MAX_CANDIDATES,
            });
        }
        Ok(Self {
            terminals: terminals.nodes().to_vec(),
            candidates,
        })
    }

    pub fn terminals(&self) -> &[NodeIndex] {
        &self.terminals
    }

    pub fn candidates(&self) -> &[NodeIndex] {
        &self.candidates
    }

    /// Number of subsets, `2^|candidates|`.
    pub fn len(&self) -> u64 {
        1 << self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn full_range(&self) -> Range<u64> {
        0..self.len()
    }

    /// Lazily enumerate the subsets with indices in `range`.
    ///
    /// # Panics
    /// If `range` reaches past the end of the space.
    pub fn subsets(&self, range: Range<u64>) -> impl Iterator<Item = CandidateSubset> {
        assert!(range.end <= self.len(), "range {range:?} outside the search space");
        range.map(|index| CandidateSubset { index })
    }

    /// Write the terminals plus the candidates selected by `subset` into `out`.
    pub fn subset_nodes_into(&self, subset: CandidateSubset, out: &mut Vec<NodeIndex>) {
        out.clear();
        out.extend_from_slice(&self.terminals);
        let mut mask = subset.mask();
        while mask != 0 {
            let bit = mask.trailing_zeros() as usize;
            out.push(self.candidates[bit]);
            mask &= mask - 1;
        }
    }

    pub fn subset_nodes(&self, subset: CandidateSubset) -> Vec<NodeIndex> {
        let mut nodes = Vec::with_capacity(self.terminals.len() + subset.len());
        self.subset_nodes_into(subset, &mut nodes);
        nodes
    }

    /// Split the space into `parts` contiguous, non-overlapping, near-equal ranges.
    ///
    /// `parts` is clamped to `1..=len()`. The first `len() % parts` ranges hold one
    /// extra subset.
    pub fn partition(&self, parts: usize) -> Vec<Range<u64>> {
        let total = self.len();
        let parts = (parts.max(1) as u64).min(total);
        let base = total / parts;
        let remainder = total % parts;
        let mut start = 0;
        (0..parts)
            .map(|i| {
                let len = base + u64::from(i < remainder);
                let range = start..start + len;
                start += len;
                range
            })
            .collect()
    }
}
