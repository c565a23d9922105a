//! Dreyfus-Wagner dynamic program, the terminal-indexed exact algorithm.
//!
//! Runs in `O(3^k n + 2^k n^2)` for `k` terminals, so unlike the subset search
//! its cost grows with the number of terminals rather than the size of the graph.

use crate::error::{Result, SteinerError};
use crate::graph::{Graph, Label, NodeIndex, TerminalSet};
use crate::shortest_paths::ShortestPathMatrix;
use crate::steiner_tree::tree::EdgeTree;
use crate::util::Distance;
use tracing::debug;

/// The tables hold `2^(k-1) * n` entries each.
pub const MAX_TERMINALS: usize = 16;

/// Filled tables of the dynamic program.
///
/// The first `k - 1` terminals are indexed by bitmask; the last one is the root
/// the full tree is grown towards. `cost[mask][v]` is the weight of a minimal
/// tree spanning the terminals in `mask` plus `v`.
pub struct DreyfusWagner<'a> {
    shortest_paths: &'a ShortestPathMatrix,
    terminals: &'a [NodeIndex],
    n: usize,
    cost: Vec<Distance>,
    /// Node the tree for `(mask, v)` branches at before its path to `v`.
    branch_at: Vec<NodeIndex>,
    /// Submask on one side of the branch of `(mask, u)`.
    split: Vec<u32>,
}

impl<'a> DreyfusWagner<'a> {
    pub fn new(shortest_paths: &'a ShortestPathMatrix, terminals: &'a TerminalSet) -> Result<Self> {
        if terminals.len() > MAX_TERMINALS {
            return Err(SteinerError::SearchSpaceTooLarge {
                kind: "terminals",
                size: terminals.len(),
                limit: MAX_TERMINALS,
            });
        }
        let n = shortest_paths.dimension();
        let masks = 1usize << (terminals.len() - 1);
        let mut dw = Self {
            shortest_paths,
            terminals: terminals.nodes(),
            n,
            cost: vec![Distance::infinity(); masks * n],
            branch_at: vec![0; masks * n],
            split: vec![0; masks * n],
        };
        dw.fill();
        Ok(dw)
    }

    fn fill(&mut self) {
        let n = self.n;
        let spm = self.shortest_paths;
        let masks = self.cost.len() / n;
        let mut merged = vec![Distance::infinity(); n];
        for mask in 1..masks {
            if mask.is_power_of_two() {
                let t = self.terminals[mask.trailing_zeros() as usize];
                self.cost[mask * n..(mask + 1) * n].copy_from_slice(&spm[t]);
                continue;
            }
            // Merge step: two subtrees meeting at u. Pinning the lowest bit to one
            // side visits every unordered split once.
            let low = mask & mask.wrapping_neg();
            let rest = mask ^ low;
            for u in 0..n {
                let mut best = Distance::infinity();
                let mut best_split = 0;
                let mut sub = rest;
                loop {
                    let side = low | sub;
                    if side != mask {
                        let w = self.cost[side * n + u] + self.cost[(mask ^ side) * n + u];
                        if w < best {
                            best = w;
                            best_split = side;
                        }
                    }
                    if sub == 0 {
                        break;
                    }
                    sub = (sub - 1) & rest;
                }
                merged[u] = best;
                self.split[mask * n + u] = best_split as u32;
            }
            // Attach step: the merge point is joined to v by a shortest path.
            for v in 0..n {
                let mut best = Distance::infinity();
                let mut best_u = v;
                for (u, &m) in merged.iter().enumerate() {
                    let w = m + spm[u][v];
                    if w < best {
                        best = w;
                        best_u = u;
                    }
                }
                self.cost[mask * n + v] = best;
                self.branch_at[mask * n + v] = best_u;
            }
        }
    }

    fn root(&self) -> NodeIndex {
        self.terminals[self.terminals.len() - 1]
    }

    fn full_mask(&self) -> usize {
        self.cost.len() / self.n - 1
    }

    /// Weight of the optimal Steiner tree.
    pub fn weight(&self) -> Distance {
        self.cost[self.full_mask() * self.n + self.root()]
    }

    /// Edges of a tree achieving [DreyfusWagner::weight], before normalization.
    pub fn tree(&self) -> EdgeTree {
        let mut tree = EdgeTree::empty();
        self.reverse_generate_tree(self.full_mask(), self.root(), &mut tree);
        tree
    }

    /// Walk the tables back from `(mask, v)`, collecting the chosen paths.
    fn reverse_generate_tree(&self, mask: usize, v: NodeIndex, tree: &mut EdgeTree) {
        if mask.is_power_of_two() {
            let t = self.terminals[mask.trailing_zeros() as usize];
            tree.extend(&EdgeTree::from_path(&self.shortest_paths.path(t, v)));
            return;
        }
        let u = self.branch_at[mask * self.n + v];
        tree.extend(&EdgeTree::from_path(&self.shortest_paths.path(u, v)));
        let side = self.split[mask * self.n + u] as usize;
        self.reverse_generate_tree(side, u, tree);
        self.reverse_generate_tree(mask ^ side, u, tree);
    }
}

/// Optimal tree over `terminals` by Dreyfus-Wagner, normalized to a pruned tree.
pub(crate) fn solve<V: Label>(
    graph: &Graph<V>,
    shortest_paths: &ShortestPathMatrix,
    terminals: &TerminalSet,
) -> Result<EdgeTree> {
    let dw = DreyfusWagner::new(shortest_paths, terminals)?;
    debug!(weight = ?dw.weight(), "dreyfus-wagner tables filled");
    let mut tree = dw.tree().spanning_forest(graph);
    tree.prune_leaves(terminals);
    Ok(tree)
}
