//! Scores a node subset by the minimum spanning tree of its metric closure.
//!
//! The closure is the complete graph over the subset whose edge weights are
//! shortest-path distances in the original graph. Its MST weight is an upper
//! bound on the Steiner tree over those nodes, and it is tight when the subset
//! is exactly the node set of an optimal Steiner tree.

use crate::graph::NodeIndex;
use crate::shortest_paths::ShortestPathMatrix;
use crate::util::Distance;

/// Reusable buffers for Prim's algorithm so scoring a subset does not allocate.
#[derive(Default)]
pub struct Scratch {
    attach_cost: Vec<Distance>,
    attach_to: Vec<usize>,
    in_tree: Vec<bool>,
}

impl Scratch {
    fn reset(&mut self, len: usize) {
        self.attach_cost.clear();
        self.attach_cost.resize(len, Distance::infinity());
        self.attach_to.clear();
        self.attach_to.resize(len, 0);
        self.in_tree.clear();
        self.in_tree.resize(len, false);
    }
}

#[derive(Clone, Copy)]
pub struct TreeBuilder<'a> {
    distances: &'a ShortestPathMatrix,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(distances: &'a ShortestPathMatrix) -> Self {
        Self { distances }
    }

    /// Weight of the closure MST over `nodes`, or `None` as soon as the partial
    /// tree weighs at least `bound` (or some node is unreachable).
    ///
    /// Weights are non-negative, so a partial tree that already reaches `bound`
    /// can never finish below it.
    pub fn score(
        &self,
        nodes: &[NodeIndex],
        bound: Distance,
        scratch: &mut Scratch,
    ) -> Option<Distance> {
        let mut total = Distance::ZERO;
        let found = self.prim(nodes, scratch, |_, _, weight| {
            total = total + weight;
            total < bound
        });
        found.then_some(total)
    }

    /// Edges `(a, b)` of the closure MST over `nodes`, in the order Prim adds them.
    pub fn closure_edges(&self, nodes: &[NodeIndex]) -> Vec<(NodeIndex, NodeIndex)> {
        let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
        self.prim(nodes, &mut Scratch::default(), |a, b, weight| {
            edges.push((a, b));
            weight.is_finite()
        });
        edges
    }

    /// Prim's algorithm on the dense closure, starting from `nodes[0]`. Ties go
    /// to the lowest position in `nodes`. `visit` is called for every tree edge and
    /// stops the run by returning `false`; returns whether the tree was completed.
    fn prim<F>(&self, nodes: &[NodeIndex], scratch: &mut Scratch, mut visit: F) -> bool
    where
        F: FnMut(NodeIndex, NodeIndex, Distance) -> bool,
    {
        let Some(&root) = nodes.first() else {
            return true;
        };
        scratch.reset(nodes.len());
        scratch.in_tree[0] = true;
        let row = &self.distances[root];
        for (j, &v) in nodes.iter().enumerate().skip(1) {
            scratch.attach_cost[j] = row[v];
        }
        for _ in 1..nodes.len() {
            let mut next = None;
            let mut next_cost = Distance::infinity();
            for j in 1..nodes.len() {
                if !scratch.in_tree[j] && (next.is_none() || scratch.attach_cost[j] < next_cost) {
                    next = Some(j);
                    next_cost = scratch.attach_cost[j];
                }
            }
            let Some(next) = next else {
                break;
            };
            if !next_cost.is_finite() {
                return false;
            }
            scratch.in_tree[next] = true;
            if !visit(nodes[scratch.attach_to[next]], nodes[next], next_cost) {
                return false;
            }
            let row = &self.distances[nodes[next]];
            for (j, &v) in nodes.iter().enumerate().skip(1) {
                if !scratch.in_tree[j] && row[v] < scratch.attach_cost[j] {
                    scratch.attach_cost[j] = row[v];
                    scratch.attach_to[j] = next;
                }
            }
        }
        true
    }
}
