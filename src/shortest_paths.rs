use crate::graph::{Graph, Label, NodeIndex};
use crate::util::Distance;
use std::ops::{Index, Range};

/// All-pairs shortest paths of a graph.
///
/// Computed once per solve and then only read, so workers share it by reference.
pub struct ShortestPathMatrix {
    distances: Vec<Distance>,
    /// `next_hop[i * n + j]` is the node after `i` on a shortest `i -> j` path.
    next_hop: Vec<Option<NodeIndex>>,
    dimension: usize,
}

impl ShortestPathMatrix {
    pub fn new<V: Label>(graph: &Graph<V>) -> Self {
        let n = graph.num_nodes();
        let mut res = ShortestPathMatrix {
            distances: vec![Distance::infinity(); n * n],
            next_hop: vec![None; n * n],
            dimension: n,
        };
        res.floyd_warshall(graph);
        res
    }

    /// Based on the pseudo-code
    /// [on Wikipedia](https://en.wikipedia.org/wiki/Floyd%E2%80%93Warshall_algorithm).
    fn floyd_warshall<V: Label>(&mut self, graph: &Graph<V>) {
        let n = self.dimension;
        for (from, to, weight) in graph.edges() {
            self.distances[from * n + to] = weight.into();
            self.distances[to * n + from] = weight.into();
            self.next_hop[from * n + to] = Some(to);
            self.next_hop[to * n + from] = Some(from);
        }
        for v in graph.node_indices() {
            self.distances[v * n + v] = Distance::ZERO;
            self.next_hop[v * n + v] = Some(v);
        }
        for k in 0..n {
            for i in 0..n {
                let ik = self.distances[i * n + k];
                if !ik.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let new_dist = ik + self.distances[k * n + j];
                    if new_dist < self.distances[i * n + j] {
                        self.distances[i * n + j] = new_dist;
                        self.next_hop[i * n + j] = self.next_hop[i * n + k];
                    }
                }
            }
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn distance(&self, from: NodeIndex, to: NodeIndex) -> Distance {
        self[from][to]
    }

    /// Nodes of a shortest path from `from` to `to`, both included.
    /// Empty if `to` is unreachable.
    pub fn path(&self, from: NodeIndex, to: NodeIndex) -> Vec<NodeIndex> {
        let n = self.dimension;
        if self.next_hop[from * n + to].is_none() {
            return vec![];
        }
        let mut path = vec![from];
        let mut current = from;
        while current != to {
            match self.next_hop[current * n + to] {
                Some(next) => current = next,
                None => return vec![],
            }
            path.push(current);
        }
        path
    }

    fn index_range(&self, index: usize) -> Range<usize> {
        let start = index * self.dimension;
        start..start + self.dimension
    }
}

/// This allows for neat two-dimensional indexing (e.g. `spm[a][b]`).
impl Index<usize> for ShortestPathMatrix {
    type Output = [Distance];

    fn index(&self, index: usize) -> &Self::Output {
        &self.distances[self.index_range(index)]
    }
}
