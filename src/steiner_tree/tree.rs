use crate::graph::{EdgeWeight, Graph, Label, NodeIndex, TerminalSet};
use crate::shortest_paths::ShortestPathMatrix;
use crate::util::{Distance, UnionFind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A set of undirected edges of a graph, by node index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeTree {
    // edges are always ordered
    edges: BTreeSet<(NodeIndex, NodeIndex)>,
}

impl EdgeTree {
    /// The edges along a node path.
    pub fn from_path(path: &[NodeIndex]) -> Self {
        let edges = path
            .windows(2)
            .map(|w| (w[0].min(w[1]), w[0].max(w[1])))
            .collect::<BTreeSet<_>>();
        Self { edges }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn extend(&mut self, other: &Self) {
        self.edges.extend(other.edges.iter());
    }

    pub fn weight_in<V: Label>(&self, graph: &Graph<V>) -> Distance {
        self.edges
            .iter()
            .map(|&(a, b)| graph.weight(a, b))
            .fold(Distance::ZERO, |acc, w| acc + w)
    }

    pub fn nodes(&self) -> BTreeSet<NodeIndex> {
        self.edges.iter().flat_map(|&(a, b)| [a, b]).collect()
    }

    pub fn edges(&self) -> &BTreeSet<(NodeIndex, NodeIndex)> {
        &self.edges
    }

    #[cfg(test)]
    pub(crate) fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.edges.iter().filter_map(move |&(a, b)| {
            if a == node {
                Some(b)
            } else if b == node {
                Some(a)
            } else {
                None
            }
        })
    }

    fn degrees(&self) -> BTreeMap<NodeIndex, usize> {
        let mut degrees = BTreeMap::new();
        for &(a, b) in &self.edges {
            *degrees.entry(a).or_insert(0) += 1;
            *degrees.entry(b).or_insert(0) += 1;
        }
        degrees
    }

    pub fn find_leaves(&self) -> Vec<NodeIndex> {
        self.degrees()
            .into_iter()
            .filter(|&(_, degree)| degree == 1)
            .map(|(node, _)| node)
            .collect()
    }

    /// Whether the edges form a single connected, acyclic component.
    pub fn is_tree(&self) -> bool {
        let nodes = self.nodes();
        if nodes.is_empty() {
            return true;
        }
        if self.edges.len() != nodes.len() - 1 {
            return false;
        }
        let index = nodes.iter().enumerate().map(|(i, &v)| (v, i)).collect::<BTreeMap<_, _>>();
        let mut components = UnionFind::new(nodes.len());
        self.edges
            .iter()
            .all(|(a, b)| components.union(index[a], index[b]))
    }

    /// Keep a minimum spanning forest of these edges (Kruskal, ties by endpoints).
    pub fn spanning_forest<V: Label>(&self, graph: &Graph<V>) -> Self {
        let mut sorted = self.edges.iter().copied().collect::<Vec<_>>();
        sorted.sort_by_key(|&(a, b)| (graph.weight(a, b), a, b));
        let mut components = UnionFind::new(graph.num_nodes());
        let edges = sorted
            .into_iter()
            .filter(|&(a, b)| components.union(a, b))
            .collect();
        Self { edges }
    }

    /// Repeatedly remove leaves that are not terminals.
    pub fn prune_leaves(&mut self, terminals: &TerminalSet) {
        loop {
            let removable = self
                .find_leaves()
                .into_iter()
                .filter(|&leaf| !terminals.contains(leaf))
                .collect::<BTreeSet<_>>();
            if removable.is_empty() {
                return;
            }
            self.edges
                .retain(|(a, b)| !removable.contains(a) && !removable.contains(b));
        }
    }

    /// Turn the metric-closure tree of a subset into a tree of graph edges.
    ///
    /// Each closure edge becomes its shortest path. Overlapping paths can close
    /// cycles or leave dangling Steiner nodes, so the union is reduced to a
    /// spanning forest and pruned; this never makes the tree heavier than the
    /// closure tree it came from.
    pub fn realize<V: Label>(
        graph: &Graph<V>,
        shortest_paths: &ShortestPathMatrix,
        closure_edges: &[(NodeIndex, NodeIndex)],
        terminals: &TerminalSet,
    ) -> Self {
        let mut union = Self::empty();
        for &(a, b) in closure_edges {
            union.extend(&Self::from_path(&shortest_paths.path(a, b)));
        }
        let mut tree = union.spanning_forest(graph);
        tree.prune_leaves(terminals);
        tree
    }
}

/// A Steiner tree over caller labels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SteinerTree<V> {
    vertices: Vec<V>,
    edges: Vec<(V, V, EdgeWeight)>,
    weight: EdgeWeight,
}

impl<V: Label> SteinerTree<V> {
    pub(crate) fn from_edge_tree(graph: &Graph<V>, tree: &EdgeTree) -> Self {
        let vertices = tree.nodes().into_iter().map(|v| graph.label(v).clone()).collect();
        let mut weight = 0.0;
        let edges = tree
            .edges()
            .iter()
            .map(|&(a, b)| {
                let w = graph.weight(a, b).finite_value();
                weight += w;
                (graph.label(a).clone(), graph.label(b).clone(), w)
            })
            .collect();
        Self {
            vertices,
            edges,
            weight,
        }
    }

    /// Sum of the edge weights.
    pub fn weight(&self) -> EdgeWeight {
        self.weight
    }

    /// Vertices in graph insertion order.
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn edges(&self) -> &[(V, V, EdgeWeight)] {
        &self.edges
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.vertices.contains(vertex)
    }

    pub fn degree(&self, vertex: &V) -> usize {
        self.edges
            .iter()
            .filter(|(a, b, _)| a == vertex || b == vertex)
            .count()
    }

    /// Whether the edges form one connected, acyclic component spanning `vertices`.
    pub fn is_tree(&self) -> bool {
        if self.vertices.is_empty() {
            return self.edges.is_empty();
        }
        if self.edges.len() != self.vertices.len() - 1 {
            return false;
        }
        let position = |v: &V| self.vertices.iter().position(|x| x == v);
        let mut components = UnionFind::new(self.vertices.len());
        self.edges.iter().all(|(a, b, _)| match (position(a), position(b)) {
            (Some(a), Some(b)) => components.union(a, b),
            _ => false,
        })
    }
}
