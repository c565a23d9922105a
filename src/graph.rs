use crate::error::{Result, SteinerError};
use crate::util::Distance;
use indexmap::IndexSet;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

pub type NodeIndex = usize;
pub type EdgeWeight = f64;

/// Labels usable as graph vertices.
pub trait Label: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Label for T {}

#[derive(PartialEq, Clone, Debug)]
pub struct Edge {
    to: NodeIndex,
    weight: EdgeWeight,
}

/// Immutable, validated, weighted undirected graph.
///
/// Vertices are caller-supplied labels; internally each label gets a dense
/// [NodeIndex] in insertion order, which is also the order the exact search
/// enumerates Steiner points in.
#[derive(Clone, Debug)]
pub struct Graph<V> {
    labels: IndexSet<V>,
    edges: Vec<Vec<Edge>>,
}

/// Collects vertices and edges and validates them on [GraphBuilder::build].
#[derive(Clone, Debug)]
pub struct GraphBuilder<V> {
    labels: IndexSet<V>,
    edges: Vec<(NodeIndex, NodeIndex, EdgeWeight)>,
}

impl<V: Label> Default for GraphBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Label> GraphBuilder<V> {
    pub fn new() -> Self {
        Self {
            labels: IndexSet::new(),
            edges: vec![],
        }
    }

    /// Add an isolated vertex (no-op if it already exists) and return its index.
    pub fn add_vertex(&mut self, vertex: V) -> NodeIndex {
        self.labels.insert_full(vertex).0
    }

    /// Add an undirected edge, adding missing endpoints as vertices.
    pub fn add_edge(&mut self, from: V, to: V, weight: EdgeWeight) -> &mut Self {
        let from = self.add_vertex(from);
        let to = self.add_vertex(to);
        self.edges.push((from, to, weight));
        self
    }

    /// Validate and freeze the graph.
    ///
    /// Rejects self-loops, negative or non-finite weights and duplicate edges
    /// whose weights disagree. Exact duplicates are collapsed.
    pub fn build(self) -> Result<Graph<V>> {
        if self.labels.is_empty() {
            return Err(SteinerError::InvalidGraph("graph has no vertices".into()));
        }
        let mut edges = vec![Vec::<Edge>::new(); self.labels.len()];
        for (from, to, weight) in self.edges {
            let describe = || format!("{:?} -- {:?}", self.labels[from], self.labels[to]);
            if from == to {
                return Err(SteinerError::InvalidGraph(format!(
                    "self-loop at {:?}",
                    self.labels[from]
                )));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(SteinerError::InvalidGraph(format!(
                    "edge {} has invalid weight {}",
                    describe(),
                    weight
                )));
            }
            match edges[from].iter().find(|e| e.to == to) {
                Some(existing) if existing.weight == weight => continue,
                Some(existing) => {
                    return Err(SteinerError::InvalidGraph(format!(
                        "edge {} given with conflicting weights {} and {}",
                        describe(),
                        existing.weight,
                        weight
                    )));
                }
                None => {
                    edges[from].push(Edge { to, weight });
                    edges[to].push(Edge { to: from, weight });
                }
            }
        }
        for adjacent in &mut edges {
            adjacent.sort_unstable_by_key(|e| e.to);
        }
        Ok(Graph {
            labels: self.labels,
            edges,
        })
    }
}

impl<V: Label> Graph<V> {
    pub fn builder() -> GraphBuilder<V> {
        GraphBuilder::new()
    }

    /// Build a graph from `(from, to, weight)` triples.
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, V, EdgeWeight)>,
    {
        let mut builder = GraphBuilder::new();
        for (from, to, weight) in edges {
            builder.add_edge(from, to, weight);
        }
        builder.build()
    }

    pub fn num_nodes(&self) -> usize {
        self.edges.len() // since `edges` is an adjacency vector this is the number of *nodes*
    }

    /// Return an iterator over all edges. Only edges `(a,b)` with `a < b` are returned since
    /// this is an undirected graph.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, EdgeWeight)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .flat_map(|(from, e)| e.iter().map(move |&Edge { to, weight }| (from, to, weight)))
            .filter(|&(from, to, _)| from < to)
    }

    pub fn num_edges(&self) -> usize {
        self.edges().count()
    }

    /// Iterator over the node indices.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        0..self.num_nodes()
    }

    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, EdgeWeight)> + '_ {
        self.edges[node].iter().map(|e| (e.to, e.weight))
    }

    pub fn weight(&self, from: NodeIndex, to: NodeIndex) -> Distance {
        self.edges[from]
            .binary_search_by_key(&to, |e| e.to)
            .map(|i| Distance::from(self.edges[from][i].weight))
            .unwrap_or_else(|_| Distance::infinity())
    }

    pub fn label(&self, node: NodeIndex) -> &V {
        &self.labels[node]
    }

    pub fn index_of(&self, vertex: &V) -> Option<NodeIndex> {
        self.labels.get_index_of(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.labels.iter()
    }

    /// Flags for every node reachable from `start`.
    pub fn reachable_from(&self, start: NodeIndex) -> Vec<bool> {
        let mut seen = vec![false; self.num_nodes()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(node) = queue.pop_front() {
            for (next, _) in self.neighbors(node) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Resolve and validate the terminals of a solve.
    ///
    /// Duplicates are ignored. Fails if fewer than two distinct terminals remain,
    /// if one of them is not a vertex, or if they do not share a component.
    pub fn terminal_set<I>(&self, terminals: I) -> Result<TerminalSet>
    where
        I: IntoIterator<Item = V>,
    {
        let mut nodes = vec![];
        for terminal in terminals {
            let node = self.index_of(&terminal).ok_or_else(|| {
                SteinerError::InvalidTerminals(format!(
                    "{:?} is not a vertex of the graph",
                    terminal
                ))
            })?;
            nodes.push(node);
        }
        nodes.sort_unstable();
        nodes.dedup();
        if nodes.len() < 2 {
            return Err(SteinerError::InvalidTerminals(format!(
                "need at least 2 distinct terminals, got {}",
                nodes.len()
            )));
        }
        let reachable = self.reachable_from(nodes[0]);
        if let Some(&stranded) = nodes.iter().find(|&&t| !reachable[t]) {
            return Err(SteinerError::InvalidGraph(format!(
                "terminal {:?} cannot be reached from terminal {:?}",
                self.label(stranded),
                self.label(nodes[0])
            )));
        }
        Ok(TerminalSet { nodes })
    }
}

/// Validated terminals of one solve, ascending by node index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalSet {
    nodes: Vec<NodeIndex>,
}

impl TerminalSet {
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::util::TestResult;

    use super::*;

    /// A graph paired with the terminals of a test case.
    pub(crate) type Fixture<V> = (Graph<V>, Vec<V>);

    /// ```text
    ///     1
    /// 1 ----- 2
    ///  \     /
    /// 3 \   / 2
    ///    \ /
    ///     3
    /// ```
    /// Terminals: `1, 3`
    pub(crate) fn small_test_graph() -> Result<Fixture<u32>> {
        let graph = Graph::from_edges([(1, 2, 1.0), (2, 3, 2.0), (3, 1, 3.0)])?;
        Ok((graph, vec![1, 3]))
    }

    /// ```text
    ///    1
    ///  1----2
    ///  |  / |
    /// 7| /1 |2
    ///  |/   |
    ///  3----4
    ///    4
    /// ```
    /// Terminals: `1, 3`
    pub(crate) fn shortcut_test_graph() -> Result<Fixture<u32>> {
        let graph = Graph::from_edges([
            (2, 1, 1.0),
            (2, 4, 2.0),
            (2, 3, 1.0),
            (4, 3, 4.0),
            (1, 3, 7.0),
        ])?;
        Ok((graph, vec![1, 3]))
    }

    /// From [Wikipedia](https://de.wikipedia.org/wiki/Steinerbaumproblem#/media/Datei:Steinerbaum_Beispiel_Graph.svg).
    /// Optimal weight: 190.
    pub(crate) fn steiner_example_wiki() -> Result<Fixture<u32>> {
        let graph = Graph::from_edges([
            (1, 2, 15.0),
            (2, 3, 30.0),
            (3, 4, 50.0),
            (4, 7, 30.0),
            (1, 5, 25.0),
            (2, 9, 50.0),
            (2, 6, 45.0),
            (3, 6, 40.0),
            (6, 8, 60.0),
            (7, 8, 20.0),
            (5, 9, 30.0),
            (9, 11, 15.0),
            (8, 10, 50.0),
            (11, 10, 40.0),
            (12, 11, 10.0),
        ])?;
        Ok((graph, vec![1, 9, 12, 7, 8]))
    }

    /// Example from the original paper by Dreyfus & Wagner. Optimal weight: 5.
    pub(crate) fn steiner_example_paper() -> Result<Fixture<u32>> {
        let graph = Graph::from_edges([
            (1, 2, 2.0),
            (1, 3, 2.0),
            (1, 4, 2.0),
            (1, 5, 1.0),
            (1, 6, 1.0),
            (1, 7, 2.0),
            (2, 3, 2.0),
            (2, 4, 2.0),
            (2, 5, 2.0),
            (2, 6, 1.0),
            (2, 7, 2.0),
            (3, 4, 2.0),
            (3, 5, 2.0),
            (3, 6, 2.0),
            (3, 7, 1.0),
            (4, 5, 2.0),
            (4, 6, 1.0),
            (4, 7, 1.0),
            (5, 6, 2.0),
            (5, 7, 1.0),
            (6, 7, 1.0),
        ])?;
        Ok((graph, vec![1, 2, 3, 4]))
    }

    /// ```text
    ///  A --1-- B
    ///  | \     |
    ///  1   3   1
    ///  |     \ |
    ///  D --1-- C
    /// ```
    /// Terminals: `A, C`. Optimal weight: 2.
    pub(crate) fn cycle_with_chord() -> Result<Fixture<&'static str>> {
        let graph = Graph::from_edges([
            ("A", "B", 1.0),
            ("B", "C", 1.0),
            ("C", "D", 1.0),
            ("D", "A", 1.0),
            ("A", "C", 3.0),
        ])?;
        Ok((graph, vec!["A", "C"]))
    }

    /// Center `X` with spokes to `A, B, C`. Terminals: the leaves. Optimal weight: 3.
    pub(crate) fn star() -> Result<Fixture<&'static str>> {
        let graph = Graph::from_edges([("X", "A", 1.0), ("X", "B", 1.0), ("X", "C", 1.0)])?;
        Ok((graph, vec!["A", "B", "C"]))
    }

    /// Ten-node ladder with fractional weights. Terminals: `0, 5, 9`. Optimal weight: 9.
    pub(crate) fn ladder() -> Result<Fixture<u32>> {
        let graph = Graph::from_edges([
            (0, 1, 1.0),
            (0, 2, 2.0),
            (1, 2, 1.5),
            (1, 3, 2.0),
            (2, 3, 1.0),
            (2, 4, 2.5),
            (3, 4, 1.0),
            (3, 5, 3.0),
            (4, 5, 1.0),
            (4, 6, 2.0),
            (5, 6, 1.5),
            (5, 7, 2.0),
            (6, 7, 1.0),
            (6, 8, 2.5),
            (7, 8, 1.0),
            (7, 9, 3.0),
            (8, 9, 1.0),
        ])?;
        Ok((graph, vec![0, 5, 9]))
    }

    #[test]
    fn test_edges() -> TestResult {
        let (short, _) = shortcut_test_graph()?;
        let mut edges = short.edges().collect::<Vec<_>>();
        edges.sort_by_key(|&(a, b, _)| [a, b]);
        // labels are indexed in insertion order: 2 -> 0, 1 -> 1, 4 -> 2, 3 -> 3
        assert_eq!(
            edges,
            vec![
                (0, 1, 1.0),
                (0, 2, 2.0),
                (0, 3, 1.0),
                (1, 3, 7.0),
                (2, 3, 4.0)
            ]
        );
        assert_eq!(short.num_edges(), 5);
        Ok(())
    }

    #[test]
    fn test_labels() -> TestResult {
        let (graph, _) = small_test_graph()?;
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.index_of(&3), Some(2));
        assert_eq!(graph.label(1), &2);
        assert_eq!(graph.index_of(&42), None);
        assert_eq!(graph.vertices().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_weight() -> TestResult {
        let (graph, _) = shortcut_test_graph()?;
        let (one, three, four) = (1, 3, 2);
        assert_eq!(graph.weight(one, three), 7.0.into());
        assert_eq!(graph.weight(three, one), 7.0.into());
        assert_eq!(graph.weight(four, three), 4.0.into());
        assert_eq!(graph.weight(one, four), Distance::infinity());
        Ok(())
    }

    #[test]
    fn test_neighbors() -> TestResult {
        let (graph, _) = small_test_graph()?;
        assert_eq!(
            graph.neighbors(0).collect::<Vec<_>>(),
            vec![(1, 1.0), (2, 3.0)]
        );
        Ok(())
    }

    #[test]
    fn test_identical_duplicate_edges_collapse() -> TestResult {
        let graph = Graph::from_edges([("a", "b", 2.0), ("b", "a", 2.0)])?;
        assert_eq!(graph.num_edges(), 1);
        Ok(())
    }

    #[test]
    fn test_rejects_malformed_edges() {
        let conflicting = Graph::from_edges([("a", "b", 2.0), ("b", "a", 3.0)]);
        assert!(matches!(conflicting, Err(SteinerError::InvalidGraph(_))));
        let self_loop = Graph::from_edges([("a", "a", 1.0)]);
        assert!(matches!(self_loop, Err(SteinerError::InvalidGraph(_))));
        for weight in [-1.0, f64::NAN, f64::INFINITY] {
            let bad = Graph::from_edges([("a", "b", weight)]);
            assert!(matches!(bad, Err(SteinerError::InvalidGraph(_))), "{weight}");
        }
        let empty = Graph::<u32>::from_edges([]);
        assert!(matches!(empty, Err(SteinerError::InvalidGraph(_))));
    }

    #[test]
    fn test_terminal_set() -> TestResult {
        let (graph, _) = steiner_example_wiki()?;
        let terminals = graph.terminal_set([12, 1, 9, 1])?;
        assert_eq!(terminals.len(), 3);
        assert!(terminals.nodes().windows(2).all(|w| w[0] < w[1]));
        assert!(terminals.contains(graph.index_of(&12).ok_or("missing")?));
        Ok(())
    }

    #[test]
    fn test_terminal_set_rejects_bad_terminals() -> TestResult {
        let (graph, _) = small_test_graph()?;
        assert!(matches!(
            graph.terminal_set([1]),
            Err(SteinerError::InvalidTerminals(_))
        ));
        assert!(matches!(
            graph.terminal_set([1, 1]),
            Err(SteinerError::InvalidTerminals(_))
        ));
        assert!(matches!(
            graph.terminal_set([1, 99]),
            Err(SteinerError::InvalidTerminals(_))
        ));
        Ok(())
    }

    #[test]
    fn test_terminal_set_rejects_disconnected_terminals() -> TestResult {
        let mut builder = Graph::builder();
        builder.add_edge("a", "b", 1.0).add_edge("c", "d", 1.0);
        let graph = builder.build()?;
        assert!(matches!(
            graph.terminal_set(["a", "d"]),
            Err(SteinerError::InvalidGraph(_))
        ));
        // unreachable non-terminals are fine as long as the terminals are connected
        assert!(graph.terminal_set(["a", "b"]).is_ok());
        Ok(())
    }

    #[test]
    fn test_reachable_from() -> TestResult {
        let mut builder = Graph::builder();
        builder.add_edge(0, 1, 1.0);
        builder.add_vertex(2);
        let graph = builder.build()?;
        assert_eq!(graph.reachable_from(0), vec![true, true, false]);
        Ok(())
    }
}
